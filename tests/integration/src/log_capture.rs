//! Tracing layer that records event messages

use parking_lot::Mutex;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

type Captured = Arc<Mutex<Vec<String>>>;

/// Layer pushing `"[LEVEL] message"` for every event
struct LogCapture {
	logs: Captured,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
		struct MessageVisitor {
			message: String,
		}

		impl tracing::field::Visit for MessageVisitor {
			fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
				if field.name() == "message" {
					self.message = format!("{:?}", value);
				}
			}
		}

		let mut visitor = MessageVisitor {
			message: String::new(),
		};
		event.record(&mut visitor);

		self.logs
			.lock()
			.push(format!("[{}] {}", event.metadata().level(), visitor.message));
	}
}

/// Captured events, live while the guard is held
pub struct CapturedLogs {
	logs: Captured,
	_guard: tracing::subscriber::DefaultGuard,
}

impl CapturedLogs {
	pub fn lines(&self) -> Vec<String> {
		self.logs.lock().clone()
	}

	pub fn contains(&self, needle: &str) -> bool {
		self.lines().iter().any(|line| line.contains(needle))
	}
}

/// Capture events on the current thread until the result is dropped.
///
/// Only sees events emitted on the calling thread, so use it from
/// `#[tokio::test]` (current-thread runtime).
pub fn capture_logs() -> CapturedLogs {
	let logs = Arc::new(Mutex::new(Vec::new()));
	let capture = LogCapture { logs: logs.clone() };
	let guard = tracing_subscriber::registry().with(capture).set_default();
	CapturedLogs {
		logs,
		_guard: guard,
	}
}
