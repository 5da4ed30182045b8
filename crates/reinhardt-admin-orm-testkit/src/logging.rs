//! Test logging

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a `tracing` fmt subscriber for tests (once per process)
///
/// The filter comes from `RUST_LOG`, defaulting to `warn`. Output goes
/// through the test writer so it is captured per test.
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_testkit::init_test_logging;
///
/// init_test_logging();
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
		let _ = tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_test_writer()
			.try_init();
	});
}
