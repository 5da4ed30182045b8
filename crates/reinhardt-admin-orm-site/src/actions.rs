//! Batch actions on selected records

use crate::auth::RequestState;
use crate::views::{ModelView, PermissionAction};
use reinhardt_admin_orm_types::{AdminError, AdminResult, Pk};

/// Name of the built-in delete action
pub const DELETE_ACTION: &str = "delete";

/// Result of a batch action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
	Success {
		message: String,
		affected_count: u64,
	},
}

impl ActionResult {
	pub fn message(&self) -> &str {
		match self {
			ActionResult::Success { message, .. } => message,
		}
	}

	pub fn affected_count(&self) -> u64 {
		match self {
			ActionResult::Success { affected_count, .. } => *affected_count,
		}
	}
}

/// Actions a view offers to the request's user.
pub fn available_actions(view: &dyn ModelView, state: &RequestState) -> Vec<&'static str> {
	let mut actions = Vec::new();
	if view.has_permission(state, PermissionAction::Delete) {
		actions.push(DELETE_ACTION);
	}
	actions
}

/// Run the action `name` on `pks`.
///
/// # Errors
///
/// [`AdminError::ActionFailed`] for unknown actions, missing selections and
/// actions the user may not run. Errors from the view propagate unchanged.
pub async fn execute_action(
	view: &dyn ModelView,
	state: &RequestState,
	name: &str,
	pks: &[Pk],
) -> AdminResult<ActionResult> {
	match name {
		DELETE_ACTION => {
			if !view.has_permission(state, PermissionAction::Delete) {
				return Err(AdminError::ActionFailed("Forbidden".to_string()));
			}
			if pks.is_empty() {
				return Err(AdminError::ActionFailed("No items selected".to_string()));
			}
			let affected_count = view.delete(state, pks).await?;
			tracing::info!(
				view = view.identity(),
				user = state.user.as_deref().unwrap_or("-"),
				affected_count,
				"Deleted records"
			);
			Ok(ActionResult::Success {
				message: format!("{} items were successfully deleted", affected_count),
				affected_count,
			})
		}
		other => Err(AdminError::ActionFailed(format!("Invalid action '{}'", other))),
	}
}
