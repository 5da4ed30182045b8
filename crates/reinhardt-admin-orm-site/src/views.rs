//! Views served by the admin site
//!
//! A [`ModelView`] exposes one model through list, detail, create and edit
//! pages plus a JSON API. A [`CustomView`] renders a single page from a
//! template. Both decide access per request from [`RequestState`].

use crate::auth::RequestState;
use async_trait::async_trait;
use reinhardt_admin_orm_types::{AdminField, AdminResult, Pk, Record, Where};

/// Operations a model view can gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionAction {
	/// List page and API
	View,
	/// Detail page
	Detail,
	/// Create form
	Add,
	/// Edit form
	Change,
	/// Delete action
	Delete,
}

impl PermissionAction {
	pub fn as_str(&self) -> &'static str {
		match self {
			PermissionAction::View => "view",
			PermissionAction::Detail => "detail",
			PermissionAction::Add => "add",
			PermissionAction::Change => "change",
			PermissionAction::Delete => "delete",
		}
	}
}

/// Admin view over one model
///
/// Permission hooks default to allowing everything; data operations have no
/// default.
#[async_trait]
pub trait ModelView: Send + Sync {
	/// URL segment identifying the view
	fn identity(&self) -> &str;

	/// Singular display name
	fn name(&self) -> &str;

	/// Navigation label
	fn label(&self) -> &str;

	fn icon(&self) -> Option<&str> {
		None
	}

	/// Primary key attribute in records
	fn pk_attr(&self) -> &str {
		"id"
	}

	fn fields(&self) -> &[AdminField];

	/// Rows per list page. `None` uses the site default.
	fn page_size(&self) -> Option<usize> {
		None
	}

	/// Fields matched by the search box. Empty disables search.
	fn searchable_fields(&self) -> Vec<&str> {
		Vec::new()
	}

	/// Fields accepted in `order_by`. Empty accepts every field.
	fn sortable_fields(&self) -> Vec<&str> {
		Vec::new()
	}

	fn is_accessible(&self, state: &RequestState) -> bool {
		let _ = state;
		true
	}

	fn can_view_details(&self, state: &RequestState) -> bool {
		let _ = state;
		true
	}

	fn can_create(&self, state: &RequestState) -> bool {
		let _ = state;
		true
	}

	fn can_edit(&self, state: &RequestState) -> bool {
		let _ = state;
		true
	}

	fn can_delete(&self, state: &RequestState) -> bool {
		let _ = state;
		true
	}

	/// Dispatch a permission check by action.
	fn has_permission(&self, state: &RequestState, action: PermissionAction) -> bool {
		match action {
			PermissionAction::View => self.is_accessible(state),
			PermissionAction::Detail => self.can_view_details(state),
			PermissionAction::Add => self.can_create(state),
			PermissionAction::Change => self.can_edit(state),
			PermissionAction::Delete => self.can_delete(state),
		}
	}

	/// Number of records matching `where_`.
	async fn count(&self, state: &RequestState, where_: Option<&Where>) -> AdminResult<u64>;

	/// A page of records. `order_by` holds `"<field> <asc|desc>"` directives.
	async fn find_all(
		&self,
		state: &RequestState,
		skip: usize,
		limit: usize,
		where_: Option<&Where>,
		order_by: &[String],
	) -> AdminResult<Vec<Record>>;

	async fn find_by_pk(&self, state: &RequestState, pk: Pk) -> AdminResult<Option<Record>>;

	async fn find_by_pks(&self, state: &RequestState, pks: &[Pk]) -> AdminResult<Vec<Record>>;

	/// Store a new record built from parsed form data.
	async fn create(&self, state: &RequestState, data: Record) -> AdminResult<Record>;

	/// Apply parsed form data to an existing record.
	async fn edit(&self, state: &RequestState, pk: Pk, data: Record) -> AdminResult<Record>;

	/// Delete records, returning how many were removed.
	async fn delete(&self, state: &RequestState, pks: &[Pk]) -> AdminResult<u64>;
}

/// Standalone admin page rendered from a template
#[async_trait]
pub trait CustomView: Send + Sync {
	/// Route relative to the admin base URL, e.g. `/report`
	fn path(&self) -> &str;

	/// Identifier of the view
	fn name(&self) -> &str;

	/// Navigation label
	fn label(&self) -> &str;

	fn icon(&self) -> Option<&str> {
		None
	}

	/// Template rendered for the page
	fn template_name(&self) -> &str;

	fn is_accessible(&self, state: &RequestState) -> bool {
		let _ = state;
		true
	}

	/// Extra template context merged over the site context.
	async fn render(&self, state: &RequestState) -> AdminResult<tera::Context> {
		let _ = state;
		Ok(tera::Context::new())
	}
}
