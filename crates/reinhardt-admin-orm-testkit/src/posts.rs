//! Sample `Post` model and its admin view

use reinhardt_admin_orm_contrib::{OrmModelView, ViewPermissions};
use reinhardt_admin_orm_models::{MemoryRepository, Model, ModelMeta, OrmField};
use reinhardt_admin_orm_site::RequestState;
use reinhardt_admin_orm_types::{AdminResult, Record};
use serde_json::Value;
use std::sync::{Arc, LazyLock};

/// Bundled sample rows
pub const POSTS_JSON: &str = include_str!("../data/posts.json");

static POST_META: LazyLock<ModelMeta> = LazyLock::new(|| {
	ModelMeta::new("Post")
		.field("id", OrmField::int().primary_key())
		.field("title", OrmField::char(200))
		.field("content", OrmField::text())
		.field("views", OrmField::int().with_default())
});

/// Blog post: `id`, `title`, `content`, `views`
pub struct Post;

impl Model for Post {
	fn meta() -> &'static ModelMeta {
		&POST_META
	}
}

/// Post view over an in-memory repository
pub type PostView = OrmModelView<Post, MemoryRepository>;

/// Role checks used by the post view.
///
/// `admin` sees the list and may delete; every other operation needs the
/// matching `post:*` role.
pub fn post_permissions() -> ViewPermissions {
	ViewPermissions::new()
		.is_accessible(|state: &RequestState| state.has_any_role(&["admin", "post:list"]))
		.can_view_details(|state: &RequestState| state.has_role("post:detail"))
		.can_create(|state: &RequestState| state.has_role("post:create"))
		.can_edit(|state: &RequestState| state.has_role("post:edit"))
		.can_delete(|state: &RequestState| state.has_role("admin"))
}

/// Build the post view: two rows per page, search over title and content.
pub fn build_post_view(repository: Arc<MemoryRepository>) -> AdminResult<PostView> {
	Ok(OrmModelView::new(repository)?
		.with_icon("fa fa-blog")
		.with_page_size(2)
		.with_searchable_fields(["title", "content"])
		.with_sortable_fields(["id", "title", "content", "views"])
		.with_permissions(post_permissions()))
}

/// Sample rows, keeping only the model's columns.
pub fn sample_posts() -> serde_json::Result<Vec<Record>> {
	let columns = Post::meta().column_names();
	let rows: Vec<Record> = serde_json::from_str(POSTS_JSON)?;
	Ok(rows
		.into_iter()
		.map(|row| {
			row.into_iter()
				.filter(|(key, _)| columns.contains(key))
				.collect()
		})
		.collect())
}

/// Replace the repository contents with the sample rows.
pub fn reset_posts(repository: &MemoryRepository) -> serde_json::Result<()> {
	repository.reset(sample_posts()?);
	Ok(())
}

/// Title of a row, for assertions.
pub fn title_of(row: &Record) -> Option<&str> {
	row.get("title").and_then(Value::as_str)
}
