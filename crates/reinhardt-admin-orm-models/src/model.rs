//! Model trait
//!
//! Types declared with the ORM expose their reflection data through
//! [`Model::meta`]. The metadata is built once and lives for the program.

use crate::meta::ModelMeta;

/// A model the admin can introspect
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use reinhardt_admin_orm_models::{Model, ModelMeta, OrmField};
///
/// struct Tag;
///
/// static TAG_META: LazyLock<ModelMeta> = LazyLock::new(|| {
///     ModelMeta::new("blog.Tag")
///         .field("id", OrmField::int().primary_key())
///         .field("name", OrmField::char(50))
/// });
///
/// impl Model for Tag {
///     fn meta() -> &'static ModelMeta {
///         &TAG_META
///     }
/// }
///
/// assert_eq!(Tag::table_name(), "tag");
/// assert_eq!(Tag::primary_key_field(), "id");
/// ```
pub trait Model: Send + Sync + 'static {
	fn meta() -> &'static ModelMeta;

	fn table_name() -> &'static str {
		&Self::meta().table
	}

	fn primary_key_field() -> &'static str {
		&Self::meta().pk_field
	}
}
