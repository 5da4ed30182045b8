//! # reinhardt-admin-orm-contrib
//!
//! Binds ORM models to the admin site.
//!
//! - **mapping**: the ORM field type to admin field class table
//! - **fields**: admin fields derived from model metadata, with overrides
//! - **utils**: view identities, `order_by` translation and the payload
//!   sanitizers applied before writes
//! - **view**: [`OrmModelView`], a [`ModelView`](reinhardt_admin_orm_site::ModelView)
//!   over any [`Repository`](reinhardt_admin_orm_models::Repository)
//!
//! ## Example
//!
//! ```
//! use reinhardt_admin_orm_contrib::OrmModelView;
//! use reinhardt_admin_orm_models::{MemoryRepository, Model, ModelMeta, OrmField};
//! use reinhardt_admin_orm_site::ModelView;
//! use std::sync::{Arc, LazyLock};
//!
//! struct Tag;
//!
//! static TAG: LazyLock<ModelMeta> = LazyLock::new(|| {
//!     ModelMeta::new("blog.Tag")
//!         .field("id", OrmField::int().primary_key())
//!         .field("name", OrmField::char(40))
//! });
//!
//! impl Model for Tag {
//!     fn meta() -> &'static ModelMeta {
//!         &TAG
//!     }
//! }
//!
//! let repository = Arc::new(MemoryRepository::for_model(Tag::meta()));
//! let view = OrmModelView::<Tag, _>::new(repository).unwrap();
//!
//! assert_eq!(view.identity(), "tag");
//! assert_eq!(view.fields().len(), 2);
//! ```

pub mod fields;
pub mod mapping;
pub mod utils;
pub mod view;

pub use fields::{FieldOptions, FieldOverride, FieldOverrides, model_admin_fields, related_admin_field};
pub use mapping::{AdminKindTag, map_field_type};
pub use utils::{add_id2fk_fields, identity, order_by_to_native, remove_nones};
pub use view::{OrmModelView, ViewPermissions};
