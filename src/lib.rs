//! # Reinhardt Admin ORM
//!
//! Binds ORM models to the Reinhardt admin site. Field metadata is turned
//! into admin fields, list ordering and filters are translated into native
//! queries, and form payloads are sanitized before they reach the
//! repository.
//!
//! ## Feature Flags
//!
//! - `site` - Admin site, auth provider contract and routing
//! - `contrib` (default) - ORM adapter: field mapping, order-by translation,
//!   payload sanitizers and [`OrmModelView`](contrib::OrmModelView)
//! - `testkit` - Static-roles auth provider, sample views and an in-process
//!   test client
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_admin_orm::prelude::*;
//! use std::sync::{Arc, LazyLock};
//!
//! struct Post;
//!
//! static POST_META: LazyLock<ModelMeta> = LazyLock::new(|| {
//!     ModelMeta::new("blog.Post")
//!         .field("id", OrmField::int().primary_key())
//!         .field("title", OrmField::char(200))
//!         .field("author", OrmField::foreign_key("blog.User"))
//! });
//!
//! impl Model for Post {
//!     fn meta() -> &'static ModelMeta {
//!         &POST_META
//!     }
//! }
//!
//! let repo = Arc::new(MemoryRepository::for_model(Post::meta()));
//! let view = OrmModelView::<Post, _>::new(repo).unwrap();
//!
//! let mut site = AdminSite::new(AdminSettings::default()).unwrap();
//! site.add_view(Arc::new(view)).unwrap();
//! assert_eq!(site.model_identities(), vec!["post"]);
//! ```

pub mod models;
pub mod types;

#[cfg(feature = "contrib")]
pub mod contrib;
#[cfg(feature = "site")]
pub mod site;
#[cfg(feature = "testkit")]
pub mod testkit;

// Re-export the types every model view deals in
pub use reinhardt_admin_orm_types::{AdminError, AdminField, AdminFieldKind, AdminResult, Pk, Record};

// Re-export the ORM side
pub use reinhardt_admin_orm_models::{MemoryRepository, Model, ModelMeta, OrmField, Repository};

#[cfg(feature = "site")]
pub use reinhardt_admin_orm_site::{AdminSettings, AdminSite, AuthProvider, ModelView, RequestState};

#[cfg(feature = "contrib")]
pub use reinhardt_admin_orm_contrib::{OrmModelView, ViewPermissions};

/// Common imports for building an admin site over ORM models
pub mod prelude {
	pub use crate::{
		AdminError, AdminField, AdminFieldKind, AdminResult, MemoryRepository, Model, ModelMeta,
		OrmField, Pk, Record, Repository,
	};

	#[cfg(feature = "site")]
	pub use crate::{AdminSettings, AdminSite, AuthProvider, ModelView, RequestState};

	#[cfg(feature = "site")]
	pub use reinhardt_admin_orm_site::{CustomView, LoginError, PermissionAction};

	#[cfg(feature = "contrib")]
	pub use crate::{OrmModelView, ViewPermissions};

	#[cfg(feature = "contrib")]
	pub use reinhardt_admin_orm_contrib::{FieldOverride, FieldOverrides};
}
