//! # reinhardt-admin-orm-models
//!
//! The ORM side of the admin binding.
//!
//! - **fields**: ORM field descriptors (`OrmField`, `OrmFieldType`)
//! - **meta**: per-model reflection (`ModelMeta`), exposing the field map
//! - **model**: the `Model` trait linking a type to its metadata
//! - **query**: the native query shape (`Query`), with `-field` ordering tokens
//! - **repository**: the async `Repository` trait and its in-memory backend
//!
//! ## Example
//!
//! ```
//! use reinhardt_admin_orm_models::{ModelMeta, OrmField};
//!
//! let meta = ModelMeta::new("blog.Post")
//!     .field("id", OrmField::int().primary_key())
//!     .field("title", OrmField::char(120))
//!     .field("author", OrmField::foreign_key("blog.User"));
//!
//! assert_eq!(meta.pk_field, "id");
//! assert_eq!(meta.fk_fields(), vec!["author"]);
//! ```

pub mod fields;
pub mod memory;
pub mod meta;
pub mod model;
pub mod query;
pub mod repository;

pub use fields::{FieldChoices, OrmField, OrmFieldType};
pub use memory::MemoryRepository;
pub use meta::ModelMeta;
pub use model::Model;
pub use query::{Query, Search};
pub use repository::{Repository, RepositoryError, RepositoryResult};
