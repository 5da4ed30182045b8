//! ORM model metadata and repositories
//!
//! ```rust
//! use reinhardt_admin_orm::models::{ModelMeta, OrmField};
//!
//! let meta = ModelMeta::new("shop.Order")
//!     .field("id", OrmField::int().primary_key())
//!     .field("customer", OrmField::foreign_key("shop.Customer"));
//!
//! assert_eq!(meta.fk_fields(), vec!["customer"]);
//! ```

pub use reinhardt_admin_orm_models::*;
