//! # reinhardt-admin-orm-types
//!
//! Shared type definitions for the ORM-backed admin site:
//!
//! - **fields**: admin field descriptors (`AdminField`, `AdminFieldKind`)
//! - **query**: primary key, ordering and filter aliases used by model views
//! - **errors**: `AdminError` and its HTTP status mapping

pub mod errors;
pub mod fields;
pub mod query;

pub use errors::{AdminError, AdminResult};
pub use fields::{AdminField, AdminFieldKind};
pub use query::{OrderBy, Pk, Pks, Record, Where};
