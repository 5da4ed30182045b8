//! Admin field descriptors, query aliases and errors
//!
//! See [`reinhardt_admin_orm_types`].

pub use reinhardt_admin_orm_types::*;
