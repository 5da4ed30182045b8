//! Admin site
//!
//! Settings, the auth provider contract, view traits and request routing,
//! re-exported from `reinhardt-admin-orm-site`.

pub use reinhardt_admin_orm_site::*;
