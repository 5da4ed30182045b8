//! Test fixtures
//!
//! Only available with the `testkit` feature.

pub use reinhardt_admin_orm_testkit::*;
