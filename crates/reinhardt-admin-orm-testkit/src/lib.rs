//! # reinhardt-admin-orm-testkit
//!
//! Fixtures for exercising the admin site end to end.
//!
//! - **auth**: [`StaticRolesAuthProvider`], a cookie session over a fixed
//!   user/role table
//! - **posts**: the sample `Post` model and its role-gated [`PostView`]
//! - **report**: [`ReportView`], an admin-only custom page
//! - **client**: [`TestClient`], which drives `AdminSite::handle` in process
//! - **fixtures**: rstest fixtures wiring the above together
//! - **logging**: [`init_test_logging`]

pub mod auth;
pub mod client;
pub mod fixtures;
pub mod logging;
pub mod posts;
pub mod report;

pub use auth::{DEFAULT_PASSWORD, SESSION_COOKIE, StaticRolesAuthProvider};
pub use client::{TestClient, TestResponse};
pub use logging::init_test_logging;
pub use posts::{
	POSTS_JSON, Post, PostView, build_post_view, post_permissions, reset_posts, sample_posts,
	title_of,
};
pub use report::{REPORT_TEMPLATE, ReportView};
