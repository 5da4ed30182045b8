//! rstest fixtures
//!
//! Each fixture builds fresh state, so tests never share rows or cookies.
//!
//! ```rust,no_run
//! use reinhardt_admin_orm_testkit::fixtures::*;
//! use rstest::rstest;
//!
//! #[rstest]
//! #[tokio::test]
//! async fn test_list(client: TestClient) {
//!     let client = client.with_cookie("session", "john");
//!     let response = client.get("/admin/post/list").await.unwrap();
//!     assert_eq!(response.status_code(), 200);
//! }
//! ```

use crate::auth::StaticRolesAuthProvider;
use crate::logging::init_test_logging;
use crate::posts::{Post, PostView, build_post_view, reset_posts};
use crate::report::{REPORT_TEMPLATE, ReportView};
use reinhardt_admin_orm_models::{MemoryRepository, Model};
use reinhardt_admin_orm_site::{AdminSettings, AdminSite};
use rstest::fixture;
use std::sync::Arc;

pub use crate::client::{TestClient, TestResponse};

/// Post view loaded with the sample rows
#[fixture]
pub fn post_view() -> Arc<PostView> {
	init_test_logging();
	let repository = Arc::new(MemoryRepository::for_model(Post::meta()));
	reset_posts(&repository).expect("bundled posts.json must parse");
	Arc::new(build_post_view(repository).expect("Post fields must map"))
}

#[fixture]
pub fn report_view() -> Arc<ReportView> {
	Arc::new(ReportView)
}

/// Site at `/admin` guarded by [`StaticRolesAuthProvider`], serving the
/// report page and the post view.
#[fixture]
pub fn admin_site(post_view: Arc<PostView>, report_view: Arc<ReportView>) -> Arc<AdminSite> {
	let mut site = AdminSite::new(AdminSettings::default())
		.expect("default settings are valid")
		.with_auth_provider(Arc::new(StaticRolesAuthProvider::new()));
	site.add_template("report.html", REPORT_TEMPLATE)
		.expect("report template must compile");
	site.add_custom_view(report_view).expect("report path is free");
	site.add_view(post_view).expect("post identity is free");
	Arc::new(site)
}

#[fixture]
pub fn client(admin_site: Arc<AdminSite>) -> TestClient {
	TestClient::new(admin_site)
}
