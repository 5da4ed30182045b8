//! # Login Flow Integration Tests
//!
//! Drives the admin site's login and logout routes through `AdminSite::handle`.
//!
//! ## Test Coverage
//!
//! 1. **Route wiring**: login/logout paths, custom login path, redirect of
//!    unauthenticated requests with `next`
//! 2. **Provider errors**: default provider, form validation, bad credentials
//! 3. **Session lifecycle**: login sets the session cookie, logout expires it

use reinhardt_admin_orm_integration_tests::log_capture::capture_logs;
use reinhardt_admin_orm_integration_tests::{login_form, site_with_provider};
use reinhardt_admin_orm_site::BaseAuthProvider;
use reinhardt_admin_orm_testkit::{StaticRolesAuthProvider, TestClient};
use rstest::*;
use std::sync::Arc;

const NEXT_INDEX: &str = "next=http%3A%2F%2Ftestserver%2Fadmin%2F";

#[fixture]
fn client() -> TestClient {
	TestClient::new(site_with_provider(Arc::new(StaticRolesAuthProvider::new())))
}

// ========================================================================
// Route wiring
// ========================================================================

/// **Test Intent**: the default provider still exposes the login page and
/// guards every other route
#[rstest]
#[tokio::test]
async fn test_auth_routes_with_default_provider() {
	let site = site_with_provider(Arc::new(BaseAuthProvider));
	assert_eq!(site.url_path_for("login").as_deref(), Some("/admin/login"));
	assert_eq!(site.url_path_for("logout").as_deref(), Some("/admin/logout"));
	let client = TestClient::new(site);

	let response = client.get("/admin/login").await.unwrap();
	assert_eq!(response.status_code(), 200);

	let response = client.get("/admin/").await.unwrap();
	assert_eq!(response.status_code(), 303);
	assert_eq!(
		response.location(),
		Some(format!("http://testserver/admin/login?{}", NEXT_INDEX).as_str())
	);
}

/// **Test Intent**: a provider-defined login path replaces the default one
#[rstest]
#[tokio::test]
async fn test_custom_login_path() {
	let site = site_with_provider(Arc::new(
		StaticRolesAuthProvider::new().with_login_path("/custom-login"),
	));
	assert_eq!(
		site.url_path_for("login").as_deref(),
		Some("/admin/custom-login")
	);
	let client = TestClient::new(site);

	let response = client.get("/admin/").await.unwrap();

	assert_eq!(response.status_code(), 303);
	assert_eq!(
		response.location(),
		Some(format!("http://testserver/admin/custom-login?{}", NEXT_INDEX).as_str())
	);
	assert_eq!(client.get("/admin/custom-login").await.unwrap().status_code(), 200);
	assert_eq!(client.get("/admin/login").await.unwrap().status_code(), 303);
}

/// **Test Intent**: the redirect keeps the full original URL, query included
#[rstest]
#[tokio::test]
async fn test_redirect_keeps_query_string(client: TestClient) {
	let response = client.get("/admin/post/list?page=2").await.unwrap();

	assert_eq!(response.status_code(), 303);
	assert_eq!(
		response.location(),
		Some("http://testserver/admin/login?next=http%3A%2F%2Ftestserver%2Fadmin%2Fpost%2Flist%3Fpage%3D2")
	);
}

/// **Test Intent**: requests outside the admin prefix are not handled
#[rstest]
#[tokio::test]
async fn test_outside_prefix_is_not_found(client: TestClient) {
	let response = client.get("/elsewhere").await.unwrap();
	assert_eq!(response.status_code(), 404);
}

// ========================================================================
// Provider errors
// ========================================================================

/// **Test Intent**: the default provider rejects every login
#[rstest]
#[tokio::test]
async fn test_not_implemented_login() {
	let client = TestClient::new(site_with_provider(Arc::new(BaseAuthProvider)));

	let response = client
		.post("/admin/login", &login_form("admin", "password"))
		.await
		.unwrap();

	assert_eq!(response.status_code(), 400);
	assert!(response.text().contains("Not Implemented"));
}

/// **Test Intent**: validation errors and rejected credentials are shown on
/// the login page
#[rstest]
#[tokio::test]
async fn test_invalid_login(client: TestClient) {
	let response = client
		.post("/admin/login", &login_form("ad", "invalid-password"))
		.await
		.unwrap();
	assert_eq!(response.status_code(), 422);
	assert!(
		response
			.text()
			.contains("Ensure username has at least 03 characters")
	);

	let response = client
		.post("/admin/login", &login_form("admin", "invalid-password"))
		.await
		.unwrap();
	assert_eq!(response.status_code(), 400);
	assert!(response.text().contains("Invalid username or password"));
	assert!(response.cookie("session").is_none());
}

/// **Test Intent**: a failed login is logged at the auth boundary
#[rstest]
#[tokio::test]
async fn test_failed_login_is_logged(client: TestClient) {
	let logs = capture_logs();

	client
		.post("/admin/login", &login_form("admin", "nope"))
		.await
		.unwrap();

	assert!(logs.contains("[INFO] Admin login failed"));
}

// ========================================================================
// Session lifecycle
// ========================================================================

/// **Test Intent**: login sets the session cookie and redirects to the
/// dashboard; logout expires it
#[rstest]
#[tokio::test]
async fn test_valid_login_and_logout(client: TestClient) {
	let response = client
		.post("/admin/login", &login_form("admin", "password"))
		.await
		.unwrap();
	assert_eq!(response.status_code(), 303);
	assert_eq!(response.location(), Some("http://testserver/admin/"));
	assert_eq!(response.cookie("session").as_deref(), Some("admin"));

	let dashboard = client.get("/admin/").await.unwrap();
	assert_eq!(dashboard.status_code(), 200);
	assert!(
		dashboard
			.text()
			.contains(r#"<span class="user-name">admin</span>"#)
	);

	let response = client.get("/admin/logout").await.unwrap();
	assert_eq!(response.status_code(), 303);
	assert_eq!(response.location(), Some("http://testserver/admin/"));
	assert!(response.cookie("session").is_none());
	assert!(
		response
			.set_cookies()
			.iter()
			.any(|c| c.starts_with("session=;"))
	);
	assert!(client.cookie("session").is_none());
	assert_eq!(client.get("/admin/").await.unwrap().status_code(), 303);
}

/// **Test Intent**: `next` is honored after login when it points back into
/// the site, and ignored otherwise
#[rstest]
#[case("http%3A%2F%2Ftestserver%2Fadmin%2Fpost%2Flist", "http://testserver/admin/post/list")]
#[case("https%3A%2F%2Fevil.example%2F", "http://testserver/admin/")]
#[tokio::test]
async fn test_login_redirects_to_next(
	client: TestClient,
	#[case] next: &str,
	#[case] expected: &str,
) {
	let response = client
		.post(
			&format!("/admin/login?next={}", next),
			&login_form("john", "password"),
		)
		.await
		.unwrap();

	assert_eq!(response.status_code(), 303);
	assert_eq!(response.location(), Some(expected));
}

/// **Test Intent**: a session cookie for an unknown user does not
/// authenticate
#[rstest]
#[tokio::test]
async fn test_unknown_session_user_is_redirected(client: TestClient) {
	let client = client.with_cookie("session", "mallory");
	let response = client.get("/admin/").await.unwrap();
	assert_eq!(response.status_code(), 303);
}
