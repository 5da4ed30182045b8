//! # Access Control Integration Tests
//!
//! Role-based access to the post view and the report page, with users from
//! `StaticRolesAuthProvider`:
//!
//! | user    | roles                                   |
//! |---------|-----------------------------------------|
//! | `admin` | `admin`                                 |
//! | `john`  | `post:list`, `post:detail`              |
//! | `terry` | `post:list`, `post:create`, `post:edit` |
//! | `doe`   | none                                    |

use reinhardt_admin_orm_testkit::fixtures::*;
use rstest::*;

const REPORT_NAV: &str = r#"<span class="nav-link-title">Report</span>"#;
const POSTS_NAV: &str = r#"<span class="nav-link-title">Posts</span>"#;

fn as_user(client: TestClient, username: &str) -> TestClient {
	client.with_cookie("session", username)
}

// ========================================================================
// Custom view
// ========================================================================

#[rstest]
#[case("john", 403)]
#[case("doe", 403)]
#[case("admin", 200)]
#[tokio::test]
async fn test_access_custom_view(client: TestClient, #[case] user: &str, #[case] status: u16) {
	let client = as_user(client, user);
	let response = client.get("/admin/report").await.unwrap();
	assert_eq!(response.status_code(), status);
}

#[rstest]
#[tokio::test]
async fn test_custom_view_renders_context(client: TestClient) {
	let client = as_user(client, "admin");
	let response = client.get("/admin/report").await.unwrap();
	assert!(response.text().contains("Prepared for admin"));
}

// ========================================================================
// List and API
// ========================================================================

#[rstest]
#[case("/admin/post/list")]
#[case("/admin/api/post")]
#[tokio::test]
async fn test_list_denied_without_role(client: TestClient, #[case] path: &str) {
	let client = as_user(client, "doe");
	let response = client.get(path).await.unwrap();
	assert_eq!(response.status_code(), 403);
}

#[rstest]
#[tokio::test]
async fn test_access_model_view_list(client: TestClient) {
	let client = as_user(client, "john");

	let response = client.get("/admin/post/list").await.unwrap();
	assert_eq!(response.status_code(), 200);
	assert!(response.text().contains(POSTS_NAV));
	assert!(!response.text().contains(REPORT_NAV));

	let response = client.get("/admin/api/post").await.unwrap();
	assert_eq!(response.status_code(), 200);
	assert!(!response.text().contains(REPORT_NAV));
}

#[rstest]
#[tokio::test]
async fn test_admin_navigation_lists_every_view(client: TestClient) {
	let client = as_user(client, "admin");
	let text = client.get("/admin/").await.unwrap().text();
	assert!(text.contains(REPORT_NAV));
	assert!(text.contains(POSTS_NAV));
}

#[rstest]
#[tokio::test]
async fn test_doe_dashboard_has_no_views(client: TestClient) {
	let client = as_user(client, "doe");
	let text = client.get("/admin/").await.unwrap().text();
	assert!(!text.contains(REPORT_NAV));
	assert!(!text.contains(POSTS_NAV));
	assert!(text.contains("Nothing to show."));
}

#[rstest]
#[tokio::test]
async fn test_list_page_is_paginated(client: TestClient) {
	let client = as_user(client, "john");
	let text = client.get("/admin/post/list?page=2").await.unwrap().text();
	assert!(text.contains("Page 2 of 3 (5 total)"));
	assert!(text.contains("Searching records"));
	assert!(text.contains("Roles and permissions"));
	assert!(!text.contains("Batch actions"));
}

#[rstest]
#[case("4")]
#[case("18446744073709551615")]
#[tokio::test]
async fn test_page_past_the_end_shows_last_page(client: TestClient, #[case] page: &str) {
	let client = as_user(client, "john");
	let response = client
		.get(&format!("/admin/post/list?page={}", page))
		.await
		.unwrap();
	assert_eq!(response.status_code(), 200);
	let text = response.text();
	assert!(text.contains("Page 3 of 3 (5 total)"));
	assert!(text.contains("Batch actions"));
	assert!(!text.contains("page=4"));
}

#[rstest]
#[tokio::test]
async fn test_api_search_and_order(client: TestClient) {
	let client = as_user(client, "john");

	let body = client
		.get("/admin/api/post?where=query&order_by=views%20desc&limit=10")
		.await
		.unwrap()
		.json()
		.unwrap();

	assert_eq!(body["total"], 0);

	let body = client
		.get("/admin/api/post?where=directives&order_by=views%20desc&limit=10")
		.await
		.unwrap()
		.json()
		.unwrap();
	assert_eq!(body["total"], 1);
	assert_eq!(body["items"][0]["id"], 2);

	let body = client
		.get("/admin/api/post?order_by=views%20desc&limit=3")
		.await
		.unwrap()
		.json()
		.unwrap();
	let ids: Vec<i64> = body["items"]
		.as_array()
		.unwrap()
		.iter()
		.map(|item| item["id"].as_i64().unwrap())
		.collect();
	assert_eq!(body["total"], 5);
	assert_eq!(ids, vec![1, 3, 2]);
}

#[rstest]
#[tokio::test]
async fn test_api_rejects_unsortable_field(client: TestClient) {
	let client = as_user(client, "john");
	let response = client
		.get("/admin/api/post?order_by=secret%20asc")
		.await
		.unwrap();
	assert_eq!(response.status_code(), 400);
	assert_eq!(
		response.json().unwrap()["msg"],
		"Invalid order-by directive 'secret asc'"
	);
}

// ========================================================================
// Detail
// ========================================================================

#[rstest]
#[case("john", 200)]
#[case("terry", 403)]
#[case("doe", 403)]
#[tokio::test]
async fn test_access_model_view_detail(client: TestClient, #[case] user: &str, #[case] status: u16) {
	let client = as_user(client, user);
	let response = client.get("/admin/post/detail/1").await.unwrap();
	assert_eq!(response.status_code(), status);
}

#[rstest]
#[tokio::test]
async fn test_detail_of_missing_post(client: TestClient) {
	let client = as_user(client, "john");
	assert_eq!(client.get("/admin/post/detail/99").await.unwrap().status_code(), 404);
	assert_eq!(client.get("/admin/post/detail/abc").await.unwrap().status_code(), 404);
}

// ========================================================================
// Create and edit
// ========================================================================

#[rstest]
#[tokio::test]
async fn test_access_model_view_create(client: TestClient) {
	let john = as_user(client, "john");
	assert_eq!(john.get("/admin/post/create").await.unwrap().status_code(), 403);
	assert_eq!(john.post("/admin/post/create", &[]).await.unwrap().status_code(), 403);

	let terry = as_user(john, "terry");
	assert_eq!(terry.get("/admin/post/create").await.unwrap().status_code(), 200);

	let response = terry
		.post(
			"/admin/post/create",
			&[("title", "title"), ("content", "content")],
		)
		.await
		.unwrap();
	assert_eq!(response.status_code(), 303);
	assert_eq!(response.location(), Some("http://testserver/admin/post/list"));

	let response = terry.follow_redirects(response).await.unwrap();
	assert_eq!(response.status_code(), 200);

	let body = terry.get("/admin/api/post?pks=6").await.unwrap().json().unwrap();
	assert_eq!(body["total"], 1);
	assert_eq!(body["items"][0]["title"], "title");
	assert!(body["items"][0].get("views").is_none());
}

#[rstest]
#[tokio::test]
async fn test_create_requires_title(client: TestClient) {
	let terry = as_user(client, "terry");

	let response = terry
		.post("/admin/post/create", &[("content", "no title")])
		.await
		.unwrap();

	assert_eq!(response.status_code(), 422);
	let text = response.text();
	assert!(text.contains("This field is required."));
	assert!(text.contains("no title"));
}

#[rstest]
#[tokio::test]
async fn test_access_model_view_edit(client: TestClient) {
	let john = as_user(client, "john");
	assert_eq!(john.get("/admin/post/edit/1").await.unwrap().status_code(), 403);
	assert_eq!(john.post("/admin/post/edit/1", &[]).await.unwrap().status_code(), 403);

	let terry = as_user(john, "terry");
	assert_eq!(terry.get("/admin/post/edit/1").await.unwrap().status_code(), 200);

	let response = terry.post("/admin/post/edit/1", &[]).await.unwrap();
	let response = terry.follow_redirects(response).await.unwrap();
	assert_eq!(response.status_code(), 200);
}

#[rstest]
#[tokio::test]
async fn test_edit_updates_only_submitted_fields(client: TestClient) {
	let terry = as_user(client, "terry");

	let response = terry
		.post("/admin/post/edit/2", &[("views", "46")])
		.await
		.unwrap();
	assert_eq!(response.status_code(), 303);

	let body = terry.get("/admin/api/post?pks=2").await.unwrap().json().unwrap();
	assert_eq!(body["items"][0]["views"], 46);
	assert_eq!(body["items"][0]["title"], "Ordering list pages");
}

#[rstest]
#[tokio::test]
async fn test_edit_rejects_bad_integer(client: TestClient) {
	let terry = as_user(client, "terry");
	let response = terry
		.post("/admin/post/edit/2", &[("views", "lots")])
		.await
		.unwrap();
	assert_eq!(response.status_code(), 422);
	assert!(response.text().contains("Enter a whole number."));
}

// ========================================================================
// Delete action
// ========================================================================

#[rstest]
#[case("john", 400)]
#[case("doe", 400)]
#[case("terry", 400)]
#[case("admin", 200)]
#[tokio::test]
async fn test_access_model_view_delete(client: TestClient, #[case] user: &str, #[case] status: u16) {
	let client = as_user(client, user);
	let response = client
		.post("/admin/api/post/action?pks=1&pks=2&name=delete", &[])
		.await
		.unwrap();
	assert_eq!(response.status_code(), status);
}

#[rstest]
#[tokio::test]
async fn test_delete_reports_count_and_removes_rows(client: TestClient) {
	let admin = as_user(client, "admin");

	let response = admin
		.post("/admin/api/post/action?pks=1&pks=2&name=delete", &[])
		.await
		.unwrap();
	assert_eq!(
		response.json().unwrap()["msg"],
		"2 items were successfully deleted"
	);

	let body = admin.get("/admin/api/post").await.unwrap().json().unwrap();
	assert_eq!(body["total"], 3);
}

#[rstest]
#[tokio::test]
async fn test_forbidden_and_unknown_actions(client: TestClient) {
	let john = as_user(client, "john");
	let response = john
		.post("/admin/api/post/action?pks=1&name=delete", &[])
		.await
		.unwrap();
	assert_eq!(response.json().unwrap()["msg"], "Forbidden");

	let admin = as_user(john, "admin");
	let response = admin
		.post("/admin/api/post/action?pks=1&name=archive", &[])
		.await
		.unwrap();
	assert_eq!(response.status_code(), 400);
	assert_eq!(response.json().unwrap()["msg"], "Invalid action 'archive'");
}
