//! # ORM Model View Integration Tests
//!
//! Serves `Author` and `Book` through `OrmModelView` on a site without an
//! auth provider and checks that forms, filters and ordering reach the
//! repository in its native shape.

use reinhardt_admin_orm_contrib::OrmModelView;
use reinhardt_admin_orm_integration_tests::library::{Author, Library, library_site};
use reinhardt_admin_orm_models::Repository;
use reinhardt_admin_orm_site::{AdminSettings, AdminSite};
use reinhardt_admin_orm_testkit::TestClient;
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;

#[fixture]
fn library() -> Library {
	library_site()
}

fn ids(body: &Value) -> Vec<i64> {
	body["items"]
		.as_array()
		.map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
		.unwrap_or_default()
}

#[rstest]
#[tokio::test]
async fn test_views_are_registered_by_identity(library: Library) {
	assert_eq!(library.site.model_identities(), vec!["author", "book"]);

	let client = TestClient::new(library.site);
	let text = client.get("/admin/").await.unwrap().text();
	assert!(text.contains("Authors"));
	assert!(text.contains("Books"));
}

#[rstest]
#[tokio::test]
async fn test_api_exposes_fk_under_field_name(library: Library) {
	let client = TestClient::new(library.site);

	let body = client.get("/admin/api/book?pks=2").await.unwrap().json().unwrap();

	assert_eq!(body["items"][0]["author"], 2);
	assert!(body["items"][0].get("author_id").is_none());
}

#[rstest]
#[case("pages%20desc", vec![2, 1, 3])]
#[case("pages%20ASC", vec![3, 1, 2])]
#[case("title", vec![1, 3, 2])]
#[case("author%20desc&order_by=pages%20asc", vec![2, 3, 1])]
#[tokio::test]
async fn test_api_ordering(library: Library, #[case] order_by: &str, #[case] expected: Vec<i64>) {
	let client = TestClient::new(library.site);

	let body = client
		.get(&format!("/admin/api/book?limit=10&order_by={}", order_by))
		.await
		.unwrap()
		.json()
		.unwrap();

	assert_eq!(ids(&body), expected);
}

#[rstest]
#[case("pages%20sideways")]
#[case("pages%20desc%20now")]
#[tokio::test]
async fn test_api_rejects_malformed_direction(library: Library, #[case] order_by: &str) {
	let client = TestClient::new(library.site);

	let response = client
		.get(&format!("/admin/api/book?order_by={}", order_by))
		.await
		.unwrap();

	assert_eq!(response.status_code(), 400);
}

#[rstest]
#[tokio::test]
async fn test_api_filter_by_fk(library: Library) {
	let client = TestClient::new(library.site);

	// {"author": 1}
	let body = client
		.get("/admin/api/book?where=%7B%22author%22%3A1%7D&order_by=id%20asc")
		.await
		.unwrap()
		.json()
		.unwrap();

	assert_eq!(body["total"], 2);
	assert_eq!(ids(&body), vec![1, 3]);
}

#[rstest]
#[tokio::test]
async fn test_api_search_term(library: Library) {
	let client = TestClient::new(library.site);

	let body = client.get("/admin/api/book?where=SEQUEL").await.unwrap().json().unwrap();

	assert_eq!(body["total"], 1);
	assert_eq!(ids(&body), vec![3]);
}

#[rstest]
#[tokio::test]
async fn test_api_search_without_searchable_fields(library: Library) {
	let view = OrmModelView::<Author, _>::new(library.authors.clone()).unwrap();
	let mut site = AdminSite::new(AdminSettings::default()).unwrap();
	site.add_view(Arc::new(view)).unwrap();
	let client = TestClient::new(Arc::new(site));

	let body = client
		.get("/admin/api/author?where=zzzz-no-such-text")
		.await
		.unwrap()
		.json()
		.unwrap();
	assert_eq!(body["total"], 0);
	assert_eq!(ids(&body), Vec::<i64>::new());

	let body = client.get("/admin/api/author").await.unwrap().json().unwrap();
	assert_eq!(body["total"], 2);
}

#[rstest]
#[tokio::test]
async fn test_list_page_hides_excluded_column(library: Library) {
	let client = TestClient::new(library.site);

	let text = client.get("/admin/book/list").await.unwrap().text();

	assert!(text.contains("<th>Title</th>"));
	assert!(!text.contains("<th>summary</th>"));
	assert!(text.contains("Page 1 of 2 (3 total)"));
}

#[rstest]
#[tokio::test]
async fn test_create_form_renders_field_kinds(library: Library) {
	let client = TestClient::new(library.site);

	let response = client.get("/admin/book/create").await.unwrap();
	let text = response.text();

	assert_eq!(response.status_code(), 200);
	assert!(text.contains(r#"<option value="essay">Essay</option>"#));
	assert!(text.contains(r#"<input type="hidden" name="in_print" value="off">"#));
	assert!(text.contains(r#"maxlength="120""#));
	assert!(!text.contains(r#"name="id""#));
}

#[rstest]
#[tokio::test]
async fn test_create_stores_native_row(library: Library) {
	let books = library.books.clone();
	let client = TestClient::new(library.site);

	let response = client
		.post(
			"/admin/book/create",
			&[
				("title", "Persuasion"),
				("summary", ""),
				("pages", "249"),
				("genre", "fiction"),
				("in_print", "off"),
				("in_print", "on"),
				("published", "1817-12-20"),
				("author", "2"),
			],
		)
		.await
		.unwrap();

	assert_eq!(response.status_code(), 303);
	assert_eq!(response.location(), Some("http://testserver/admin/book/list"));

	let stored = books.get(4).await.unwrap().unwrap();
	assert_eq!(stored.get("author_id"), Some(&json!(2)));
	assert_eq!(stored.get("in_print"), Some(&json!(true)));
	assert_eq!(stored.get("published"), Some(&json!("1817-12-20")));
	assert!(!stored.contains_key("author"));
	assert!(!stored.contains_key("summary"));
}

#[rstest]
#[tokio::test]
async fn test_create_reports_field_errors(library: Library) {
	let books = library.books.clone();
	let client = TestClient::new(library.site);

	let response = client
		.post(
			"/admin/book/create",
			&[
				("title", ""),
				("pages", "many"),
				("genre", "poetry"),
				("author", "1"),
			],
		)
		.await
		.unwrap();

	assert_eq!(response.status_code(), 422);
	let text = response.text();
	assert!(text.contains("This field is required."));
	assert!(text.contains("Enter a whole number."));
	assert!(text.contains("Select a valid choice."));
	assert_eq!(books.len(), 3);
}

#[rstest]
#[tokio::test]
async fn test_edit_moves_book_to_other_author(library: Library) {
	let books = library.books.clone();
	let client = TestClient::new(library.site);

	let response = client
		.post("/admin/book/edit/3", &[("author", "2"), ("summary", "")])
		.await
		.unwrap();

	assert_eq!(response.status_code(), 303);
	let stored = books.get(3).await.unwrap().unwrap();
	assert_eq!(stored.get("author_id"), Some(&json!(2)));
	assert_eq!(stored.get("summary"), Some(&json!("The sequel")));
	assert_eq!(stored.get("title"), Some(&json!("Dune Messiah")));
}

#[rstest]
#[tokio::test]
async fn test_detail_and_delete_without_auth_provider(library: Library) {
	let authors = library.authors.clone();
	let client = TestClient::new(library.site);

	let detail = client.get("/admin/author/detail/1").await.unwrap();
	assert_eq!(detail.status_code(), 200);
	assert!(detail.text().contains("Frank Herbert"));

	let response = client
		.post("/admin/api/author/action", &[("name", "delete"), ("pks", "1")])
		.await
		.unwrap();
	assert_eq!(response.status_code(), 200);
	assert_eq!(authors.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_unknown_identity(library: Library) {
	let client = TestClient::new(library.site);

	let page = client.get("/admin/shelf/list").await.unwrap();
	let api = client.get("/admin/api/shelf").await.unwrap();

	assert_eq!(page.status_code(), 404);
	assert_eq!(api.status_code(), 404);
	assert_eq!(
		api.json().unwrap()["msg"],
		"Model view 'shelf' is not registered with admin"
	);
}
