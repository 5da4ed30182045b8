//! # Site Settings Integration Tests
//!
//! Builds sites from TOML settings files and checks that mount point, page
//! size and template overrides reach the rendered pages.
//!
//! ## Test Coverage
//!
//! 1. **Loading**: settings files, invalid values rejected by the site
//! 2. **Routing**: custom and root mount points
//! 3. **Templates**: project templates overriding the built-in ones
//! 4. **Naming**: session cookie name and app prefix taken from settings

use reinhardt_admin_orm_contrib::OrmModelView;
use reinhardt_admin_orm_integration_tests::library::Author;
use reinhardt_admin_orm_models::{MemoryRepository, Model};
use reinhardt_admin_orm_site::{AdminSettings, AdminSite};
use reinhardt_admin_orm_testkit::{StaticRolesAuthProvider, TestClient};
use reinhardt_admin_orm_types::AdminError;
use rstest::*;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn author_site(settings: AdminSettings) -> Arc<AdminSite> {
	let authors = Arc::new(MemoryRepository::for_model(Author::meta()));
	authors.reset(
		["Ursula K. Le Guin", "Octavia E. Butler", "Iain M. Banks"]
			.iter()
			.enumerate()
			.filter_map(|(i, name)| json!({"id": i + 1, "name": name}).as_object().cloned()),
	);
	let view = OrmModelView::<Author, _>::new(authors)
		.unwrap()
		.with_searchable_fields(["name"]);

	let mut site = AdminSite::new(settings).unwrap();
	site.add_view(Arc::new(view)).unwrap();
	Arc::new(site)
}

fn settings_file(source: &str) -> tempfile::NamedTempFile {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	write!(file, "{}", source).unwrap();
	file
}

// ========================================================================
// Loading
// ========================================================================

/// **Test Intent**: values from a settings file show up in rendered pages
#[rstest]
#[tokio::test]
async fn test_settings_file_drives_site() {
	let file = settings_file(
		r#"
		title = "Bookshop Admin"
		page_size = 2
		"#,
	);
	let settings = AdminSettings::from_file(file.path()).unwrap();
	let client = TestClient::new(author_site(settings));

	let text = client.get("/admin/author/list").await.unwrap().text();

	assert!(text.contains("Authors | Bookshop Admin"));
	assert!(text.contains("Page 1 of 2 (3 total)"));
	assert!(text.contains("Ursula K. Le Guin"));
	assert!(!text.contains("Iain M. Banks"));
}

/// **Test Intent**: settings that bypass `from_toml_str` are still
/// validated when the site is built
#[rstest]
#[case(AdminSettings::default().with_base_url("admin"))]
#[case(AdminSettings::default().with_page_size(0))]
#[case(AdminSettings::default().with_login_path("/"))]
fn test_site_rejects_invalid_settings(#[case] settings: AdminSettings) {
	match AdminSite::new(settings) {
		Err(AdminError::Config(message)) => assert!(message.starts_with("Invalid setting")),
		Err(other) => panic!("Expected Config error, got {:?}", other),
		Ok(_) => panic!("Expected Config error, got a site"),
	}
}

// ========================================================================
// Routing
// ========================================================================

/// **Test Intent**: every route moves with `base_url`
#[rstest]
#[tokio::test]
async fn test_custom_mount_point() {
	let file = settings_file(r#"base_url = "/backoffice""#);
	let site = author_site(AdminSettings::from_file(file.path()).unwrap());
	assert_eq!(site.url_path_for("index").as_deref(), Some("/backoffice/"));
	let client = TestClient::new(site);

	assert_eq!(client.get("/backoffice/").await.unwrap().status_code(), 200);
	assert_eq!(client.get("/backoffice").await.unwrap().status_code(), 200);
	assert_eq!(
		client.get("/backoffice/author/list").await.unwrap().status_code(),
		200
	);
	assert_eq!(client.get("/admin/").await.unwrap().status_code(), 404);
	assert_eq!(client.get("/backofficeX/").await.unwrap().status_code(), 404);

	let response = client
		.post("/backoffice/author/create", &[("name", "N. K. Jemisin")])
		.await
		.unwrap();
	assert_eq!(
		response.location(),
		Some("http://testserver/backoffice/author/list")
	);
}

/// **Test Intent**: a root mount serves the dashboard at `/`
#[rstest]
#[tokio::test]
async fn test_root_mount_point() {
	let site = author_site(AdminSettings::default().with_base_url("/"));
	assert_eq!(site.url_path_for("login").as_deref(), Some("/login"));
	let client = TestClient::new(site);

	let response = client.get("/").await.unwrap();
	assert_eq!(response.status_code(), 200);
	assert!(response.text().contains(r#"href="/author/list""#));

	let body = client.get("/api/author?pks=3").await.unwrap().json().unwrap();
	assert_eq!(body["items"][0]["name"], "Iain M. Banks");
}

// ========================================================================
// Templates
// ========================================================================

/// **Test Intent**: a project `index.html` replaces the built-in dashboard
/// while still extending `base.html`
#[rstest]
#[tokio::test]
async fn test_templates_dir_overrides_builtin() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(
		dir.path().join("index.html"),
		r#"{% extends "base.html" %}
{% block content %}<p class="welcome">Welcome to {{ title }}</p>{% endblock content %}"#,
	)
	.unwrap();
	let settings_source = format!(
		"title = \"Shop\"\ntemplates_dir = \"{}\"\n",
		dir.path().display().to_string().replace('\\', "/")
	);
	let file = settings_file(&settings_source);
	let client = TestClient::new(author_site(AdminSettings::from_file(file.path()).unwrap()));

	let text = client.get("/admin/").await.unwrap().text();

	assert!(text.contains(r#"<p class="welcome">Welcome to Shop</p>"#));
	assert!(text.contains(r#"<span class="nav-link-title">Authors</span>"#));
	assert!(!text.contains("dashboard"));
}

/// **Test Intent**: a broken project template fails site construction
#[rstest]
fn test_broken_template_fails_site() {
	let dir = tempfile::tempdir().unwrap();
	std::fs::write(dir.path().join("index.html"), "{% block content %}").unwrap();

	let result = AdminSite::new(AdminSettings::default().with_templates_dir(dir.path()));

	assert!(matches!(result, Err(AdminError::Template(_))));
}

/// **Test Intent**: records created through a site share the repository
/// handed to the view
#[rstest]
#[tokio::test]
async fn test_created_author_is_listed() {
	let client = TestClient::new(author_site(AdminSettings::default()));

	client
		.post("/admin/author/create", &[("name", "Ted Chiang")])
		.await
		.unwrap();
	let body = client
		.get("/admin/api/author?where=chiang")
		.await
		.unwrap()
		.json()
		.unwrap();

	assert_eq!(body["total"], 1);
	assert_eq!(body["items"][0]["id"], 4);
}

// ========================================================================
// Naming
// ========================================================================

/// **Test Intent**: the auth provider reads and writes the cookie named by
/// `session_cookie`, and the default name no longer authenticates
#[rstest]
#[tokio::test]
async fn test_session_cookie_name_from_settings() {
	let file = settings_file(r#"session_cookie = "backoffice_sid""#);
	let site = AdminSite::new(AdminSettings::from_file(file.path()).unwrap())
		.unwrap()
		.with_auth_provider(Arc::new(StaticRolesAuthProvider::new()));
	let client = TestClient::new(Arc::new(site)).with_cookie("session", "admin");

	assert_eq!(client.get("/admin/").await.unwrap().status_code(), 303);

	let response = client
		.post(
			"/admin/login",
			&[("username", "admin"), ("password", "password")],
		)
		.await
		.unwrap();
	assert_eq!(response.status_code(), 303);
	assert_eq!(response.cookie("backoffice_sid").as_deref(), Some("admin"));
	assert_eq!(client.get("/admin/").await.unwrap().status_code(), 200);

	let response = client.get("/admin/logout").await.unwrap();
	assert!(
		response
			.set_cookies()
			.iter()
			.any(|c| c.starts_with("backoffice_sid=;"))
	);
	assert!(client.cookie("backoffice_sid").is_none());
}

/// **Test Intent**: views built for a site carry its `app_name` prefix in
/// their identity and routes
#[rstest]
#[tokio::test]
async fn test_app_name_prefixes_view_routes() {
	let file = settings_file(r#"app_name = "shop""#);
	let settings = AdminSettings::from_file(file.path()).unwrap();
	let authors = Arc::new(MemoryRepository::for_model(Author::meta()));
	let view = OrmModelView::<Author, _>::for_site(authors, &settings).unwrap();

	let mut site = AdminSite::new(settings).unwrap();
	site.add_view(Arc::new(view)).unwrap();
	assert_eq!(site.model_identities(), vec!["shop_author"]);
	let client = TestClient::new(Arc::new(site));

	assert_eq!(client.get("/admin/shop_author/list").await.unwrap().status_code(), 200);
	assert_eq!(client.get("/admin/author/list").await.unwrap().status_code(), 404);
}
