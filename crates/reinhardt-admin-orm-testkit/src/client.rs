//! In-process client for the admin site
//!
//! Requests go straight to [`AdminSite::handle`]; nothing listens on a
//! socket. Cookies set by responses are kept in a jar and sent with later
//! requests, like a browser session.

use anyhow::{Context as _, bail};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use http::{HeaderMap, Method, StatusCode};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use reinhardt_admin_orm_site::AdminSite;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

const MAX_REDIRECTS: usize = 10;

/// Response with its body collected
#[derive(Debug, Clone)]
pub struct TestResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Bytes,
}

impl TestResponse {
	pub async fn new(response: http::Response<http_body_util::Full<Bytes>>) -> anyhow::Result<Self> {
		let (parts, body) = response.into_parts();
		let body = body.collect().await?.to_bytes();
		Ok(Self {
			status: parts.status,
			headers: parts.headers,
			body,
		})
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn status_code(&self) -> u16 {
		self.status.as_u16()
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// `Location` header of a redirect
	pub fn location(&self) -> Option<&str> {
		self.header(LOCATION.as_str())
	}

	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).to_string()
	}

	pub fn json(&self) -> anyhow::Result<Value> {
		serde_json::from_slice(&self.body).context("response body is not JSON")
	}

	/// Raw `Set-Cookie` header values
	pub fn set_cookies(&self) -> Vec<&str> {
		self.headers
			.get_all(SET_COOKIE)
			.iter()
			.filter_map(|v| v.to_str().ok())
			.collect()
	}

	/// Value of a cookie set by this response.
	///
	/// Cookies the response expires (`Max-Age=0`) are reported as absent.
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.set_cookies()
			.into_iter()
			.filter_map(parse_set_cookie)
			.rfind(|cookie| cookie.name == name)
			.filter(|cookie| !cookie.expired)
			.map(|cookie| cookie.value)
	}
}

struct SetCookie {
	name: String,
	value: String,
	expired: bool,
}

fn parse_set_cookie(header: &str) -> Option<SetCookie> {
	let mut parts = header.split(';').map(str::trim);
	let (name, value) = parts.next()?.split_once('=')?;
	let expired = parts.any(|attr| attr.eq_ignore_ascii_case("max-age=0"));
	Some(SetCookie {
		name: name.to_string(),
		value: value.to_string(),
		expired,
	})
}

/// Client bound to one [`AdminSite`]
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_site::{AdminSettings, AdminSite};
/// use reinhardt_admin_orm_testkit::{StaticRolesAuthProvider, TestClient};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let site = AdminSite::new(AdminSettings::default())
///     .unwrap()
///     .with_auth_provider(Arc::new(StaticRolesAuthProvider::new()));
/// let client = TestClient::new(Arc::new(site));
///
/// let response = client.get("/admin/").await.unwrap();
/// assert_eq!(response.status_code(), 303);
/// # });
/// ```
pub struct TestClient {
	site: Arc<AdminSite>,
	base_url: String,
	cookies: Mutex<BTreeMap<String, String>>,
}

impl TestClient {
	/// Client for `http://testserver`
	pub fn new(site: Arc<AdminSite>) -> Self {
		Self {
			site,
			base_url: "http://testserver".to_string(),
			cookies: Mutex::new(BTreeMap::new()),
		}
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	/// Start with a cookie in the jar.
	pub fn with_cookie(self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.lock().insert(name.into(), value.into());
		self
	}

	pub fn cookie(&self, name: &str) -> Option<String> {
		self.cookies.lock().get(name).cloned()
	}

	pub fn clear_cookies(&self) {
		self.cookies.lock().clear();
	}

	pub async fn get(&self, path: &str) -> anyhow::Result<TestResponse> {
		self.request(Method::GET, path, None).await
	}

	/// POST `form` urlencoded. An empty slice sends no body.
	pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> anyhow::Result<TestResponse> {
		let body = if form.is_empty() {
			None
		} else {
			Some(serde_urlencoded::to_string(form)?)
		};
		self.request(Method::POST, path, body).await
	}

	/// Follow `303`/`302`/`307` redirects from `response` with GET requests.
	///
	/// # Errors
	///
	/// Fails after too many redirects or on a redirect without `Location`.
	pub async fn follow_redirects(&self, response: TestResponse) -> anyhow::Result<TestResponse> {
		let mut response = response;
		for _ in 0..MAX_REDIRECTS {
			if !response.status().is_redirection() {
				return Ok(response);
			}
			let location = response
				.location()
				.context("redirect without Location header")?
				.to_string();
			response = self.get(&location).await?;
		}
		bail!("more than {} redirects", MAX_REDIRECTS)
	}

	async fn request(&self, method: Method, path: &str, body: Option<String>) -> anyhow::Result<TestResponse> {
		let url = if path.starts_with("http://") || path.starts_with("https://") {
			path.to_string()
		} else {
			format!("{}{}", self.base_url, path)
		};

		let mut builder = http::Request::builder().method(method.clone()).uri(&url);
		let cookie_header = self.cookie_header();
		if !cookie_header.is_empty() {
			builder = builder.header(COOKIE, cookie_header);
		}
		if body.is_some() {
			builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
		}
		let request = builder.body(body.map(Bytes::from).unwrap_or_default())?;

		let response = TestResponse::new(self.site.handle(request).await).await?;
		self.store_cookies(&response);
		tracing::debug!(
			method = %method,
			url = %url,
			status = response.status_code(),
			"Test request"
		);
		Ok(response)
	}

	fn cookie_header(&self) -> String {
		self.cookies
			.lock()
			.iter()
			.map(|(name, value)| format!("{}={}", name, value))
			.collect::<Vec<_>>()
			.join("; ")
	}

	fn store_cookies(&self, response: &TestResponse) {
		let mut jar = self.cookies.lock();
		for cookie in response.set_cookies().into_iter().filter_map(parse_set_cookie) {
			if cookie.expired {
				jar.remove(&cookie.name);
			} else {
				jar.insert(cookie.name, cookie.value);
			}
		}
	}
}
