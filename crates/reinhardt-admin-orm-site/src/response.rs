//! Admin responses
//!
//! [`AdminResponse`] is the value auth providers receive and return from
//! `login` and `logout`, so cookie handling stays independent of the HTTP
//! body type.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use serde_json::Value;

/// Response under construction
#[derive(Debug, Clone)]
pub struct AdminResponse {
	status: StatusCode,
	headers: HeaderMap,
	cookies: Vec<String>,
	body: Bytes,
}

impl AdminResponse {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			cookies: Vec::new(),
			body: Bytes::new(),
		}
	}

	/// HTML page response
	pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
		Self::new(status)
			.with_header(CONTENT_TYPE, "text/html; charset=utf-8")
			.with_body(body.into())
	}

	/// JSON response
	pub fn json(status: StatusCode, value: &Value) -> Self {
		Self::new(status)
			.with_header(CONTENT_TYPE, "application/json")
			.with_body(value.to_string())
	}

	/// Plain text response
	pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
		Self::new(status)
			.with_header(CONTENT_TYPE, "text/plain; charset=utf-8")
			.with_body(body.into())
	}

	/// 303 See Other to `location`
	pub fn redirect(location: &str) -> Self {
		Self::new(StatusCode::SEE_OTHER).with_header(LOCATION, location)
	}

	/// Set a header, ignoring values that are not valid header text.
	pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
		match HeaderValue::from_str(value) {
			Ok(value) => {
				self.headers.insert(name, value);
			}
			Err(e) => tracing::warn!(header = %name, error = %e, "Dropping invalid header value"),
		}
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add an HTTP-only session cookie scoped to the whole host.
	pub fn set_cookie(mut self, name: &str, value: &str) -> Self {
		self.cookies
			.push(format!("{}={}; HttpOnly; Path=/; SameSite=Lax", name, value));
		self
	}

	/// Expire a cookie on the client.
	pub fn delete_cookie(mut self, name: &str) -> Self {
		self.cookies.push(format!(
			"{}=; HttpOnly; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
			name
		));
		self
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// `Set-Cookie` values added so far
	pub fn cookies(&self) -> &[String] {
		&self.cookies
	}

	pub fn body(&self) -> &Bytes {
		&self.body
	}

	/// Convert into an [`http::Response`].
	pub fn into_http(self) -> http::Response<Full<Bytes>> {
		let mut response = http::Response::new(Full::new(self.body));
		*response.status_mut() = self.status;
		*response.headers_mut() = self.headers;
		for cookie in self.cookies {
			if let Ok(value) = HeaderValue::from_str(&cookie) {
				response.headers_mut().append(SET_COOKIE, value);
			}
		}
		response
	}
}
