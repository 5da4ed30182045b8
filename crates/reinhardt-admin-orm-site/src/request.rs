//! Incoming request parsing

use crate::auth::RequestState;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HOST};
use http::Method;
use std::collections::BTreeMap;

/// Request as seen by the admin router
#[derive(Debug, Clone)]
pub struct AdminRequest {
	pub method: Method,
	/// Path without query string
	pub path: String,
	/// `scheme://host`
	pub origin: String,
	/// Absolute URL of the request, including the query string
	pub url: String,
	pub query: Vec<(String, String)>,
	/// Urlencoded form fields, empty for other body types
	pub form: Vec<(String, String)>,
	pub state: RequestState,
}

impl AdminRequest {
	/// Parse an HTTP request.
	///
	/// The origin is taken from the URI when it is absolute, otherwise from
	/// the `Host` header, defaulting to `http://localhost`.
	pub fn from_http(request: http::Request<Bytes>) -> Self {
		let (parts, body) = request.into_parts();

		let scheme = parts.uri.scheme_str().unwrap_or("http").to_string();
		let host = parts
			.uri
			.authority()
			.map(|a| a.as_str().to_string())
			.or_else(|| {
				parts
					.headers
					.get(HOST)
					.and_then(|v| v.to_str().ok())
					.map(str::to_string)
			})
			.unwrap_or_else(|| "localhost".to_string());
		let origin = format!("{}://{}", scheme, host);

		let path = parts.uri.path().to_string();
		let query = parts
			.uri
			.query()
			.map(|q| parse_urlencoded(q.as_bytes()))
			.unwrap_or_default();
		let url = match parts.uri.query() {
			Some(q) => format!("{}{}?{}", origin, path, q),
			None => format!("{}{}", origin, path),
		};

		let is_form = parts
			.headers
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
			.unwrap_or(true);
		let form = if is_form && !body.is_empty() {
			parse_urlencoded(&body)
		} else {
			Vec::new()
		};

		let mut cookies = BTreeMap::new();
		for header in parts.headers.get_all(COOKIE) {
			if let Ok(header) = header.to_str() {
				cookies.extend(parse_cookies(header));
			}
		}

		Self {
			method: parts.method,
			path,
			origin,
			url,
			query,
			form,
			state: RequestState {
				cookies,
				..Default::default()
			},
		}
	}

	/// First value of a query parameter
	pub fn query_param(&self, name: &str) -> Option<&str> {
		first(&self.query, name)
	}

	/// Every value of a repeatable query parameter
	pub fn query_params(&self, name: &str) -> Vec<&str> {
		all(&self.query, name)
	}

	/// First value of a form field
	pub fn form_value(&self, name: &str) -> Option<&str> {
		first(&self.form, name)
	}

	/// Every value of a repeatable form field
	pub fn form_values(&self, name: &str) -> Vec<&str> {
		all(&self.form, name)
	}

	pub fn has_form_field(&self, name: &str) -> bool {
		self.form.iter().any(|(key, _)| key == name)
	}
}

fn first<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
	pairs
		.iter()
		.find(|(key, _)| key == name)
		.map(|(_, value)| value.as_str())
}

fn all<'a>(pairs: &'a [(String, String)], name: &str) -> Vec<&'a str> {
	pairs
		.iter()
		.filter(|(key, _)| key == name)
		.map(|(_, value)| value.as_str())
		.collect()
}

fn parse_urlencoded(input: &[u8]) -> Vec<(String, String)> {
	serde_urlencoded::from_bytes(input).unwrap_or_else(|e| {
		tracing::debug!(error = %e, "Ignoring malformed urlencoded data");
		Vec::new()
	})
}

/// Parse a `Cookie` header into name/value pairs.
pub fn parse_cookies(header: &str) -> BTreeMap<String, String> {
	header
		.split(';')
		.filter_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			let name = name.trim();
			if name.is_empty() {
				return None;
			}
			Some((name.to_string(), value.trim().trim_matches('"').to_string()))
		})
		.collect()
}
