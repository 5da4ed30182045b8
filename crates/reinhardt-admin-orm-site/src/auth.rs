//! Authentication provider contract
//!
//! The site delegates every authentication decision to an [`AuthProvider`]:
//! it checks credentials on login, restores the user from the request on
//! every protected route, and clears whatever it stored on logout. What the
//! provider stores (a session cookie, a token) is its own business.

use crate::response::AdminResponse;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Session cookie name used when settings do not override it
pub const DEFAULT_SESSION_COOKIE: &str = "session";

/// Per-request state shared between the site, the auth provider and views
///
/// The provider fills `user` and `roles` from `is_authenticated`; views read
/// them in their permission hooks. The site sets `session_cookie` from its
/// settings before the provider sees the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestState {
	/// Cookies sent with the request
	pub cookies: BTreeMap<String, String>,
	/// Name of the cookie carrying the session value
	pub session_cookie: String,
	/// Authenticated username
	pub user: Option<String>,
	/// Roles granted to the user
	pub roles: Vec<String>,
}

impl Default for RequestState {
	fn default() -> Self {
		Self {
			cookies: BTreeMap::new(),
			session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
			user: None,
			roles: Vec::new(),
		}
	}
}

impl RequestState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Value of the session cookie, if sent.
	pub fn session(&self) -> Option<&str> {
		self.cookie(&self.session_cookie)
	}

	pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.insert(name.into(), value.into());
		self
	}

	pub fn cookie(&self, name: &str) -> Option<&str> {
		self.cookies.get(name).map(String::as_str)
	}

	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|r| r == role)
	}

	/// True when any of `roles` is granted.
	pub fn has_any_role(&self, roles: &[&str]) -> bool {
		roles.iter().any(|role| self.has_role(role))
	}
}

/// User shown in the admin header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUser {
	pub username: String,
	pub photo_url: Option<String>,
}

impl AdminUser {
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			photo_url: None,
		}
	}
}

/// Login failure reported by an [`AuthProvider`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
	/// Submitted form values are invalid, keyed by field name
	#[error("Invalid login form")]
	FormValidation(BTreeMap<String, String>),

	/// Credentials were rejected
	#[error("{0}")]
	LoginFailed(String),
}

impl LoginError {
	/// Validation error for a single field.
	pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
		let mut errors = BTreeMap::new();
		errors.insert(name.into(), message.into());
		LoginError::FormValidation(errors)
	}
}

/// Authentication backend for the admin site
///
/// Every method has a default; the defaults reject all logins with
/// "Not Implemented" and never authenticate a request.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reinhardt_admin_orm_site::{AdminResponse, AuthProvider, LoginError, RequestState};
///
/// struct SingleUser;
///
/// #[async_trait]
/// impl AuthProvider for SingleUser {
///     async fn login(
///         &self,
///         username: &str,
///         password: &str,
///         _remember_me: bool,
///         state: &RequestState,
///         response: AdminResponse,
///     ) -> Result<AdminResponse, LoginError> {
///         if username == "root" && password == "secret" {
///             Ok(response.set_cookie(&state.session_cookie, username))
///         } else {
///             Err(LoginError::LoginFailed("Invalid username or password".into()))
///         }
///     }
///
///     async fn is_authenticated(&self, state: &mut RequestState) -> bool {
///         match state.session().map(str::to_string) {
///             Some(user) if user == "root" => {
///                 state.user = Some(user);
///                 true
///             }
///             _ => false,
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait AuthProvider: Send + Sync {
	/// Login route relative to the admin base URL. `None` uses the site
	/// settings.
	fn login_path(&self) -> Option<&str> {
		None
	}

	/// Logout route relative to the admin base URL. `None` uses the site
	/// settings.
	fn logout_path(&self) -> Option<&str> {
		None
	}

	/// Check credentials and return `response` carrying whatever the
	/// provider needs to recognise the user on later requests.
	///
	/// # Errors
	///
	/// [`LoginError::FormValidation`] for malformed input,
	/// [`LoginError::LoginFailed`] for rejected credentials.
	async fn login(
		&self,
		username: &str,
		password: &str,
		remember_me: bool,
		state: &RequestState,
		response: AdminResponse,
	) -> Result<AdminResponse, LoginError> {
		let _ = (username, password, remember_me, state, response);
		Err(LoginError::LoginFailed("Not Implemented".to_string()))
	}

	/// Restore the user from the request, filling `state.user` and
	/// `state.roles`.
	async fn is_authenticated(&self, state: &mut RequestState) -> bool {
		let _ = state;
		false
	}

	/// User shown in page headers.
	fn admin_user(&self, state: &RequestState) -> Option<AdminUser> {
		state.user.as_deref().map(AdminUser::new)
	}

	/// Forget the user; the returned response is sent to the client.
	async fn logout(&self, state: &RequestState, response: AdminResponse) -> AdminResponse {
		let _ = state;
		response
	}
}

/// Provider with every default in place
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseAuthProvider;

impl AuthProvider for BaseAuthProvider {}
