//! Static-roles auth provider
//!
//! Users and their roles are fixed at construction. A successful login
//! stores the username in the site's session cookie; later requests are
//! authenticated by looking that cookie up in the user table.

use async_trait::async_trait;
use reinhardt_admin_orm_site::{
	AdminResponse, AuthProvider, DEFAULT_SESSION_COOKIE, LoginError, RequestState,
};
use std::collections::BTreeMap;

/// Cookie holding the signed-in username under default settings
pub const SESSION_COOKIE: &str = DEFAULT_SESSION_COOKIE;

/// Password accepted for every user
pub const DEFAULT_PASSWORD: &str = "password";

const MIN_USERNAME_LEN: usize = 3;

/// Auth provider backed by an in-memory user table
///
/// The default table:
///
/// | user    | roles                                     |
/// |---------|-------------------------------------------|
/// | `admin` | `admin`                                   |
/// | `john`  | `post:list`, `post:detail`                |
/// | `terry` | `post:list`, `post:create`, `post:edit`   |
/// | `doe`   | none                                      |
#[derive(Debug, Clone)]
pub struct StaticRolesAuthProvider {
	users: BTreeMap<String, Vec<String>>,
	password: String,
	login_path: Option<String>,
}

impl Default for StaticRolesAuthProvider {
	fn default() -> Self {
		let users = [
			("admin", vec!["admin"]),
			("john", vec!["post:list", "post:detail"]),
			("terry", vec!["post:list", "post:create", "post:edit"]),
			("doe", vec![""]),
		]
		.into_iter()
		.map(|(user, roles)| {
			(
				user.to_string(),
				roles.into_iter().map(str::to_string).collect(),
			)
		})
		.collect();
		Self {
			users,
			password: DEFAULT_PASSWORD.to_string(),
			login_path: None,
		}
	}
}

impl StaticRolesAuthProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Serve the login page at `path` instead of the site default.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = Some(path.into());
		self
	}

	/// Add or replace a user.
	pub fn with_user<I, S>(mut self, username: impl Into<String>, roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.users
			.insert(username.into(), roles.into_iter().map(Into::into).collect());
		self
	}

	pub fn roles(&self, username: &str) -> Option<&[String]> {
		self.users.get(username).map(Vec::as_slice)
	}
}

#[async_trait]
impl AuthProvider for StaticRolesAuthProvider {
	fn login_path(&self) -> Option<&str> {
		self.login_path.as_deref()
	}

	async fn login(
		&self,
		username: &str,
		password: &str,
		_remember_me: bool,
		state: &RequestState,
		response: AdminResponse,
	) -> Result<AdminResponse, LoginError> {
		if username.chars().count() < MIN_USERNAME_LEN {
			return Err(LoginError::field(
				"username",
				format!("Ensure username has at least {:02} characters", MIN_USERNAME_LEN),
			));
		}
		if self.users.contains_key(username) && password == self.password {
			return Ok(response.set_cookie(&state.session_cookie, username));
		}
		Err(LoginError::LoginFailed(
			"Invalid username or password".to_string(),
		))
	}

	async fn is_authenticated(&self, state: &mut RequestState) -> bool {
		let Some(username) = state.session().map(str::to_string) else {
			return false;
		};
		match self.users.get(&username) {
			Some(roles) => {
				state.roles = roles.clone();
				state.user = Some(username);
				true
			}
			None => false,
		}
	}

	async fn logout(&self, state: &RequestState, response: AdminResponse) -> AdminResponse {
		response.delete_cookie(&state.session_cookie)
	}
}
