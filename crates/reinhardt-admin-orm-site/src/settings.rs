//! Admin site settings
//!
//! Settings are plain serde data. Every key has a default, so an empty TOML
//! document is a valid configuration:
//!
//! ```toml
//! title = "Blog Admin"
//! base_url = "/admin"
//! page_size = 25
//! app_name = "blog"
//! ```

use crate::auth::DEFAULT_SESSION_COOKIE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings loading error
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("Invalid setting '{key}': {message}")]
	Invalid { key: &'static str, message: String },
}

/// Admin site settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
	/// Title shown in the page header
	pub title: String,
	/// Mount point of the admin site, without trailing slash
	pub base_url: String,
	/// Login route relative to `base_url`
	pub login_path: String,
	/// Logout route relative to `base_url`
	pub logout_path: String,
	/// Cookie carrying the session value, copied into every
	/// [`RequestState`](crate::RequestState)
	pub session_cookie: String,
	/// Default page size for views that do not set their own
	pub page_size: usize,
	/// Application label prefixed to view and relation identities of views
	/// built for this site
	pub app_name: Option<String>,
	/// Directory of extra `*.html` templates that override or extend the
	/// built-in ones
	pub templates_dir: Option<PathBuf>,
}

impl Default for AdminSettings {
	fn default() -> Self {
		Self {
			title: "Admin".to_string(),
			base_url: "/admin".to_string(),
			login_path: "/login".to_string(),
			logout_path: "/logout".to_string(),
			session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
			page_size: 10,
			app_name: None,
			templates_dir: None,
		}
	}
}

impl AdminSettings {
	/// Parse and validate settings from a TOML document.
	///
	/// # Errors
	///
	/// Returns [`SettingsError::Parse`] for malformed TOML and
	/// [`SettingsError::Invalid`] when a value fails validation.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Read settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();
		self
	}

	pub fn with_logout_path(mut self, path: impl Into<String>) -> Self {
		self.logout_path = path.into();
		self
	}

	pub fn with_page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
		self.app_name = Some(app_name.into());
		self
	}

	pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.templates_dir = Some(dir.into());
		self
	}

	/// Check invariants the router relies on.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if !self.base_url.starts_with('/') || (self.base_url.len() > 1 && self.base_url.ends_with('/'))
		{
			return Err(SettingsError::Invalid {
				key: "base_url",
				message: format!(
					"must start with '/' and not end with '/', got '{}'",
					self.base_url
				),
			});
		}
		for (key, path) in [
			("login_path", &self.login_path),
			("logout_path", &self.logout_path),
		] {
			if !path.starts_with('/') || path.len() < 2 {
				return Err(SettingsError::Invalid {
					key,
					message: format!("must be a non-root path starting with '/', got '{}'", path),
				});
			}
		}
		if self.page_size == 0 {
			return Err(SettingsError::Invalid {
				key: "page_size",
				message: "must be greater than zero".to_string(),
			});
		}
		if self.session_cookie.is_empty() {
			return Err(SettingsError::Invalid {
				key: "session_cookie",
				message: "must not be empty".to_string(),
			});
		}
		Ok(())
	}

	/// Base URL with the root mount collapsed to an empty prefix.
	pub(crate) fn prefix(&self) -> &str {
		if self.base_url == "/" { "" } else { &self.base_url }
	}
}
