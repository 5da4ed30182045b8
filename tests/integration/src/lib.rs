//! Integration test utilities for reinhardt-admin-orm
//!
//! Shared sites, models and a log capture layer used across the
//! integration test binaries.

pub mod library;
pub mod log_capture;

use reinhardt_admin_orm_site::{AdminSettings, AdminSite, AuthProvider};
use std::sync::Arc;

/// Site at `/admin` with `provider` and no views.
pub fn site_with_provider(provider: Arc<dyn AuthProvider>) -> Arc<AdminSite> {
	let site = AdminSite::new(AdminSettings::default())
		.expect("default settings are valid")
		.with_auth_provider(provider);
	Arc::new(site)
}

/// Login form body.
pub fn login_form<'a>(username: &'a str, password: &'a str) -> Vec<(&'a str, &'a str)> {
	vec![
		("username", username),
		("password", password),
		("remember_me", "on"),
	]
}
