//! # reinhardt-admin-orm-site
//!
//! The admin site surface model views plug into:
//!
//! - **settings**: [`AdminSettings`], loaded from TOML
//! - **auth**: the [`AuthProvider`] contract and per-request [`RequestState`]
//! - **views**: [`ModelView`] and [`CustomView`] traits with permission hooks
//! - **site**: [`AdminSite`], which routes `http::Request`s to views and
//!   renders pages with Tera
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use reinhardt_admin_orm_site::{AdminSettings, AdminSite, BaseAuthProvider};
//!
//! # tokio_test::block_on(async {
//! let site = AdminSite::new(AdminSettings::default())
//!     .unwrap()
//!     .with_auth_provider(Arc::new(BaseAuthProvider));
//!
//! let request = http::Request::builder()
//!     .uri("/admin/login")
//!     .header("host", "testserver")
//!     .body(Bytes::new())
//!     .unwrap();
//! let response = site.handle(request).await;
//! assert_eq!(response.status(), 200);
//! # });
//! ```

pub mod actions;
pub mod auth;
pub mod request;
pub mod response;
pub mod settings;
pub mod site;
pub mod templates;
pub mod views;

pub use actions::{ActionResult, DELETE_ACTION};
pub use auth::{
	AdminUser, AuthProvider, BaseAuthProvider, DEFAULT_SESSION_COOKIE, LoginError, RequestState,
};
pub use request::AdminRequest;
pub use response::AdminResponse;
pub use settings::{AdminSettings, SettingsError};
pub use site::AdminSite;
pub use templates::{AdminTemplates, NavItem};
pub use views::{CustomView, ModelView, PermissionAction};

// Re-exported so custom views can build template contexts
pub use tera::Context as TemplateContext;
