//! Error types for the admin site and its ORM adapter

use std::collections::BTreeMap;
use thiserror::Error;

/// Admin error type
#[derive(Debug, Error)]
pub enum AdminError {
	/// The ORM field type has no admin field counterpart
	#[error("No admin field is mapped for ORM field type '{0}'")]
	UnmappedFieldType(String),

	/// An order-by directive could not be translated
	#[error("Invalid order-by directive '{0}'")]
	InvalidOrderBy(String),

	/// No model view is registered under the identity
	#[error("Model view '{0}' is not registered with admin")]
	ModelNotRegistered(String),

	/// Object lookup failed
	#[error("Object not found: {0}")]
	NotFound(String),

	/// Permission denied
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Form validation failed, keyed by field name
	#[error("Validation error: {}", join_field_errors(.0))]
	Validation(BTreeMap<String, String>),

	/// A batch action could not be executed
	#[error("Action failed: {0}")]
	ActionFailed(String),

	/// Storage layer error
	#[error("Database error: {0}")]
	Database(String),

	/// Template rendering error
	#[error("Template rendering error: {0}")]
	Template(String),

	/// Invalid admin settings
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Result type for admin operations
pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
	/// Builds a validation error for a single field.
	pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
		let mut errors = BTreeMap::new();
		errors.insert(name.into(), message.into());
		AdminError::Validation(errors)
	}

	/// HTTP status code used when the error reaches a response.
	///
	/// Internal failures (database, template, configuration, unmapped
	/// field types) all collapse to 500 so details stay server-side.
	pub fn status_code(&self) -> u16 {
		match self {
			AdminError::InvalidOrderBy(_) | AdminError::ActionFailed(_) => 400,
			AdminError::PermissionDenied(_) => 403,
			AdminError::ModelNotRegistered(_) | AdminError::NotFound(_) => 404,
			AdminError::Validation(_) => 422,
			AdminError::UnmappedFieldType(_)
			| AdminError::Database(_)
			| AdminError::Template(_)
			| AdminError::Config(_) => 500,
		}
	}

	/// Message safe to show to the client.
	pub fn public_message(&self) -> String {
		match self {
			AdminError::Database(_) => "Database operation failed".to_string(),
			AdminError::Template(_) => "Template rendering failed".to_string(),
			AdminError::Config(_) | AdminError::UnmappedFieldType(_) => {
				"Admin site is misconfigured".to_string()
			}
			other => other.to_string(),
		}
	}
}

fn join_field_errors(errors: &BTreeMap<String, String>) -> String {
	errors
		.iter()
		.map(|(field, message)| format!("{}: {}", field, message))
		.collect::<Vec<_>>()
		.join(", ")
}
