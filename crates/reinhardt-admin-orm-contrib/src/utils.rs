//! Identity strings, order-by translation and payload sanitizers

use reinhardt_admin_orm_types::{AdminError, AdminResult, Record};
use serde_json::Value;

/// Identity of the admin view for a model.
///
/// The last `.`-separated segment of `model_name` is lowercased and, when
/// given, prefixed with `"{app_name}_"`.
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_contrib::identity;
///
/// assert_eq!(identity("blog.Post", None), "post");
/// assert_eq!(identity("blog.Post", Some("cms")), "cms_post");
/// ```
pub fn identity(model_name: &str, app_name: Option<&str>) -> String {
	let short = model_name.rsplit('.').next().unwrap_or(model_name).to_lowercase();
	match app_name.filter(|app| !app.is_empty()) {
		Some(app) => format!("{}_{}", app, short),
		None => short,
	}
}

/// Translate `"<field> <asc|desc>"` directives into native ordering tokens.
///
/// Ascending fields are emitted bare and descending ones with a `-` prefix.
/// A directive without a direction sorts ascending. Directions are matched
/// case-insensitively.
///
/// # Errors
///
/// [`AdminError::InvalidOrderBy`] for empty directives, unknown directions
/// or trailing tokens.
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_contrib::order_by_to_native;
///
/// let native = order_by_to_native(&["title asc".to_string(), "views desc".to_string()]).unwrap();
/// assert_eq!(native, vec!["title", "-views"]);
/// ```
pub fn order_by_to_native(order_by: &[String]) -> AdminResult<Vec<String>> {
	order_by.iter().map(|directive| convert_directive(directive)).collect()
}

fn convert_directive(directive: &str) -> AdminResult<String> {
	let invalid = || AdminError::InvalidOrderBy(directive.to_string());
	let mut tokens = directive.split_whitespace();
	let field = tokens.next().ok_or_else(invalid)?;
	let direction = tokens.next();
	if tokens.next().is_some() {
		return Err(invalid());
	}
	match direction.map(str::to_ascii_lowercase).as_deref() {
		None | Some("asc") => Ok(field.to_string()),
		Some("desc") => Ok(format!("-{}", field)),
		Some(_) => Err(invalid()),
	}
}

/// Drop null-valued keys, recursing into nested objects.
///
/// Arrays are kept as they are.
pub fn remove_nones(item: Record) -> Record {
	item.into_iter()
		.filter(|(_, value)| !value.is_null())
		.map(|(key, value)| match value {
			Value::Object(nested) => (key, Value::Object(remove_nones(nested))),
			other => (key, other),
		})
		.collect()
}

/// Rename foreign-key fields to their `<name>_id` storage columns.
///
/// Keys not listed in `fk_fields` are left untouched.
pub fn add_id2fk_fields(data: Record, fk_fields: &[&str]) -> Record {
	data.into_iter()
		.map(|(key, value)| {
			if fk_fields.contains(&key.as_str()) {
				(format!("{}_id", key), value)
			} else {
				(key, value)
			}
		})
		.collect()
}
