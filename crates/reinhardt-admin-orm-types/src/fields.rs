//! Admin field descriptors
//!
//! An [`AdminField`] describes how a single model attribute is shown and
//! edited in the admin UI. The [`AdminFieldKind`] carries the per-kind
//! constraints (maximum length, enum choices, related view identity).
//!
//! Form submissions arrive as strings; [`AdminField::parse_form_value`]
//! converts them into typed JSON values according to the field kind.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Admin UI field kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdminFieldKind {
	/// Whole number input
	Integer,
	/// Floating point input
	Float,
	/// Arbitrary precision number input, stored as a string
	Decimal,
	/// Checkbox
	Boolean,
	/// Single-line text input
	String {
		/// Maximum number of characters accepted
		maxlength: Option<u32>,
	},
	/// Rich text editor
	TinyMceEditor,
	/// Date picker
	Date,
	/// Date and time picker
	DateTime,
	/// Time picker
	Time,
	/// Select over string choices `(value, label)`
	Enum {
		/// Allowed values with their labels
		choices: Vec<(String, String)>,
	},
	/// Select over integer choices `(value, label)`
	IntEnum {
		/// Allowed values with their labels
		choices: Vec<(i64, String)>,
	},
	/// Reference to a single record of another view
	HasOne {
		/// Identity of the related model view
		identity: String,
	},
	/// Reference to many records of another view
	HasMany {
		/// Identity of the related model view
		identity: String,
	},
}

impl AdminFieldKind {
	/// Name of the admin field class this kind corresponds to.
	pub fn type_name(&self) -> &'static str {
		match self {
			AdminFieldKind::Integer => "IntegerField",
			AdminFieldKind::Float => "FloatField",
			AdminFieldKind::Decimal => "DecimalField",
			AdminFieldKind::Boolean => "BooleanField",
			AdminFieldKind::String { .. } => "StringField",
			AdminFieldKind::TinyMceEditor => "TinyMCEEditorField",
			AdminFieldKind::Date => "DateField",
			AdminFieldKind::DateTime => "DateTimeField",
			AdminFieldKind::Time => "TimeField",
			AdminFieldKind::Enum { .. } => "EnumField",
			AdminFieldKind::IntEnum { .. } => "IntEnumField",
			AdminFieldKind::HasOne { .. } => "HasOne",
			AdminFieldKind::HasMany { .. } => "HasMany",
		}
	}

	/// HTML input type used by the form templates.
	pub fn input_type(&self) -> &'static str {
		match self {
			AdminFieldKind::Integer | AdminFieldKind::Float | AdminFieldKind::Decimal => "number",
			AdminFieldKind::Boolean => "checkbox",
			AdminFieldKind::String { .. } | AdminFieldKind::HasOne { .. } => "text",
			AdminFieldKind::HasMany { .. } => "text",
			AdminFieldKind::TinyMceEditor => "textarea",
			AdminFieldKind::Date => "date",
			AdminFieldKind::DateTime => "datetime-local",
			AdminFieldKind::Time => "time",
			AdminFieldKind::Enum { .. } | AdminFieldKind::IntEnum { .. } => "select",
		}
	}

	/// Identity of the related view for relation kinds.
	pub fn identity(&self) -> Option<&str> {
		match self {
			AdminFieldKind::HasOne { identity } | AdminFieldKind::HasMany { identity } => {
				Some(identity.as_str())
			}
			_ => None,
		}
	}
}

/// Admin field descriptor
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_types::{AdminField, AdminFieldKind};
///
/// let title = AdminField::string("title").with_maxlength(120).with_label("Title");
///
/// assert_eq!(title.name, "title");
/// assert_eq!(title.label, "Title");
/// assert_eq!(title.kind, AdminFieldKind::String { maxlength: Some(120) });
/// assert!(title.required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminField {
	/// Attribute name on the record
	pub name: String,
	/// Label shown in the UI
	pub label: String,
	/// Field kind and its constraints
	pub kind: AdminFieldKind,
	/// Whether a value must be submitted
	pub required: bool,
	/// Whether the value can be changed from the admin
	pub read_only: bool,
	/// Help text shown under the input
	pub help_text: Option<String>,
	/// Hidden from list pages
	pub exclude_from_list: bool,
	/// Hidden from detail pages
	pub exclude_from_detail: bool,
	/// Hidden from create forms
	pub exclude_from_create: bool,
	/// Hidden from edit forms
	pub exclude_from_edit: bool,
}

impl AdminField {
	/// Create a field of the given kind, labelled with its name.
	pub fn new(name: impl Into<String>, kind: AdminFieldKind) -> Self {
		let name = name.into();
		Self {
			label: name.clone(),
			name,
			kind,
			required: true,
			read_only: false,
			help_text: None,
			exclude_from_list: false,
			exclude_from_detail: false,
			exclude_from_create: false,
			exclude_from_edit: false,
		}
	}

	pub fn integer(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::Integer)
	}

	pub fn float(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::Float)
	}

	pub fn decimal(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::Decimal)
	}

	pub fn boolean(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::Boolean)
	}

	pub fn string(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::String { maxlength: None })
	}

	pub fn tiny_mce_editor(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::TinyMceEditor)
	}

	pub fn date(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::Date)
	}

	pub fn date_time(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::DateTime)
	}

	pub fn time(name: impl Into<String>) -> Self {
		Self::new(name, AdminFieldKind::Time)
	}

	pub fn enum_field(name: impl Into<String>, choices: Vec<(String, String)>) -> Self {
		Self::new(name, AdminFieldKind::Enum { choices })
	}

	pub fn int_enum(name: impl Into<String>, choices: Vec<(i64, String)>) -> Self {
		Self::new(name, AdminFieldKind::IntEnum { choices })
	}

	pub fn has_one(name: impl Into<String>, identity: impl Into<String>) -> Self {
		Self::new(
			name,
			AdminFieldKind::HasOne {
				identity: identity.into(),
			},
		)
	}

	pub fn has_many(name: impl Into<String>, identity: impl Into<String>) -> Self {
		Self::new(
			name,
			AdminFieldKind::HasMany {
				identity: identity.into(),
			},
		)
	}

	/// Set the label
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// Set whether the field is required
	pub fn with_required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// Set whether the field is read-only
	pub fn with_read_only(mut self, read_only: bool) -> Self {
		self.read_only = read_only;
		self
	}

	/// Set help text
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	/// Set the maximum length. Ignored for non-string kinds.
	pub fn with_maxlength(mut self, max: u32) -> Self {
		if let AdminFieldKind::String { maxlength } = &mut self.kind {
			*maxlength = Some(max);
		}
		self
	}

	/// Hide the field from list pages
	pub fn exclude_from_list(mut self) -> Self {
		self.exclude_from_list = true;
		self
	}

	/// Hide the field from detail pages
	pub fn exclude_from_detail(mut self) -> Self {
		self.exclude_from_detail = true;
		self
	}

	/// Hide the field from create forms
	pub fn exclude_from_create(mut self) -> Self {
		self.exclude_from_create = true;
		self
	}

	/// Hide the field from edit forms
	pub fn exclude_from_edit(mut self) -> Self {
		self.exclude_from_edit = true;
		self
	}

	/// Converts a submitted form value into a typed JSON value.
	///
	/// A missing or blank value yields `Value::Null` for optional fields,
	/// `false` for checkboxes and an empty array for has-many relations.
	/// Text fields keep surrounding whitespace; every other kind parses the
	/// trimmed value.
	///
	/// # Errors
	///
	/// Returns the user-facing validation message when the value is
	/// missing for a required field or does not parse for the field kind.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_admin_orm_types::AdminField;
	/// use serde_json::json;
	///
	/// let views = AdminField::integer("views");
	/// assert_eq!(views.parse_form_value(Some("42")), Ok(json!(42)));
	/// assert!(views.parse_form_value(Some("many")).is_err());
	/// ```
	pub fn parse_form_value(&self, raw: Option<&str>) -> Result<Value, String> {
		let Some(untrimmed) = raw.filter(|value| !value.trim().is_empty()) else {
			return match &self.kind {
				AdminFieldKind::Boolean => Ok(Value::Bool(false)),
				AdminFieldKind::HasMany { .. } => Ok(Value::Array(Vec::new())),
				_ if self.required => Err("This field is required.".to_string()),
				_ => Ok(Value::Null),
			};
		};
		let raw = untrimmed.trim();

		match &self.kind {
			AdminFieldKind::Integer | AdminFieldKind::HasOne { .. } => raw
				.parse::<i64>()
				.map(Value::from)
				.map_err(|_| "Enter a whole number.".to_string()),
			AdminFieldKind::Float => raw
				.parse::<f64>()
				.ok()
				.and_then(serde_json::Number::from_f64)
				.map(Value::Number)
				.ok_or_else(|| "Enter a number.".to_string()),
			AdminFieldKind::Decimal => Decimal::from_str(raw)
				.map(|d| Value::String(d.normalize().to_string()))
				.map_err(|_| "Enter a number.".to_string()),
			AdminFieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
				"on" | "true" | "1" | "yes" => Ok(Value::Bool(true)),
				"off" | "false" | "0" | "no" => Ok(Value::Bool(false)),
				_ => Err("Enter a valid boolean.".to_string()),
			},
			AdminFieldKind::String { maxlength } => {
				match maxlength {
					Some(max) if untrimmed.chars().count() > *max as usize => Err(format!(
						"Ensure this value has at most {} characters.",
						max
					)),
					_ => Ok(Value::String(untrimmed.to_string())),
				}
			}
			AdminFieldKind::TinyMceEditor => Ok(Value::String(untrimmed.to_string())),
			AdminFieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
				.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
				.map_err(|_| "Enter a valid date.".to_string()),
			AdminFieldKind::DateTime => parse_datetime(raw)
				.map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
				.ok_or_else(|| "Enter a valid date/time.".to_string()),
			AdminFieldKind::Time => NaiveTime::parse_from_str(raw, "%H:%M:%S")
				.or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
				.map(|t| Value::String(t.format("%H:%M:%S").to_string()))
				.map_err(|_| "Enter a valid time.".to_string()),
			AdminFieldKind::Enum { choices } => {
				if choices.iter().any(|(value, _)| value == raw) {
					Ok(Value::String(raw.to_string()))
				} else {
					Err("Select a valid choice.".to_string())
				}
			}
			AdminFieldKind::IntEnum { choices } => raw
				.parse::<i64>()
				.ok()
				.filter(|parsed| choices.iter().any(|(value, _)| value == parsed))
				.map(Value::from)
				.ok_or_else(|| "Select a valid choice.".to_string()),
			AdminFieldKind::HasMany { .. } => raw
				.split(',')
				.map(str::trim)
				.filter(|part| !part.is_empty())
				.map(|part| part.parse::<i64>().map(Value::from))
				.collect::<Result<Vec<_>, _>>()
				.map(Value::Array)
				.map_err(|_| "Enter a list of whole numbers.".to_string()),
		}
	}
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Some(dt.naive_utc());
	}
	["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}
