//! Admin field derivation from ORM field descriptors
//!
//! Each ORM field becomes one admin field named and labelled after the
//! attribute. Kind-specific attributes follow the ORM declaration:
//!
//! - character fields carry their maximum length,
//! - enum fields carry their members,
//! - datetime fields stamped on insert or save are never required,
//! - relations carry the identity of the related model's view.
//!
//! A [`FieldOverride`] is applied last and wins over anything derived.

use crate::mapping::{AdminKindTag, map_field_type};
use crate::utils::identity;
use reinhardt_admin_orm_models::{FieldChoices, ModelMeta, OrmField};
use reinhardt_admin_orm_site::AdminSettings;
use reinhardt_admin_orm_types::{AdminError, AdminField, AdminFieldKind, AdminResult};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Per-field adjustments applied after derivation
///
/// Unset values keep the derived ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldOverride {
	pub label: Option<String>,
	pub required: Option<bool>,
	pub read_only: Option<bool>,
	pub help_text: Option<String>,
	/// Only meaningful for string fields
	pub maxlength: Option<u32>,
	pub exclude_from_list: Option<bool>,
	pub exclude_from_detail: Option<bool>,
	pub exclude_from_create: Option<bool>,
	pub exclude_from_edit: Option<bool>,
}

impl FieldOverride {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = Some(required);
		self
	}

	pub fn read_only(mut self, read_only: bool) -> Self {
		self.read_only = Some(read_only);
		self
	}

	pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	pub fn maxlength(mut self, maxlength: u32) -> Self {
		self.maxlength = Some(maxlength);
		self
	}

	pub fn exclude_from_list(mut self) -> Self {
		self.exclude_from_list = Some(true);
		self
	}

	pub fn exclude_from_detail(mut self) -> Self {
		self.exclude_from_detail = Some(true);
		self
	}

	pub fn exclude_from_create(mut self) -> Self {
		self.exclude_from_create = Some(true);
		self
	}

	pub fn exclude_from_edit(mut self) -> Self {
		self.exclude_from_edit = Some(true);
		self
	}

	/// Apply the set values to `field`.
	pub fn apply(&self, mut field: AdminField) -> AdminField {
		if let Some(label) = &self.label {
			field.label = label.clone();
		}
		if let Some(required) = self.required {
			field.required = required;
		}
		if let Some(read_only) = self.read_only {
			field.read_only = read_only;
		}
		if let Some(help_text) = &self.help_text {
			field.help_text = Some(help_text.clone());
		}
		if let Some(max) = self.maxlength {
			field = field.with_maxlength(max);
		}
		if let Some(flag) = self.exclude_from_list {
			field.exclude_from_list = flag;
		}
		if let Some(flag) = self.exclude_from_detail {
			field.exclude_from_detail = flag;
		}
		if let Some(flag) = self.exclude_from_create {
			field.exclude_from_create = flag;
		}
		if let Some(flag) = self.exclude_from_edit {
			field.exclude_from_edit = flag;
		}
		field
	}
}

/// Options for deriving a single field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
	/// Application prefix for relation identities
	pub app_name: Option<String>,
	pub overrides: FieldOverride,
}

/// Options for deriving every field of a model
///
/// Can be deserialized from configuration:
///
/// ```toml
/// app_name = "blog"
///
/// [fields.title]
/// label = "Headline"
///
/// [fields.created_at]
/// exclude_from_create = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldOverrides {
	pub app_name: Option<String>,
	pub fields: BTreeMap<String, FieldOverride>,
}

impl FieldOverrides {
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides seeded with the site's `app_name`.
	pub fn for_site(settings: &AdminSettings) -> Self {
		Self {
			app_name: settings.app_name.clone(),
			..Self::default()
		}
	}

	pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
		self.app_name = Some(app_name.into());
		self
	}

	pub fn field(mut self, name: impl Into<String>, overrides: FieldOverride) -> Self {
		self.fields.insert(name.into(), overrides);
		self
	}

	fn options_for(&self, name: &str) -> FieldOptions {
		FieldOptions {
			app_name: self.app_name.clone(),
			overrides: self.fields.get(name).cloned().unwrap_or_default(),
		}
	}
}

/// Derive the admin field for one ORM field.
///
/// # Errors
///
/// [`AdminError::UnmappedFieldType`] when the field type has no admin
/// counterpart, [`AdminError::Config`] for a relation without a related
/// model.
pub fn related_admin_field(
	name: &str,
	field: &OrmField,
	options: &FieldOptions,
) -> AdminResult<AdminField> {
	let tag = map_field_type(field.field_type)?;
	let mut required = field.required;

	let kind = match tag {
		AdminKindTag::Integer => AdminFieldKind::Integer,
		AdminKindTag::Float => AdminFieldKind::Float,
		AdminKindTag::Decimal => AdminFieldKind::Decimal,
		AdminKindTag::Boolean => AdminFieldKind::Boolean,
		AdminKindTag::String => AdminFieldKind::String {
			maxlength: field.max_length,
		},
		AdminKindTag::TinyMceEditor => AdminFieldKind::TinyMceEditor,
		AdminKindTag::Date => AdminFieldKind::Date,
		AdminKindTag::DateTime => {
			required = field.required && !field.auto_now_add && !field.auto_now;
			AdminFieldKind::DateTime
		}
		AdminKindTag::Time => AdminFieldKind::Time,
		AdminKindTag::Enum => AdminFieldKind::Enum {
			choices: match &field.choices {
				FieldChoices::Char(choices) => choices.clone(),
				_ => Vec::new(),
			},
		},
		AdminKindTag::IntEnum => AdminFieldKind::IntEnum {
			choices: match &field.choices {
				FieldChoices::Int(choices) => choices.clone(),
				_ => Vec::new(),
			},
		},
		AdminKindTag::HasOne | AdminKindTag::HasMany => {
			let related = field.related_model.as_deref().ok_or_else(|| {
				AdminError::Config(format!("Relation '{}' has no related model", name))
			})?;
			let identity = identity(related, options.app_name.as_deref());
			if tag == AdminKindTag::HasOne {
				AdminFieldKind::HasOne { identity }
			} else {
				AdminFieldKind::HasMany { identity }
			}
		}
	};

	let mut admin_field = AdminField::new(name, kind)
		.with_required(required)
		.with_read_only(field.generated);
	if let Some(description) = &field.description {
		admin_field = admin_field.with_help_text(description.clone());
	}
	let admin_field = options.overrides.apply(admin_field);
	tracing::debug!(
		field = name,
		orm_type = %field.field_type,
		admin_type = admin_field.kind.type_name(),
		required = admin_field.required,
		"Derived admin field"
	);
	Ok(admin_field)
}

/// Derive admin fields for every field of a model, in declaration order.
///
/// # Errors
///
/// Fails on the first field [`related_admin_field`] rejects.
pub fn model_admin_fields(meta: &ModelMeta, overrides: &FieldOverrides) -> AdminResult<Vec<AdminField>> {
	meta.fields_map
		.iter()
		.map(|(name, field)| related_admin_field(name, field, &overrides.options_for(name)))
		.collect()
}
