//! Model reflection
//!
//! [`ModelMeta`] is the read-only description of a model the ORM exposes:
//! its name, table and ordered field map.

use crate::fields::OrmField;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Model metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMeta {
	/// Application the model belongs to
	pub app: Option<String>,
	/// Model name, possibly dotted (`"blog.Post"`)
	pub name: String,
	/// Backing table
	pub table: String,
	/// Primary key attribute
	pub pk_field: String,
	/// Fields in declaration order
	pub fields_map: IndexMap<String, OrmField>,
}

impl ModelMeta {
	/// Create metadata for a model.
	///
	/// A dotted name (`"blog.Post"`) sets the app label; the table defaults to
	/// the lowercased last segment and the primary key to `id`.
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		let (app, short) = match name.rsplit_once('.') {
			Some((app, short)) => (Some(app.to_string()), short.to_string()),
			None => (None, name.clone()),
		};
		Self {
			app,
			table: short.to_lowercase(),
			name,
			pk_field: "id".to_string(),
			fields_map: IndexMap::new(),
		}
	}

	/// Set the application label
	pub fn app(mut self, app: impl Into<String>) -> Self {
		self.app = Some(app.into());
		self
	}

	/// Set the table name
	pub fn table(mut self, table: impl Into<String>) -> Self {
		self.table = table.into();
		self
	}

	/// Declare a field. A primary-key field becomes the model's `pk_field`.
	pub fn field(mut self, name: impl Into<String>, field: OrmField) -> Self {
		let name = name.into();
		if field.pk {
			self.pk_field = name.clone();
		}
		self.fields_map.insert(name, field);
		self
	}

	/// Model name without its app prefix.
	pub fn short_name(&self) -> &str {
		self.name.rsplit('.').next().unwrap_or(&self.name)
	}

	/// Field descriptor by name.
	pub fn get_field(&self, name: &str) -> Option<&OrmField> {
		self.fields_map.get(name)
	}

	/// Names of foreign-key and one-to-one fields, in declaration order.
	pub fn fk_fields(&self) -> Vec<&str> {
		self.fields_map
			.iter()
			.filter(|(_, field)| field.field_type.is_fk())
			.map(|(name, _)| name.as_str())
			.collect()
	}

	/// Names of many-to-many fields, in declaration order.
	pub fn m2m_fields(&self) -> Vec<&str> {
		self.fields_map
			.iter()
			.filter(|(_, field)| field.field_type == crate::OrmFieldType::ManyToMany)
			.map(|(name, _)| name.as_str())
			.collect()
	}

	/// Storage column names: foreign keys are stored as `<name>_id`.
	pub fn column_names(&self) -> Vec<String> {
		self.fields_map
			.iter()
			.map(|(name, field)| {
				if field.field_type.is_fk() {
					format!("{}_id", name)
				} else {
					name.clone()
				}
			})
			.collect()
	}
}
