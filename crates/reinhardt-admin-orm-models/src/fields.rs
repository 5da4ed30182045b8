//! ORM field descriptors
//!
//! Mirrors the column and relation types the ORM can declare on a model,
//! together with the attributes the admin needs to derive its own fields
//! (nullability, maximum length, auto-populated timestamps, enum members,
//! related model).

use serde::{Deserialize, Serialize};
use std::fmt;

/// ORM field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrmFieldType {
	Int,
	BigInt,
	SmallInt,
	IntEnum,
	Char,
	CharEnum,
	Boolean,
	Date,
	Datetime,
	Float,
	Decimal,
	Uuid,
	Text,
	Time,
	Json,
	Binary,
	ForeignKey,
	OneToOne,
	ManyToMany,
}

impl OrmFieldType {
	/// Every declarable field type.
	pub const ALL: [OrmFieldType; 19] = [
		OrmFieldType::Int,
		OrmFieldType::BigInt,
		OrmFieldType::SmallInt,
		OrmFieldType::IntEnum,
		OrmFieldType::Char,
		OrmFieldType::CharEnum,
		OrmFieldType::Boolean,
		OrmFieldType::Date,
		OrmFieldType::Datetime,
		OrmFieldType::Float,
		OrmFieldType::Decimal,
		OrmFieldType::Uuid,
		OrmFieldType::Text,
		OrmFieldType::Time,
		OrmFieldType::Json,
		OrmFieldType::Binary,
		OrmFieldType::ForeignKey,
		OrmFieldType::OneToOne,
		OrmFieldType::ManyToMany,
	];

	/// ORM class name of the field type.
	pub fn class_name(&self) -> &'static str {
		match self {
			OrmFieldType::Int => "IntField",
			OrmFieldType::BigInt => "BigIntField",
			OrmFieldType::SmallInt => "SmallIntField",
			OrmFieldType::IntEnum => "IntEnumField",
			OrmFieldType::Char => "CharField",
			OrmFieldType::CharEnum => "CharEnumField",
			OrmFieldType::Boolean => "BooleanField",
			OrmFieldType::Date => "DateField",
			OrmFieldType::Datetime => "DatetimeField",
			OrmFieldType::Float => "FloatField",
			OrmFieldType::Decimal => "DecimalField",
			OrmFieldType::Uuid => "UUIDField",
			OrmFieldType::Text => "TextField",
			OrmFieldType::Time => "TimeField",
			OrmFieldType::Json => "JSONField",
			OrmFieldType::Binary => "BinaryField",
			OrmFieldType::ForeignKey => "ForeignKeyField",
			OrmFieldType::OneToOne => "OneToOneField",
			OrmFieldType::ManyToMany => "ManyToManyField",
		}
	}

	/// Foreign-key style relation stored as `<name>_id` on the owning row.
	pub fn is_fk(&self) -> bool {
		matches!(self, OrmFieldType::ForeignKey | OrmFieldType::OneToOne)
	}

	pub fn is_relation(&self) -> bool {
		self.is_fk() || matches!(self, OrmFieldType::ManyToMany)
	}
}

impl fmt::Display for OrmFieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.class_name())
	}
}

/// Enum members declared on an enum field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldChoices {
	#[default]
	None,
	/// Members of a string enum `(value, label)`
	Char(Vec<(String, String)>),
	/// Members of an integer enum `(value, label)`
	Int(Vec<(i64, String)>),
}

/// ORM field descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrmField {
	pub field_type: OrmFieldType,
	/// A value must be supplied on create (not null, no default, not generated)
	pub required: bool,
	/// Column accepts NULL
	pub null: bool,
	/// Primary key column
	pub pk: bool,
	/// Value generated by the database (auto-increment keys)
	pub generated: bool,
	pub max_length: Option<u32>,
	/// Set to the current time on every save
	pub auto_now: bool,
	/// Set to the current time on insert
	pub auto_now_add: bool,
	pub choices: FieldChoices,
	/// Related model name (`"app.Model"` or `"Model"`) for relations
	pub related_model: Option<String>,
	pub description: Option<String>,
}

impl OrmField {
	/// Create a required, non-null field of the given type.
	pub fn new(field_type: OrmFieldType) -> Self {
		Self {
			field_type,
			required: true,
			null: false,
			pk: false,
			generated: false,
			max_length: None,
			auto_now: false,
			auto_now_add: false,
			choices: FieldChoices::None,
			related_model: None,
			description: None,
		}
	}

	pub fn int() -> Self {
		Self::new(OrmFieldType::Int)
	}

	pub fn big_int() -> Self {
		Self::new(OrmFieldType::BigInt)
	}

	pub fn small_int() -> Self {
		Self::new(OrmFieldType::SmallInt)
	}

	pub fn char(max_length: u32) -> Self {
		let mut field = Self::new(OrmFieldType::Char);
		field.max_length = Some(max_length);
		field
	}

	pub fn char_enum(choices: Vec<(String, String)>) -> Self {
		let mut field = Self::new(OrmFieldType::CharEnum);
		field.max_length = choices.iter().map(|(v, _)| v.chars().count() as u32).max();
		field.choices = FieldChoices::Char(choices);
		field
	}

	pub fn int_enum(choices: Vec<(i64, String)>) -> Self {
		let mut field = Self::new(OrmFieldType::IntEnum);
		field.choices = FieldChoices::Int(choices);
		field
	}

	pub fn boolean() -> Self {
		Self::new(OrmFieldType::Boolean)
	}

	pub fn date() -> Self {
		Self::new(OrmFieldType::Date)
	}

	pub fn datetime() -> Self {
		Self::new(OrmFieldType::Datetime)
	}

	pub fn time() -> Self {
		Self::new(OrmFieldType::Time)
	}

	pub fn float() -> Self {
		Self::new(OrmFieldType::Float)
	}

	pub fn decimal() -> Self {
		Self::new(OrmFieldType::Decimal)
	}

	pub fn uuid() -> Self {
		Self::new(OrmFieldType::Uuid)
	}

	pub fn text() -> Self {
		Self::new(OrmFieldType::Text)
	}

	pub fn json() -> Self {
		Self::new(OrmFieldType::Json)
	}

	pub fn binary() -> Self {
		Self::new(OrmFieldType::Binary)
	}

	pub fn foreign_key(related_model: impl Into<String>) -> Self {
		Self::relation(OrmFieldType::ForeignKey, related_model)
	}

	pub fn one_to_one(related_model: impl Into<String>) -> Self {
		Self::relation(OrmFieldType::OneToOne, related_model)
	}

	/// Many-to-many relations live in a join table and are never required.
	pub fn many_to_many(related_model: impl Into<String>) -> Self {
		let mut field = Self::relation(OrmFieldType::ManyToMany, related_model);
		field.required = false;
		field
	}

	fn relation(field_type: OrmFieldType, related_model: impl Into<String>) -> Self {
		let mut field = Self::new(field_type);
		field.related_model = Some(related_model.into());
		field
	}

	/// Mark as an auto-generated primary key
	pub fn primary_key(mut self) -> Self {
		self.pk = true;
		self.generated = true;
		self.required = false;
		self
	}

	/// Allow NULL; the field stops being required
	pub fn null(mut self) -> Self {
		self.null = true;
		self.required = false;
		self
	}

	/// Declare a database default; the field stops being required
	pub fn with_default(mut self) -> Self {
		self.required = false;
		self
	}

	/// Refresh the timestamp on every save
	pub fn auto_now(mut self) -> Self {
		self.auto_now = true;
		self
	}

	/// Stamp the creation time on insert
	pub fn auto_now_add(mut self) -> Self {
		self.auto_now_add = true;
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}
