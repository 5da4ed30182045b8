//! ORM field type to admin field mapping

use reinhardt_admin_orm_models::OrmFieldType;
use reinhardt_admin_orm_types::{AdminError, AdminResult};

/// Admin field class an ORM field type maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminKindTag {
	Integer,
	IntEnum,
	String,
	Enum,
	Boolean,
	Date,
	DateTime,
	Float,
	Decimal,
	HasOne,
	HasMany,
	TinyMceEditor,
	Time,
}

impl AdminKindTag {
	/// Admin field class name, matching `AdminFieldKind::type_name`.
	pub fn type_name(&self) -> &'static str {
		match self {
			AdminKindTag::Integer => "IntegerField",
			AdminKindTag::IntEnum => "IntEnumField",
			AdminKindTag::String => "StringField",
			AdminKindTag::Enum => "EnumField",
			AdminKindTag::Boolean => "BooleanField",
			AdminKindTag::Date => "DateField",
			AdminKindTag::DateTime => "DateTimeField",
			AdminKindTag::Float => "FloatField",
			AdminKindTag::Decimal => "DecimalField",
			AdminKindTag::HasOne => "HasOne",
			AdminKindTag::HasMany => "HasMany",
			AdminKindTag::TinyMceEditor => "TinyMCEEditorField",
			AdminKindTag::Time => "TimeField",
		}
	}
}

/// Look up the admin field class for an ORM field type.
///
/// # Errors
///
/// [`AdminError::UnmappedFieldType`] for types the admin cannot edit
/// (JSON and binary columns).
pub fn map_field_type(field_type: OrmFieldType) -> AdminResult<AdminKindTag> {
	let tag = match field_type {
		OrmFieldType::Int | OrmFieldType::BigInt | OrmFieldType::SmallInt => AdminKindTag::Integer,
		OrmFieldType::IntEnum => AdminKindTag::IntEnum,
		OrmFieldType::Char | OrmFieldType::Uuid => AdminKindTag::String,
		OrmFieldType::CharEnum => AdminKindTag::Enum,
		OrmFieldType::Boolean => AdminKindTag::Boolean,
		OrmFieldType::Date => AdminKindTag::Date,
		OrmFieldType::Datetime => AdminKindTag::DateTime,
		OrmFieldType::Float => AdminKindTag::Float,
		OrmFieldType::Decimal => AdminKindTag::Decimal,
		OrmFieldType::ForeignKey | OrmFieldType::OneToOne => AdminKindTag::HasOne,
		OrmFieldType::ManyToMany => AdminKindTag::HasMany,
		OrmFieldType::Text => AdminKindTag::TinyMceEditor,
		OrmFieldType::Time => AdminKindTag::Time,
		OrmFieldType::Json | OrmFieldType::Binary => {
			return Err(AdminError::UnmappedFieldType(
				field_type.class_name().to_string(),
			));
		}
	};
	Ok(tag)
}
