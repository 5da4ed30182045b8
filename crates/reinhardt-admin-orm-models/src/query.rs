//! Native query description
//!
//! Ordering uses the ORM's native tokens: `"field"` sorts ascending and
//! `"-field"` sorts descending.

use reinhardt_admin_orm_types::Record;
use serde_json::Value;

/// Case-insensitive substring search over a set of fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
	pub fields: Vec<String>,
	pub term: String,
}

/// Query over a repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
	/// Field equality filters
	pub filters: Record,
	pub search: Option<Search>,
	/// Native ordering tokens
	pub ordering: Vec<String>,
	pub offset: usize,
	pub limit: Option<usize>,
}

impl Query {
	pub fn new() -> Self {
		Self::default()
	}

	/// Require `field == value`
	pub fn filter(mut self, field: impl Into<String>, value: Value) -> Self {
		self.filters.insert(field.into(), value);
		self
	}

	/// Search `term` in `fields`. An empty term or field list is ignored.
	pub fn search<I, S>(mut self, fields: I, term: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let term = term.into();
		let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
		if !term.trim().is_empty() && !fields.is_empty() {
			self.search = Some(Search {
				fields,
				term: term.trim().to_string(),
			});
		}
		self
	}

	/// Set native ordering tokens
	pub fn order_by<I, S>(mut self, tokens: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ordering = tokens.into_iter().map(Into::into).collect();
		self
	}

	pub fn offset(mut self, offset: usize) -> Self {
		self.offset = offset;
		self
	}

	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}
}
