//! Query aliases shared by model views and repositories

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Primary key of an admin-managed record
pub type Pk = i64;

/// A batch of primary keys (used by batch actions)
pub type Pks = Vec<Pk>;

/// Ordering directives as sent by the admin UI (`"<field> <asc|desc>"`)
pub type OrderBy = Vec<String>;

/// A record as exchanged between views and repositories
pub type Record = Map<String, Value>;

/// Row restriction for list queries
///
/// The admin UI either sends a structured filter (field -> expected value)
/// or a free-text search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Where {
	/// Field equality filter
	Filter(Record),
	/// Free-text search term
	Search(String),
}

impl Where {
	/// Returns the search term, if this is a free-text search.
	pub fn search_term(&self) -> Option<&str> {
		match self {
			Where::Search(term) => Some(term.as_str()),
			Where::Filter(_) => None,
		}
	}

	/// Whether the restriction matches every row.
	pub fn is_empty(&self) -> bool {
		match self {
			Where::Filter(map) => map.is_empty(),
			Where::Search(term) => term.trim().is_empty(),
		}
	}
}

impl From<&str> for Where {
	fn from(term: &str) -> Self {
		Where::Search(term.to_string())
	}
}
