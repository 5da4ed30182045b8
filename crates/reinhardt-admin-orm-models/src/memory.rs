//! In-memory repository
//!
//! Keeps rows in a `BTreeMap` keyed by primary key behind a
//! `parking_lot::RwLock`. Used for tests and for demo sites that have no
//! database behind them.

use crate::meta::ModelMeta;
use crate::query::Query;
use crate::repository::{Repository, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use reinhardt_admin_orm_types::{Pk, Record};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

struct Rows {
	data: BTreeMap<Pk, Record>,
	seq: Pk,
}

/// Repository holding rows in memory
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_models::{MemoryRepository, Query, Repository};
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let repo = MemoryRepository::new("id");
/// let row = json!({"title": "Hello"}).as_object().cloned().unwrap();
/// let created = repo.create(row).await.unwrap();
///
/// assert_eq!(created.get("id"), Some(&json!(1)));
/// assert_eq!(repo.count(&Query::new()).await.unwrap(), 1);
/// # });
/// ```
pub struct MemoryRepository {
	pk_field: String,
	columns: Option<Vec<String>>,
	rows: RwLock<Rows>,
}

impl MemoryRepository {
	/// Create an empty repository that accepts any column.
	pub fn new(pk_field: impl Into<String>) -> Self {
		Self {
			pk_field: pk_field.into(),
			columns: None,
			rows: RwLock::new(Rows {
				data: BTreeMap::new(),
				seq: 1,
			}),
		}
	}

	/// Create an empty repository restricted to the model's columns.
	pub fn for_model(meta: &ModelMeta) -> Self {
		let mut repo = Self::new(meta.pk_field.clone());
		repo.columns = Some(meta.column_names());
		repo
	}

	/// Replace every row. The key sequence restarts after the highest key.
	pub fn reset(&self, records: impl IntoIterator<Item = Record>) {
		let mut rows = self.rows.write();
		rows.data.clear();
		for record in records {
			if let Some(pk) = record.get(&self.pk_field).and_then(Value::as_i64) {
				rows.data.insert(pk, record);
			}
		}
		rows.seq = rows.data.keys().next_back().map_or(1, |pk| pk.saturating_add(1));
		tracing::debug!(pk_field = %self.pk_field, rows = rows.data.len(), "Repository reset");
	}

	pub fn len(&self) -> usize {
		self.rows.read().data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn check_columns<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> RepositoryResult<()> {
		let Some(columns) = &self.columns else {
			return Ok(());
		};
		for name in names {
			if !columns.iter().any(|column| column == name) {
				return Err(RepositoryError::UnknownField(name.clone()));
			}
		}
		Ok(())
	}

	fn matching(&self, query: &Query) -> RepositoryResult<Vec<Record>> {
		self.check_columns(query.filters.keys())?;
		let ordering_fields: Vec<String> = query
			.ordering
			.iter()
			.map(|token| token.trim_start_matches('-').to_string())
			.collect();
		self.check_columns(ordering_fields.iter())?;

		let rows = self.rows.read();
		let mut matched: Vec<Record> = rows
			.data
			.values()
			.filter(|record| {
				query
					.filters
					.iter()
					.all(|(field, expected)| record.get(field) == Some(expected))
			})
			.filter(|record| match &query.search {
				Some(search) => {
					let needle = search.term.to_lowercase();
					search.fields.iter().any(|field| {
						record
							.get(field)
							.map(|value| value_text(value).to_lowercase().contains(&needle))
							.unwrap_or(false)
					})
				}
				None => true,
			})
			.cloned()
			.collect();

		if !query.ordering.is_empty() {
			matched.sort_by(|a, b| compare_records(a, b, &query.ordering));
		}
		Ok(matched)
	}
}

#[async_trait]
impl Repository for MemoryRepository {
	async fn filter(&self, query: &Query) -> RepositoryResult<Vec<Record>> {
		let matched = self.matching(query)?;
		let page = matched
			.into_iter()
			.skip(query.offset)
			.take(query.limit.unwrap_or(usize::MAX))
			.collect();
		Ok(page)
	}

	async fn count(&self, query: &Query) -> RepositoryResult<u64> {
		Ok(self.matching(query)?.len() as u64)
	}

	async fn get(&self, pk: Pk) -> RepositoryResult<Option<Record>> {
		Ok(self.rows.read().data.get(&pk).cloned())
	}

	async fn get_many(&self, pks: &[Pk]) -> RepositoryResult<Vec<Record>> {
		let rows = self.rows.read();
		let mut keys: Vec<Pk> = pks.to_vec();
		keys.sort_unstable();
		keys.dedup();
		Ok(keys
			.iter()
			.filter_map(|pk| rows.data.get(pk).cloned())
			.collect())
	}

	async fn create(&self, mut data: Record) -> RepositoryResult<Record> {
		self.check_columns(data.keys())?;
		let mut rows = self.rows.write();
		let pk = match data.get(&self.pk_field).and_then(Value::as_i64) {
			Some(pk) if rows.data.contains_key(&pk) => {
				return Err(RepositoryError::DuplicateKey(pk));
			}
			Some(pk) => pk,
			// The sequence saturates at the largest key.
			None if rows.data.contains_key(&rows.seq) => {
				return Err(RepositoryError::Storage(
					"Primary key sequence exhausted".to_string(),
				));
			}
			None => rows.seq,
		};
		rows.seq = rows.seq.max(pk.saturating_add(1));
		data.insert(self.pk_field.clone(), Value::from(pk));
		rows.data.insert(pk, data.clone());
		Ok(data)
	}

	async fn update(&self, pk: Pk, mut data: Record) -> RepositoryResult<Record> {
		data.remove(&self.pk_field);
		self.check_columns(data.keys())?;
		let mut rows = self.rows.write();
		let record = rows.data.get_mut(&pk).ok_or(RepositoryError::NotFound(pk))?;
		for (key, value) in data {
			record.insert(key, value);
		}
		Ok(record.clone())
	}

	async fn delete_many(&self, pks: &[Pk]) -> RepositoryResult<u64> {
		let mut rows = self.rows.write();
		let deleted = pks
			.iter()
			.filter(|pk| rows.data.remove(*pk).is_some())
			.count();
		Ok(deleted as u64)
	}
}

fn compare_records(a: &Record, b: &Record, ordering: &[String]) -> Ordering {
	for token in ordering {
		let (field, descending) = match token.strip_prefix('-') {
			Some(field) => (field, true),
			None => (token.as_str(), false),
		};
		let ord = compare_values(a.get(field), b.get(field));
		let ord = if descending { ord.reverse() } else { ord };
		if ord != Ordering::Equal {
			return ord;
		}
	}
	Ordering::Equal
}

// Missing and null sort first, then booleans, numbers, strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	fn rank(value: Option<&Value>) -> u8 {
		match value {
			None | Some(Value::Null) => 0,
			Some(Value::Bool(_)) => 1,
			Some(Value::Number(_)) => 2,
			Some(Value::String(_)) => 3,
			Some(_) => 4,
		}
	}

	match (a, b) {
		(Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
		(Some(Value::Number(x)), Some(Value::Number(y))) => {
			let x = x.as_f64().unwrap_or(0.0);
			let y = y.as_f64().unwrap_or(0.0);
			x.partial_cmp(&y).unwrap_or(Ordering::Equal)
		}
		(Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
		_ => rank(a).cmp(&rank(b)),
	}
}

fn value_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
