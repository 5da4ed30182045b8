//! Repository abstraction over model storage

use crate::query::Query;
use async_trait::async_trait;
use reinhardt_admin_orm_types::{AdminError, Pk, Record};
use thiserror::Error;

/// Repository error type
#[derive(Debug, Error)]
pub enum RepositoryError {
	#[error("No row with primary key {0}")]
	NotFound(Pk),

	#[error("Duplicate primary key {0}")]
	DuplicateKey(Pk),

	#[error("Unknown field '{0}'")]
	UnknownField(String),

	#[error("Storage failure: {0}")]
	Storage(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for AdminError {
	fn from(err: RepositoryError) -> Self {
		match err {
			RepositoryError::NotFound(pk) => AdminError::NotFound(pk.to_string()),
			RepositoryError::UnknownField(field) => {
				AdminError::field(field, "Unknown field.")
			}
			other => AdminError::Database(other.to_string()),
		}
	}
}

/// Storage for the rows of one model
///
/// Records use storage column names, so foreign keys appear as
/// `<name>_id`.
#[async_trait]
pub trait Repository: Send + Sync {
	/// Rows matching the query, ordered and paginated.
	async fn filter(&self, query: &Query) -> RepositoryResult<Vec<Record>>;

	/// Number of rows matching the query, ignoring offset and limit.
	async fn count(&self, query: &Query) -> RepositoryResult<u64>;

	async fn get(&self, pk: Pk) -> RepositoryResult<Option<Record>>;

	/// Rows for the given keys, in key order. Missing keys are skipped.
	async fn get_many(&self, pks: &[Pk]) -> RepositoryResult<Vec<Record>>;

	/// Insert a row, assigning the primary key when absent.
	async fn create(&self, data: Record) -> RepositoryResult<Record>;

	/// Merge `data` into an existing row.
	async fn update(&self, pk: Pk, data: Record) -> RepositoryResult<Record>;

	/// Delete rows, returning how many existed.
	async fn delete_many(&self, pks: &[Pk]) -> RepositoryResult<u64>;
}
