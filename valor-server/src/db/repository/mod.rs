//! Repository Module
//!
//! CRUD operations over SurrealDB tables.

// Accounts
pub mod user;

// Catalog
pub mod product;

// Orders
pub mod order;
pub mod sequence;

// Re-exports
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use sequence::SurrealCounterStore;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use shared::error::{AppError, ErrorCode};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // Unique index violations surface as "already contains"
        if message.contains("already contains") || message.contains("already exists") {
            RepoError::Duplicate(message)
        } else {
            RepoError::Database(message)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" everywhere
// =============================================================================
//
//   - parse:  let id: RecordId = "product:abc".parse()?;
//   - build:  let id = RecordId::from_table_key("product", "abc");
//   - CRUD:   db.select(id) / db.delete(id)

/// Parse a "table:id" string, accepting a bare key for `table`
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepoError::Validation("ID must not be empty".to_string()));
    }
    if let Some(key) = id.strip_prefix(&format!("{}:", table)) {
        return Ok(RecordId::from_table_key(table, key));
    }
    if id.contains(':') {
        return Err(RepoError::Validation(format!("Invalid {} ID: {}", table, id)));
    }
    Ok(RecordId::from_table_key(table, id))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id() {
        assert_eq!(
            parse_record_id("product", "product:abc").unwrap(),
            RecordId::from_table_key("product", "abc")
        );
        assert_eq!(
            parse_record_id("product", "abc").unwrap(),
            RecordId::from_table_key("product", "abc")
        );
        assert!(parse_record_id("product", "user:abc").is_err());
        assert!(parse_record_id("product", " ").is_err());
    }

    #[test]
    fn test_repo_error_into_app_error() {
        let err: AppError = RepoError::Duplicate("email".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        let err: AppError = RepoError::Database("io".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
