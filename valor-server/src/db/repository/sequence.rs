//! Sequence Counter Repository
//!
//! SurrealDB-backed [`CounterStore`]. Each increment is one `UPSERT`
//! statement, so it runs in its own optimistic transaction: a commit that
//! loses a race is rolled back and reported as a conflict.

use async_trait::async_trait;
use surrealdb::engine::local::Db;
use surrealdb::error::Db as DbError;
use surrealdb::{RecordId, Surreal};

use super::BaseRepository;
use crate::db::models::{SEQUENCE_COUNTER_TABLE, SequenceCounter};
use crate::sequence::{CounterStore, CounterStoreError};

#[derive(Clone)]
pub struct SurrealCounterStore {
    base: BaseRepository,
}

impl SurrealCounterStore {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn thing(name: &str) -> RecordId {
        RecordId::from_table_key(SEQUENCE_COUNTER_TABLE, name)
    }
}

/// Split SurrealDB failures into retryable transaction conflicts and everything else
///
/// RocksDB `Busy`/`TryAgain` surface as [`DbError::TxRetryable`]. When the
/// implicit transaction of a statement fails on commit, the executor reports
/// `QueryNotExecutedDetail` carrying the rendered cause instead.
pub fn classify_surreal_error(err: surrealdb::Error) -> CounterStoreError {
    let retryable = match &err {
        surrealdb::Error::Db(DbError::TxRetryable) => true,
        surrealdb::Error::Db(DbError::QueryNotExecutedDetail { message }) => {
            *message == DbError::TxRetryable.to_string()
        }
        _ => false,
    };
    if retryable {
        CounterStoreError::Conflict(err.to_string())
    } else {
        CounterStoreError::Unavailable(err.to_string())
    }
}

fn to_u64(counter: SequenceCounter) -> Result<u64, CounterStoreError> {
    u64::try_from(counter.value).map_err(|_| {
        CounterStoreError::Unavailable(format!(
            "sequence '{}' holds a negative value {}",
            counter.name, counter.value
        ))
    })
}

#[async_trait]
impl CounterStore for SurrealCounterStore {
    async fn increment(&self, name: &str) -> Result<u64, CounterStoreError> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPSERT $thing SET
                    name = $name,
                    value = (value OR 0) + 1,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", Self::thing(name)))
            .bind(("name", name.to_string()))
            .bind(("now", shared::util::now_millis()))
            .await
            .map_err(classify_surreal_error)?;

        let updated: Option<SequenceCounter> = result.take(0).map_err(classify_surreal_error)?;
        let counter = updated.ok_or_else(|| {
            CounterStoreError::Unavailable(format!("UPSERT returned no record for '{}'", name))
        })?;
        to_u64(counter)
    }

    async fn current(&self, name: &str) -> Result<Option<u64>, CounterStoreError> {
        let counter: Option<SequenceCounter> = self
            .base
            .db()
            .select(Self::thing(name))
            .await
            .map_err(classify_surreal_error)?;
        counter.map(to_u64).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(err: DbError) -> CounterStoreError {
        classify_surreal_error(surrealdb::Error::Db(err))
    }

    #[test]
    fn test_retryable_transaction_is_conflict() {
        assert!(matches!(
            classify(DbError::TxRetryable),
            CounterStoreError::Conflict(_)
        ));
    }

    #[test]
    fn test_failed_commit_of_retryable_transaction_is_conflict() {
        let err = DbError::QueryNotExecutedDetail {
            message: DbError::TxRetryable.to_string(),
        };
        assert!(matches!(classify(err), CounterStoreError::Conflict(_)));
    }

    #[test]
    fn test_other_failures_are_unavailable() {
        // Mentions "conflict" but is not a transaction conflict
        let thrown = DbError::Thrown("stock conflict on ring 42".to_string());
        assert!(matches!(classify(thrown), CounterStoreError::Unavailable(_)));

        let missing_commit = DbError::QueryNotExecutedDetail {
            message: "Missing COMMIT statement".to_string(),
        };
        assert!(matches!(
            classify(missing_commit),
            CounterStoreError::Unavailable(_)
        ));

        assert!(matches!(
            classify(DbError::QueryNotExecuted),
            CounterStoreError::Unavailable(_)
        ));
    }
}
