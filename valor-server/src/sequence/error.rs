//! Sequence errors

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Maximum length of a sequence name
pub const MAX_SEQUENCE_NAME_LEN: usize = 64;

/// Errors surfaced by [`SequenceAllocator`](super::SequenceAllocator)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// The store could not complete the increment. Nothing was applied.
    #[error("sequence storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("invalid sequence name: {0}")]
    InvalidSequenceName(String),
}

/// Errors reported by a [`CounterStore`](super::CounterStore) backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CounterStoreError {
    /// Optimistic transaction lost a race; the statement was not applied and may be retried
    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type SequenceResult<T> = Result<T, SequenceError>;

impl From<SequenceError> for AppError {
    fn from(err: SequenceError) -> Self {
        match err {
            SequenceError::StorageUnavailable(msg) => AppError::sequence_unavailable(msg),
            SequenceError::InvalidSequenceName(msg) => {
                AppError::with_message(ErrorCode::InvalidSequenceName, msg)
            }
        }
    }
}

/// Reject names that are empty, whitespace-only, too long or contain control characters
pub fn validate_sequence_name(name: &str) -> SequenceResult<()> {
    if name.trim().is_empty() {
        return Err(SequenceError::InvalidSequenceName(
            "sequence name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_SEQUENCE_NAME_LEN {
        return Err(SequenceError::InvalidSequenceName(format!(
            "sequence name is too long (max {MAX_SEQUENCE_NAME_LEN} chars)"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(SequenceError::InvalidSequenceName(
            "sequence name must not contain control characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_sequence_name("orderId").is_ok());
        assert!(validate_sequence_name("invoice-2026").is_ok());
        assert!(validate_sequence_name(&"x".repeat(MAX_SEQUENCE_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "   ", "\t", "order\nid", "nul\0"] {
            assert!(
                matches!(
                    validate_sequence_name(name),
                    Err(SequenceError::InvalidSequenceName(_))
                ),
                "expected {:?} to be rejected",
                name
            );
        }
        assert!(validate_sequence_name(&"x".repeat(MAX_SEQUENCE_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = SequenceError::StorageUnavailable("offline".into()).into();
        assert_eq!(err.code, ErrorCode::SequenceUnavailable);
        assert_eq!(err.http_status(), http::StatusCode::SERVICE_UNAVAILABLE);

        let err: AppError = SequenceError::InvalidSequenceName("empty".into()).into();
        assert_eq!(err.code, ErrorCode::InvalidSequenceName);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
