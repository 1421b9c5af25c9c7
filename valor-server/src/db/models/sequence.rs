//! Sequence Counter Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Table holding one record per named sequence, keyed by the sequence name
pub const SEQUENCE_COUNTER_TABLE: &str = "sequence_counter";

/// Sequence counter record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceCounter {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Last issued value
    pub value: i64,
    #[serde(default)]
    pub updated_at: i64,
}
