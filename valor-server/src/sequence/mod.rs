//! 订单编号序列
//!
//! - [`SequenceAllocator`] - atomic per-name counter with conflict retry
//! - [`CounterStore`] - storage seam ([`MemoryCounterStore`], SurrealDB in `db::repository`)
//! - [`OrderCodeFormat`] - `SV-1000-NNN` rendering

pub mod allocator;
pub mod error;
pub mod format;
pub mod store;

pub use allocator::{
    ORDER_SEQUENCE, RetryPolicy, SEQUENCE_MAX_ATTEMPTS, SEQUENCE_RETRY_BASE_MS,
    SEQUENCE_RETRY_MAX_MS, SequenceAllocator,
};
pub use error::{CounterStoreError, SequenceError, SequenceResult, validate_sequence_name};
pub use format::{OrderCode, OrderCodeFormat, format_order_code};
pub use store::{CounterStore, MemoryCounterStore};
