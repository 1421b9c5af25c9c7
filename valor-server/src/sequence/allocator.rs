//! Sequence Allocator
//!
//! Hands out unique, gap-free, monotonically increasing values per sequence
//! name. Correctness rests on the store's atomic increment; the allocator
//! never caches counter state and only adds validation and conflict retry.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use super::error::{CounterStoreError, SequenceError, SequenceResult, validate_sequence_name};
use super::format::{OrderCode, OrderCodeFormat};
use super::store::CounterStore;

/// Sequence used for order codes
pub const ORDER_SEQUENCE: &str = "orderId";

/// Default conflict retry budget
pub const SEQUENCE_MAX_ATTEMPTS: u32 = 100;
/// Base backoff delay (ms), doubled per attempt
pub const SEQUENCE_RETRY_BASE_MS: u64 = 1;
/// Backoff cap (ms)
pub const SEQUENCE_RETRY_MAX_MS: u64 = 25;

/// Conflict retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Load from `SEQUENCE_MAX_ATTEMPTS` / `SEQUENCE_RETRY_BASE_MS`
    pub fn from_env() -> Self {
        Self {
            max_attempts: std::env::var("SEQUENCE_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u32| *v > 0)
                .unwrap_or(SEQUENCE_MAX_ATTEMPTS),
            base_delay_ms: std::env::var("SEQUENCE_RETRY_BASE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(SEQUENCE_RETRY_BASE_MS),
            max_delay_ms: SEQUENCE_RETRY_MAX_MS,
        }
    }

    /// Exponential backoff with jitter in `[ceiling / 2, ceiling]`
    fn delay(&self, attempt: u32) -> Duration {
        let ceiling = self
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(16))
            .min(self.max_delay_ms);
        if ceiling == 0 {
            return Duration::ZERO;
        }
        let jittered = rand::thread_rng().gen_range(ceiling / 2..=ceiling);
        Duration::from_millis(jittered)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: SEQUENCE_MAX_ATTEMPTS,
            base_delay_ms: SEQUENCE_RETRY_BASE_MS,
            max_delay_ms: SEQUENCE_RETRY_MAX_MS,
        }
    }
}

/// Allocates sequence values and renders order codes
#[derive(Clone)]
pub struct SequenceAllocator {
    store: Arc<dyn CounterStore>,
    format: OrderCodeFormat,
    retry: RetryPolicy,
}

impl SequenceAllocator {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            format: OrderCodeFormat::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_format(mut self, format: OrderCodeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn format(&self) -> &OrderCodeFormat {
        &self.format
    }

    /// Atomically increment `name` and return the new value
    ///
    /// The first allocation of a name returns 1. Conflicts are retried with
    /// backoff; a conflicted attempt is never applied, so retries cannot
    /// produce duplicates.
    pub async fn allocate(&self, name: &str) -> SequenceResult<u64> {
        validate_sequence_name(name)?;

        let mut attempt = 0;
        loop {
            match self.store.increment(name).await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(sequence = %name, value, attempts = attempt + 1, "Sequence allocated after retry");
                    }
                    return Ok(value);
                }
                Err(CounterStoreError::Conflict(reason)) => {
                    attempt += 1;
                    if attempt >= self.retry.max_attempts {
                        tracing::error!(
                            sequence = %name,
                            attempts = attempt,
                            reason = %reason,
                            "Sequence retry budget exhausted"
                        );
                        return Err(SequenceError::StorageUnavailable(format!(
                            "sequence '{}' still conflicting after {} attempts",
                            name, attempt
                        )));
                    }
                    let delay = self.retry.delay(attempt - 1);
                    tracing::trace!(sequence = %name, attempt, delay_ms = delay.as_millis() as u64, "Sequence write conflict, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(CounterStoreError::Unavailable(reason)) => {
                    tracing::error!(sequence = %name, reason = %reason, "Sequence store unavailable");
                    return Err(SequenceError::StorageUnavailable(reason));
                }
            }
        }
    }

    /// Last issued value of `name`, 0 if never allocated
    pub async fn current(&self, name: &str) -> SequenceResult<u64> {
        validate_sequence_name(name)?;

        match self.store.current(name).await {
            Ok(value) => Ok(value.unwrap_or(0)),
            Err(CounterStoreError::Conflict(reason) | CounterStoreError::Unavailable(reason)) => {
                Err(SequenceError::StorageUnavailable(reason))
            }
        }
    }

    /// Allocate from the order sequence and render the display code
    pub async fn next_order_code(&self) -> SequenceResult<OrderCode> {
        let sequence = self.allocate(ORDER_SEQUENCE).await?;
        Ok(OrderCode {
            sequence,
            code: self.format.render(sequence),
        })
    }
}
