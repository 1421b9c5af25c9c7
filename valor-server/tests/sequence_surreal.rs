//! Sequence allocator against the embedded SurrealDB store
//! Run: cargo test -p valor-server --test sequence_surreal

use std::collections::HashSet;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::RocksDb;
use valor_server::db::DbService;
use valor_server::db::repository::SurrealCounterStore;
use valor_server::sequence::{
    CounterStore, CounterStoreError, MemoryCounterStore, ORDER_SEQUENCE, RetryPolicy,
    SequenceAllocator, SequenceError,
};

async fn surreal_store() -> (tempfile::TempDir, Arc<SurrealCounterStore>) {
    let tmp = tempfile::tempdir().unwrap();
    let db = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    let db = DbService::from_connection(db, "test", "test").await.unwrap();
    (tmp, Arc::new(SurrealCounterStore::new(db.db)))
}

fn allocator(store: Arc<dyn CounterStore>) -> SequenceAllocator {
    // Generous budget: 50+ writers race on one record
    SequenceAllocator::new(store).with_retry(RetryPolicy {
        max_attempts: 1_000,
        base_delay_ms: 1,
        max_delay_ms: 25,
    })
}

async fn check_monotonic(alloc: &SequenceAllocator) {
    for expected in 1..=5 {
        assert_eq!(alloc.allocate("x").await.unwrap(), expected);
    }
    assert_eq!(alloc.current("x").await.unwrap(), 5);
}

async fn check_lazy_and_independent(alloc: &SequenceAllocator) {
    assert_eq!(alloc.current("new-name").await.unwrap(), 0);
    assert_eq!(alloc.allocate("new-name").await.unwrap(), 1);

    assert_eq!(alloc.allocate(ORDER_SEQUENCE).await.unwrap(), 1);
    assert_eq!(alloc.allocate("other").await.unwrap(), 1);
    assert_eq!(alloc.allocate("other").await.unwrap(), 2);
    assert_eq!(alloc.allocate(ORDER_SEQUENCE).await.unwrap(), 2);
    assert_eq!(alloc.current("other").await.unwrap(), 2);
}

async fn check_concurrent(alloc: &SequenceAllocator, n: u64) {
    let before = alloc.current("burst").await.unwrap();

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let alloc = alloc.clone();
            tokio::spawn(async move { alloc.allocate("burst").await })
        })
        .collect();

    let mut values = HashSet::new();
    for handle in handles {
        let value = handle.await.unwrap().unwrap();
        assert!(values.insert(value), "duplicate value {value}");
    }

    let expected: HashSet<u64> = (before + 1..=before + n).collect();
    assert_eq!(values, expected);
    assert_eq!(alloc.current("burst").await.unwrap(), before + n);
}

#[tokio::test]
async fn surreal_sequential_allocation_is_monotonic() {
    let (_tmp, store) = surreal_store().await;
    check_monotonic(&allocator(store)).await;
}

#[tokio::test]
async fn surreal_counters_are_lazy_and_independent() {
    let (_tmp, store) = surreal_store().await;
    check_lazy_and_independent(&allocator(store)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn surreal_concurrent_allocations_are_contiguous() {
    let (_tmp, store) = surreal_store().await;
    check_concurrent(&allocator(store), 64).await;
}

#[tokio::test]
async fn surreal_order_codes_follow_counter() {
    let (_tmp, store) = surreal_store().await;
    let alloc = allocator(store.clone());
    assert_eq!(alloc.next_order_code().await.unwrap().code, "SV-1000-001");
    assert_eq!(alloc.next_order_code().await.unwrap().code, "SV-1000-002");
    assert_eq!(store.current(ORDER_SEQUENCE).await.unwrap(), Some(2));
}

#[tokio::test]
async fn surreal_rejects_invalid_names() {
    let (_tmp, store) = surreal_store().await;
    let alloc = allocator(store.clone());
    assert!(matches!(
        alloc.allocate("  ").await,
        Err(SequenceError::InvalidSequenceName(_))
    ));
    assert_eq!(store.current("  ").await.unwrap(), None);
}

#[tokio::test]
async fn surreal_failed_increment_leaves_counter_unchanged() {
    let tmp = tempfile::tempdir().unwrap();
    let db = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    let db = DbService::from_connection(db, "test", "test").await.unwrap();
    let store = Arc::new(SurrealCounterStore::new(db.db.clone()));
    let alloc = allocator(store.clone());

    assert_eq!(alloc.allocate(ORDER_SEQUENCE).await.unwrap(), 1);
    assert_eq!(alloc.allocate(ORDER_SEQUENCE).await.unwrap(), 2);

    // Storage-side rejection of the third increment
    db.db
        .query("DEFINE FIELD value ON sequence_counter ASSERT $value <= 2")
        .await
        .unwrap()
        .check()
        .unwrap();

    assert!(matches!(
        store.increment(ORDER_SEQUENCE).await,
        Err(CounterStoreError::Unavailable(_))
    ));
    assert!(matches!(
        alloc.allocate(ORDER_SEQUENCE).await,
        Err(SequenceError::StorageUnavailable(_))
    ));
    assert_eq!(alloc.current(ORDER_SEQUENCE).await.unwrap(), 2);

    db.db
        .query("REMOVE FIELD value ON sequence_counter")
        .await
        .unwrap()
        .check()
        .unwrap();
    assert_eq!(alloc.allocate(ORDER_SEQUENCE).await.unwrap(), 3);
}

#[tokio::test]
async fn surreal_uninitialised_connection_is_unavailable() {
    let store = Arc::new(SurrealCounterStore::new(Surreal::init()));
    let alloc = allocator(store);
    assert!(matches!(
        alloc.allocate(ORDER_SEQUENCE).await,
        Err(SequenceError::StorageUnavailable(_))
    ));
}

#[tokio::test]
async fn memory_store_matches_surreal_behaviour() {
    check_monotonic(&allocator(Arc::new(MemoryCounterStore::new()))).await;
    check_lazy_and_independent(&allocator(Arc::new(MemoryCounterStore::new()))).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn memory_concurrent_allocations_are_contiguous() {
    check_concurrent(&allocator(Arc::new(MemoryCounterStore::new())), 200).await;
}
