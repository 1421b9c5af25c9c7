//! Order Service
//!
//! Owns the checkout flow. The order code is allocated exactly once per
//! order, after validation and immediately before persistence.

use shared::models::OrderStatus;

use super::money::{order_total, validate_order_item};
use crate::auth::CurrentUser;
use crate::db::models::{Order, OrderCreate, UserOrders};
use crate::db::repository::{OrderRepository, parse_record_id};
use crate::db::repository::order::NewOrder;
use crate::sequence::SequenceAllocator;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Maximum number of line items in one order
pub const MAX_ORDER_ITEMS: usize = 100;

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    sequences: SequenceAllocator,
}

impl OrderService {
    pub fn new(repo: OrderRepository, sequences: SequenceAllocator) -> Self {
        Self { repo, sequences }
    }

    /// Create an order owned by `user`
    ///
    /// A sequence value consumed here stays consumed if the insert fails.
    pub async fn create_order(&self, user: &CurrentUser, payload: OrderCreate) -> AppResult<Order> {
        validate_order_payload(&payload)?;
        let owner = parse_record_id("user", &user.id)?;

        let mut payload = payload;
        let items = std::mem::take(&mut payload.items);
        let total_price = order_total(&items);

        let code = self.sequences.next_order_code().await?;

        let new_order = NewOrder {
            order_code: code.code.clone(),
            user: owner,
            details: payload,
            items,
            total_price,
        };

        match self.repo.create(new_order).await {
            Ok(order) => {
                tracing::info!(
                    order_code = %order.order_code,
                    user_id = %user.id,
                    total_price = order.total_price,
                    items = order.items.len(),
                    "Order created"
                );
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(
                    order_code = %code,
                    sequence = code.sequence,
                    user_id = %user.id,
                    error = %e,
                    "Order persistence failed, order code consumed"
                );
                Err(e.into())
            }
        }
    }

    /// All orders, newest first
    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        Ok(self.repo.find_all().await?)
    }

    /// Orders of `user_id`; callers may only list their own unless admin
    pub async fn list_for_user(&self, caller: &CurrentUser, user_id: &str) -> AppResult<UserOrders> {
        if !caller.can_access_user(user_id) {
            return Err(AppError::forbidden("Cannot view another user's orders"));
        }
        let owner = parse_record_id("user", user_id)?;
        let orders = self.repo.find_by_user(owner).await?;
        Ok(UserOrders {
            results: orders.len(),
            orders,
        })
    }

    /// One order, visible to its owner and to admins
    ///
    /// Other users get 404 rather than 403 so order ids cannot be probed.
    pub async fn get(&self, caller: &CurrentUser, id: &str) -> AppResult<Order> {
        let order = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::order_not_found)?;

        if !caller.is_admin() && !caller.can_access_user(&order.user.to_string()) {
            return Err(AppError::order_not_found());
        }
        Ok(order)
    }

    /// Change the fulfilment status; `order_code` is never touched
    pub async fn update_status(&self, id: &str, status: &str) -> AppResult<Order> {
        let status: OrderStatus = status.parse().map_err(|e: String| {
            AppError::with_message(ErrorCode::OrderInvalidStatus, e)
        })?;
        self.repo.update_status(id, status).await.map_err(|e| match e {
            crate::db::repository::RepoError::NotFound(_) => AppError::order_not_found(),
            other => other.into(),
        })
    }
}

/// Shipping details and items must be present before a code is allocated
fn validate_order_payload(payload: &OrderCreate) -> AppResult<()> {
    validate_required_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.country_code, "country_code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    validate_required_text(&payload.country, "country", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.shipping_method, "shipping_method", MAX_SHORT_TEXT_LEN)?;

    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    if payload.items.len() > MAX_ORDER_ITEMS {
        return Err(AppError::validation(format!(
            "too many items ({}, max {MAX_ORDER_ITEMS})",
            payload.items.len()
        )));
    }
    for (index, item) in payload.items.iter().enumerate() {
        validate_order_item(item, index)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::OrderItem;
    use crate::sequence::{CounterStore, CounterStoreError, MemoryCounterStore, ORDER_SEQUENCE};
    use async_trait::async_trait;
    use shared::models::UserRole;
    use std::sync::Arc;
    use surrealdb::Surreal;
    use surrealdb::engine::local::RocksDb;

    struct OfflineStore;

    #[async_trait]
    impl CounterStore for OfflineStore {
        async fn increment(&self, _name: &str) -> Result<u64, CounterStoreError> {
            Err(CounterStoreError::Unavailable("connection refused".into()))
        }

        async fn current(&self, _name: &str) -> Result<Option<u64>, CounterStoreError> {
            Err(CounterStoreError::Unavailable("connection refused".into()))
        }
    }

    async fn setup(
        store: Arc<dyn CounterStore>,
    ) -> (tempfile::TempDir, OrderService, SequenceAllocator) {
        let tmp = tempfile::tempdir().unwrap();
        let db = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
        let db = DbService::from_connection(db, "test", "test").await.unwrap();
        let sequences = SequenceAllocator::new(store);
        let service = OrderService::new(OrderRepository::new(db.db), sequences.clone());
        (tmp, service, sequences)
    }

    fn customer(key: &str) -> CurrentUser {
        CurrentUser {
            id: format!("user:{key}"),
            email: format!("{key}@example.com"),
            role: UserRole::Customer,
        }
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            id: "user:root".into(),
            email: "root@example.com".into(),
            role: UserRole::Admin,
        }
    }

    fn payload() -> OrderCreate {
        OrderCreate {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            country_code: "+44".into(),
            phone_number: "7700900123".into(),
            address: "12 St James's Square".into(),
            country: "United Kingdom".into(),
            state: "London".into(),
            city: Some("London".into()),
            shipping_method: "express".into(),
            items: vec![
                OrderItem {
                    product_id: "product:halo".into(),
                    name: "Halo Ring".into(),
                    price: 1299.99,
                    quantity: 1,
                    size: Some("6".into()),
                },
                OrderItem {
                    product_id: "product:studs".into(),
                    name: "Diamond Studs".into(),
                    price: 450.5,
                    quantity: 2,
                    size: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_codes() {
        let (_tmp, service, _) = setup(Arc::new(MemoryCounterStore::new())).await;
        let ada = customer("ada");

        let first = service.create_order(&ada, payload()).await.unwrap();
        let second = service.create_order(&ada, payload()).await.unwrap();

        assert_eq!(first.order_code, "SV-1000-001");
        assert_eq!(second.order_code, "SV-1000-002");
        assert_eq!(first.total_price, 2200.99);
        assert_eq!(first.status, OrderStatus::Ongoing);
        assert_eq!(first.user.to_string(), "user:ada");
    }

    #[tokio::test]
    async fn test_invalid_payload_consumes_no_code() {
        let (_tmp, service, sequences) = setup(Arc::new(MemoryCounterStore::new())).await;
        let ada = customer("ada");

        let mut empty = payload();
        empty.items.clear();
        let err = service.create_order(&ada, empty).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);

        let mut missing = payload();
        missing.address = "  ".into();
        let err = service.create_order(&ada, missing).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut zero_qty = payload();
        zero_qty.items[0].quantity = 0;
        assert!(service.create_order(&ada, zero_qty).await.is_err());

        assert_eq!(sequences.current(ORDER_SEQUENCE).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sequence_outage_aborts_creation() {
        let (_tmp, service, _) = setup(Arc::new(OfflineStore)).await;

        let err = service
            .create_order(&customer("ada"), payload())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SequenceUnavailable);
        assert_eq!(err.http_status(), http::StatusCode::SERVICE_UNAVAILABLE);

        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_visibility_rules() {
        let (_tmp, service, _) = setup(Arc::new(MemoryCounterStore::new())).await;
        let ada = customer("ada");
        let bob = customer("bob");

        let order = service.create_order(&ada, payload()).await.unwrap();
        let id = order.id.clone().unwrap().to_string();

        assert!(service.get(&ada, &id).await.is_ok());
        assert!(service.get(&admin(), &id).await.is_ok());
        let err = service.get(&bob, &id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);

        let own = service.list_for_user(&ada, "user:ada").await.unwrap();
        assert_eq!(own.results, 1);
        assert_eq!(own.orders[0].order_code, order.order_code);

        let err = service.list_for_user(&bob, "user:ada").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let as_admin = service.list_for_user(&admin(), "ada").await.unwrap();
        assert_eq!(as_admin.results, 1);
    }

    #[tokio::test]
    async fn test_update_status_keeps_code() {
        let (_tmp, service, _) = setup(Arc::new(MemoryCounterStore::new())).await;
        let order = service
            .create_order(&customer("ada"), payload())
            .await
            .unwrap();
        let id = order.id.clone().unwrap().to_string();

        let updated = service.update_status(&id, "completed").await.unwrap();
        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.order_code, order.order_code);

        let err = service.update_status(&id, "shipped").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidStatus);

        let err = service
            .update_status("order:missing", "completed")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }
}
