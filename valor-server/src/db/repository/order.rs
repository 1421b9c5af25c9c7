//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderCreate, OrderItem};
use shared::models::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// `order` is a SurrealQL keyword, so the table is always passed through `type::table`
pub const ORDER_TABLE: &str = "order";

/// Validated order ready to persist
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_code: String,
    pub user: RecordId,
    pub details: OrderCreate,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) ORDER BY created_at DESC")
            .bind(("table", ORDER_TABLE))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find orders placed by a user, newest first
    pub async fn find_by_user(&self, user: RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) WHERE user = $user ORDER BY created_at DESC")
            .bind(("table", ORDER_TABLE))
            .bind(("user", user))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Persist a new order
    pub async fn create(&self, order: NewOrder) -> RepoResult<Order> {
        let now = shared::util::now_millis();
        let details = order.details;
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE type::table($table) SET
                    order_code = $order_code,
                    first_name = $first_name,
                    last_name = $last_name,
                    country_code = $country_code,
                    phone_number = $phone_number,
                    address = $address,
                    country = $country,
                    state = $state,
                    city = $city,
                    shipping_method = $shipping_method,
                    items = $items,
                    total_price = $total_price,
                    status = $status,
                    user = $user,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("table", ORDER_TABLE))
            .bind(("order_code", order.order_code))
            .bind(("first_name", details.first_name))
            .bind(("last_name", details.last_name))
            .bind(("country_code", details.country_code))
            .bind(("phone_number", details.phone_number))
            .bind(("address", details.address))
            .bind(("country", details.country))
            .bind(("state", details.state))
            .bind(("city", details.city))
            .bind(("shipping_method", details.shipping_method))
            .bind(("items", order.items))
            .bind(("total_price", order.total_price))
            .bind(("status", OrderStatus::Ongoing.as_str()))
            .bind(("user", order.user))
            .bind(("now", now))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Change the fulfilment status of an order
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let thing = parse_record_id(ORDER_TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status.as_str()))
            .bind(("now", shared::util::now_millis()))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
