//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// Line item, priced at order time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub size: Option<String>,
}

/// Order model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Human-readable code (`SV-1000-001`), immutable once created
    pub order_code: String,
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub address: String,
    pub country: String,
    pub state: String,
    #[serde(default)]
    pub city: Option<String>,
    pub shipping_method: String,
    #[serde(default, deserialize_with = "serde_helpers::vec_or_empty")]
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Checkout payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub shipping_method: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

/// Orders of one user with the count the storefront expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserOrders {
    pub results: usize,
    pub orders: Vec<Order>,
}
