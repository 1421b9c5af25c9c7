//! Database Models

// Serde helpers
pub mod serde_helpers;

// Accounts
pub mod user;

// Catalog
pub mod product;

// Orders
pub mod order;
pub mod sequence;

// Re-exports
pub use order::{Order, OrderCreate, OrderId, OrderItem, OrderStatusUpdate, UserOrders};
pub use product::{Product, ProductCreate, ProductId, ProductUpdate};
pub use sequence::{SEQUENCE_COUNTER_TABLE, SequenceCounter};
pub use user::{Address, User, UserCreate, UserId, UserSummary};
