//! Order Module
//!
//! - **service**: checkout flow (validation, total, order code, persistence)
//! - **money**: decimal-safe totals and item validation
//!
//! # Data Flow
//!
//! ```text
//! POST /api/orders → OrderService::create_order
//!                      ├─ validate payload + items
//!                      ├─ total = Σ price × quantity (rust_decimal)
//!                      ├─ SequenceAllocator::next_order_code  ("SV-1000-NNN")
//!                      └─ OrderRepository::create
//! ```

pub mod money;
pub mod service;

pub use service::OrderService;
