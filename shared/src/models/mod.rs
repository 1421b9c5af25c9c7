//! Storefront enums shared between the server and API clients

pub mod order;
pub mod user;

// Re-exports
pub use order::*;
pub use user::*;
