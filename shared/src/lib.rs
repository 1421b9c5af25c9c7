//! Shared types for the Saint Valor storefront
//!
//! Error system, API response envelope, auth DTOs and storefront enums used
//! by the server and by any Rust client of its API.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
