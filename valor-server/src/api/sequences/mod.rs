//! Sequence API 模块 (管理员只读)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/sequences/{name}", get(handler::current))
        .route_layer(middleware::from_fn(require_admin))
}
