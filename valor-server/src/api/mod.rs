//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、当前用户
//! - [`users`] - 用户查询
//! - [`products`] - 商品目录
//! - [`orders`] - 订单
//! - [`sequences`] - 序列计数器 (只读)

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod sequences;
pub mod users;

use axum::middleware as axum_middleware;
use axum::{Json, Router, routing::get};
use http::{HeaderName, HeaderValue, Method};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{CurrentUser, require_auth};
use crate::core::ServerState;
use crate::middleware::{logging_middleware, security_headers};
use crate::security_log;
use crate::utils::{AppError, AppResult};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .route("/", get(root))
        // Public
        .merge(health::router())
        .merge(auth::router())
        // Catalog: reads public, writes admin
        .merge(products::router())
        // Authenticated
        .merge(users::router())
        .merge(orders::router())
        // Admin
        .merge(sequences::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by the HTTP server and by in-process tests
pub fn build_app(state: ServerState) -> Router {
    let cors = cors_layer(state.config.frontend_url.as_deref());

    let app = build_router()
        // JWT 认证 - 注入 CurrentUser，公共路由内部跳过
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state)
        // Request logging (sees the user require_auth left on the response)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    security_headers(app)
        // Request ID - outermost so every layer above sees it
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}

/// CORS: `FRONTEND_URL` when set, otherwise permissive
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let Some(url) = frontend_url else {
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(url.trim_end_matches('/')) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(frontend_url = %url, "Invalid FRONTEND_URL, falling back to permissive CORS");
            CorsLayer::permissive()
        }
    }
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
    version: &'static str,
    status: &'static str,
}

/// GET / - service banner
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Jewelry E-Commerce API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

/// Handler-level admin check for routes that share a path with non-admin methods
pub(crate) fn ensure_admin(user: &CurrentUser) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    security_log!(
        WARN,
        "admin_required",
        user_id = user.id.clone(),
        email = user.email.clone()
    );
    Err(AppError::admin_required())
}
