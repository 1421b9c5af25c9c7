//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::ensure_admin;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatusUpdate, UserOrders};
use crate::utils::{ApiResponse, AppResult};

/// POST /api/orders - 为当前用户下单，分配订单编号
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let order = state.orders.create_order(&current_user, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "You have successfully created an order",
            order,
        )),
    ))
}

/// GET /api/orders - 管理员获取所有订单
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    ensure_admin(&current_user)?;
    let orders = state.orders.list_all().await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/orders/user/:user_id - 本人或管理员
pub async fn list_by_user(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<UserOrders>>> {
    let orders = state.orders.list_for_user(&current_user, &user_id).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/orders/:id - 下单人或管理员
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get(&current_user, &id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// PATCH /api/orders/:id/status - 管理员修改订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    ensure_admin(&current_user)?;
    let order = state.orders.update_status(&id, &payload.status).await?;
    tracing::info!(
        order_code = %order.order_code,
        status = %order.status,
        user_id = %current_user.id,
        "Order status updated"
    );
    Ok(Json(ApiResponse::success(order)))
}
