//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::ensure_admin;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserSummary};
use crate::utils::{ApiResponse, AppError, AppResult};

/// GET /api/users - 管理员获取所有用户
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<UserSummary>>>> {
    ensure_admin(&current_user)?;
    let users = state.users.find_all().await?;
    Ok(Json(ApiResponse::success(
        users.iter().map(User::to_summary).collect(),
    )))
}

/// GET /api/users/:id - 本人或管理员
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<User>>> {
    if !current_user.can_access_user(&id) {
        return Err(AppError::forbidden("Cannot view another user's profile"));
    }
    let user = state
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(AppError::user_not_found)?;
    Ok(Json(ApiResponse::success(user)))
}
