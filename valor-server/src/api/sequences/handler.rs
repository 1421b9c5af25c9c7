//! Sequence API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Serialize)]
pub struct SequenceValue {
    pub name: String,
    /// Last issued value, 0 if never allocated
    pub value: u64,
}

/// GET /api/sequences/:name - 读取计数器当前值 (不递增)
pub async fn current(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<SequenceValue>>> {
    let value = state.sequences.current(&name).await?;
    Ok(Json(ApiResponse::success(SequenceValue { name, value })))
}
