//! Authentication Handlers
//!
//! Signup, login and the current user

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use shared::client::{LoginRequest, LoginResponse, SignupRequest, UserInfo};
use shared::models::UserRole;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserCreate;
use crate::db::repository::RepoError;
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text, validate_password,
    validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<ServerState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserInfo>>)> {
    validate_required_text(&req.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&req.last_name, "last_name", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_optional_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let email = req.email.trim().to_lowercase();
    let user = state
        .users
        .create(UserCreate {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            role: UserRole::Customer,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => {
                security_log!(INFO, "signup_duplicate_email", email = email.clone());
                AppError::email_taken(&email)
            }
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id_string(), email = %user.email, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Account created",
            user.to_info(),
        )),
    ))
}

/// POST /api/auth/login
///
/// Authenticates credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Please provide email and password"));
    }

    let user = state.users.find_by_email(&req.email).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => {
            let password_valid = user
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                security_log!(WARN, "login_failed", email = req.email.clone(), reason = "invalid_password");
                return Err(AppError::invalid_credentials());
            }
            user
        }
        None => {
            security_log!(WARN, "login_failed", email = req.email.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id_string();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.email, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, email = %user.email, role = %user.role, "User logged in");

    Ok(Json(ApiResponse::success_with_message(
        "Login successful",
        LoginResponse {
            token,
            user: user.to_info(),
        },
    )))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserInfo>>> {
    let user = state
        .users
        .find_by_id(&current_user.id)
        .await?
        .ok_or_else(AppError::user_not_found)?;
    Ok(Json(ApiResponse::success(user.to_info())))
}
