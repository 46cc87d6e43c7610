use axum::{extract::State, Json};
use std::sync::Arc;
use labwise_core::{
    errors::LabError,
    models::{LoginRequest, LoginResponse, SignupRequest, User},
};

use crate::{
    middleware::{auth, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<User>, AppError> {
    if payload.password.len() < 8 {
        return Err(AppError(LabError::Validation(
            "Password must be at least 8 characters".to_string(),
        )));
    }

    let existing = labwise_db::repositories::user::get_user_by_email(&state.db_pool, &payload.email)
        .await
        .map_err(LabError::Database)?;
    if existing.is_some() {
        return Err(AppError(LabError::Validation(format!(
            "An account for {} already exists",
            payload.email
        ))));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let db_user = labwise_db::repositories::user::create_user(
        &state.db_pool,
        &payload.email,
        &payload.name,
        &password_hash,
        payload.role,
    )
    .await
    .map_err(LabError::Database)?;

    let user = db_user.into_user().map_err(LabError::Database)?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    headers: axum::http::HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    if let Some(token) = auth::bearer_token(&headers) {
        labwise_db::repositories::user::delete_session(&state.db_pool, token)
            .await
            .map_err(LabError::Database)?;
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = labwise_db::repositories::user::verify_credentials(
        &state.db_pool,
        &payload.email,
        &payload.password,
    )
    .await
    .map_err(LabError::Database)?
    .ok_or_else(|| LabError::Authentication("Invalid email or password".to_string()))?;

    let role: labwise_core::models::Role = user
        .role
        .parse()
        .map_err(|_| LabError::Internal(format!("corrupt role for user {}", user.id).into()))?;

    let session = labwise_db::repositories::user::create_session(&state.db_pool, user.id)
        .await
        .map_err(LabError::Database)?;

    Ok(Json(LoginResponse {
        token: session.token,
        role,
    }))
}
