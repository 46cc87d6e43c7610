//! # Authentication Module
//!
//! Password hashing and the role gate for mutating endpoints.
//!
//! Passwords are hashed with Argon2 (PHC string format, random salt).
//! Sessions are opaque UUID bearer tokens persisted by `labwise-db`; a
//! request's `Authorization: Bearer <token>` header resolves to the caller's
//! role. Gating happens here at the boundary, never inside the scheduling
//! engine.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use axum::http::{header, HeaderMap};
use eyre::Result;
use labwise_core::errors::LabError;
use labwise_core::models::Role;
use uuid::Uuid;

use crate::ApiState;

/// The resolved caller of an authenticated request.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Hashes a password using the Argon2 algorithm with a fresh random salt.
/// Returns the hash in PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Extracts the bearer token from the Authorization header, if present and
/// well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

/// Resolves the caller from the request headers. `None` means anonymous:
/// no Authorization header, a malformed token, or a token with no session.
pub async fn current_user(
    state: &ApiState,
    headers: &HeaderMap,
) -> Result<Option<CurrentUser>, LabError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    let session = labwise_db::repositories::user::get_session_user(&state.db_pool, token)
        .await
        .map_err(LabError::Database)?;

    Ok(session.map(|(user_id, role)| CurrentUser { user_id, role }))
}

/// Gate for mutating timetable operations: the caller must hold a valid
/// session whose role is Teacher. Anonymous callers get 401, students 403.
pub async fn require_teacher(
    state: &ApiState,
    headers: &HeaderMap,
) -> Result<CurrentUser, LabError> {
    let user = current_user(state, headers)
        .await?
        .ok_or_else(|| LabError::Authentication("A signed-in teacher is required".to_string()))?;

    if user.role != Role::Teacher {
        return Err(LabError::Authorization(
            "Only teachers may modify timetables".to_string(),
        ));
    }

    Ok(user)
}
