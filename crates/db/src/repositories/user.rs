use argon2::{Argon2, PasswordVerifier};
use chrono::Utc;
use eyre::Result;
use labwise_core::models::Role;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbSession, DbUser};

pub async fn create_user(
    pool: &Pool<Postgres>,
    email: &str,
    name: &str,
    password_hash: &str,
    role: Role,
) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, email={}, role={}", id, email, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, name, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, email, name, password_hash, role, created_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, name, password_hash, role, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Checks email/password, returning the user on a match and `None` on an
/// unknown email or a wrong password.
pub async fn verify_credentials(
    pool: &Pool<Postgres>,
    email: &str,
    password: &str,
) -> Result<Option<DbUser>> {
    let Some(user) = get_user_by_email(pool, email).await? else {
        return Ok(None);
    };

    let parsed_hash = argon2::PasswordHash::new(&user.password_hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(is_valid.then_some(user))
}

pub async fn create_session(pool: &Pool<Postgres>, user_id: Uuid) -> Result<DbSession> {
    let token = Uuid::new_v4();
    let now = Utc::now();

    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, user_id, created_at)
        VALUES ($1, $2, $3)
        RETURNING token, user_id, created_at
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// Resolves a bearer token to the holder's (user id, role), or `None` for an
/// unknown token.
pub async fn get_session_user(
    pool: &Pool<Postgres>,
    token: Uuid,
) -> Result<Option<(Uuid, Role)>> {
    let row = sqlx::query_as::<_, (Uuid, String)>(
        r#"
        SELECT users.id, users.role
        FROM sessions
        JOIN users ON users.id = sessions.user_id
        WHERE sessions.token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((user_id, role)) => {
            let role = role.parse().map_err(|e| eyre::eyre!("{}", e))?;
            Ok(Some((user_id, role)))
        }
        None => Ok(None),
    }
}

pub async fn delete_session(pool: &Pool<Postgres>, token: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .execute(pool)
    .await?;

    Ok(())
}
