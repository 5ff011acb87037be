use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::User;
use crate::utils::error::AppError;

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

/// Returns the user and whether it was created by this call. The insert
/// yields to an existing row, so concurrent first logins under one name all
/// resolve to the same user.
pub async fn find_or_create(pool: &SqlitePool, username: &str) -> Result<(User, bool), AppError> {
    let now = Utc::now();
    let inserted = sqlx::query(
        "INSERT INTO users (username, created_at, modified_at) VALUES (?, ?, ?) \
         ON CONFLICT(username) DO NOTHING",
    )
    .bind(username)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected();

    let user = find_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::InternalServerError(format!("User '{}' vanished", username)))?;
    Ok((user, inserted == 1))
}
