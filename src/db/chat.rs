use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Chat, ChatMessage};
use crate::utils::error::AppError;

pub async fn create(
    pool: &SqlitePool,
    event_id: i64,
    user_id: i64,
    body: &str,
) -> Result<Chat, AppError> {
    let now = Utc::now();
    let chat = sqlx::query_as(
        "INSERT INTO chats (body, event_id, user_id, created_at, modified_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(body)
    .bind(event_id)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(chat)
}

/// The whole thread, oldest first.
pub async fn list_for_event(pool: &SqlitePool, event_id: i64) -> Result<Vec<ChatMessage>, AppError> {
    sqlx::query_as(
        "SELECT c.id, c.body, c.user_id, u.username, c.created_at \
         FROM chats c JOIN users u ON u.id = c.user_id \
         WHERE c.event_id = ? ORDER BY c.created_at, c.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::from)
}
