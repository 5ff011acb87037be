use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{FlashMessage, Level, User};
use crate::utils::error::AppError;

pub async fn create(pool: &SqlitePool, user_id: i64) -> Result<String, AppError> {
    let token = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(token)
}

pub async fn find_user(pool: &SqlitePool, token: &str) -> Result<Option<User>, AppError> {
    sqlx::query_as(
        "SELECT u.* FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)
}

pub async fn delete(pool: &SqlitePool, token: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn push_message(
    pool: &SqlitePool,
    token: &str,
    level: Level,
    message: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO flash_messages (session_token, level, message, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(token)
    .bind(level)
    .bind(message)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Drains the queued notices, oldest first.
pub async fn take_messages(pool: &SqlitePool, token: &str) -> Result<Vec<FlashMessage>, AppError> {
    let mut tx = pool.begin().await?;

    let rows: Vec<(i64, Level, String)> = sqlx::query_as(
        "SELECT id, level, message FROM flash_messages WHERE session_token = ? ORDER BY id",
    )
    .bind(token)
    .fetch_all(&mut *tx)
    .await?;

    if let Some((last_id, _, _)) = rows.last() {
        sqlx::query("DELETE FROM flash_messages WHERE session_token = ? AND id <= ?")
            .bind(token)
            .bind(*last_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(rows
        .into_iter()
        .map(|(_, level, message)| FlashMessage { level, message })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn test_messages_are_drained_once() {
        let pool = db::connect_in_memory().await.unwrap();
        let user = db::user::find_or_create(&pool, "alice").await.unwrap().0;
        let token = create(&pool, user.id).await.unwrap();

        push_message(&pool, &token, Level::Success, "first").await.unwrap();
        push_message(&pool, &token, Level::Error, "second").await.unwrap();

        let messages = take_messages(&pool, &token).await.unwrap();
        assert_eq!(
            messages,
            vec![
                FlashMessage {
                    level: Level::Success,
                    message: "first".to_string()
                },
                FlashMessage {
                    level: Level::Error,
                    message: "second".to_string()
                },
            ]
        );
        assert!(take_messages(&pool, &token).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_session_no_longer_resolves() {
        let pool = db::connect_in_memory().await.unwrap();
        let user = db::user::find_or_create(&pool, "bob").await.unwrap().0;
        let token = create(&pool, user.id).await.unwrap();

        let found = find_user(&pool, &token).await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        delete(&pool, &token).await.unwrap();
        assert!(find_user(&pool, &token).await.unwrap().is_none());
    }
}
