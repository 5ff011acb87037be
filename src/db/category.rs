use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::Category;
use crate::utils::error::AppError;

pub async fn count(pool: &SqlitePool) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

pub async fn list_page(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<Category>, AppError> {
    sqlx::query_as("SELECT * FROM categories ORDER BY id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Category>, AppError> {
    sqlx::query_as("SELECT * FROM categories ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Category>, AppError> {
    sqlx::query_as("SELECT * FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

pub async fn create(pool: &SqlitePool, name: &str) -> Result<Category, AppError> {
    let now = Utc::now();
    let category = sqlx::query_as(
        "INSERT INTO categories (name, created_at, modified_at) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

/// `None` when no category has this id.
pub async fn update(pool: &SqlitePool, id: i64, name: &str) -> Result<Option<Category>, AppError> {
    sqlx::query_as("UPDATE categories SET name = ?, modified_at = ? WHERE id = ? RETURNING *")
        .bind(name)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}
