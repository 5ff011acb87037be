use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Event, EventSummary};
use crate::utils::error::AppError;

const SUMMARY_SELECT: &str = "SELECT e.id, e.name, e.number, e.category_id, c.name AS category_name, \
     e.user_id, u.username AS owner_name, e.created_at, e.modified_at \
     FROM events e \
     JOIN categories c ON c.id = e.category_id \
     JOIN users u ON u.id = e.user_id";

pub struct NewEvent<'a> {
    pub name: &'a str,
    pub number: i64,
    pub category_id: i64,
}

pub async fn count(pool: &SqlitePool) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

pub async fn list_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<EventSummary>, AppError> {
    let sql = format!("{SUMMARY_SELECT} ORDER BY e.id LIMIT ? OFFSET ?");
    sqlx::query_as(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
}

pub async fn count_by_owner(pool: &SqlitePool, user_id: i64) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

pub async fn list_page_by_owner(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<EventSummary>, AppError> {
    let sql = format!("{SUMMARY_SELECT} WHERE e.user_id = ? ORDER BY e.id LIMIT ? OFFSET ?");
    sqlx::query_as(&sql)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Event>, AppError> {
    sqlx::query_as("SELECT * FROM events WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

pub async fn find_summary(pool: &SqlitePool, id: i64) -> Result<Option<EventSummary>, AppError> {
    let sql = format!("{SUMMARY_SELECT} WHERE e.id = ?");
    sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

pub async fn create(pool: &SqlitePool, new: &NewEvent<'_>, user_id: i64) -> Result<Event, AppError> {
    let now = Utc::now();
    let event = sqlx::query_as(
        "INSERT INTO events (name, number, category_id, user_id, created_at, modified_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(new.name)
    .bind(new.number)
    .bind(new.category_id)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// The owner is never touched; `None` when no event has this id.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    changes: &NewEvent<'_>,
) -> Result<Option<Event>, AppError> {
    sqlx::query_as(
        "UPDATE events SET name = ?, number = ?, category_id = ?, modified_at = ? \
         WHERE id = ? RETURNING *",
    )
    .bind(changes.name)
    .bind(changes.number)
    .bind(changes.category_id)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)
}

/// False for events that do not exist as well as for other owners' events.
pub async fn is_owner(pool: &SqlitePool, event_id: i64, user_id: i64) -> Result<bool, AppError> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = ? AND user_id = ?)")
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn test_ownership_predicate() {
        let pool = db::connect_in_memory().await.unwrap();
        let owner = db::user::find_or_create(&pool, "owner").await.unwrap().0;
        let other = db::user::find_or_create(&pool, "other").await.unwrap().0;
        let category = db::category::create(&pool, "Party").await.unwrap();
        let new = NewEvent {
            name: "Year-end party",
            number: 10,
            category_id: category.id,
        };
        let event = create(&pool, &new, owner.id).await.unwrap();

        assert!(is_owner(&pool, event.id, owner.id).await.unwrap());
        assert!(!is_owner(&pool, event.id, other.id).await.unwrap());
        assert!(!is_owner(&pool, event.id + 100, owner.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_keeps_owner() {
        let pool = db::connect_in_memory().await.unwrap();
        let owner = db::user::find_or_create(&pool, "owner").await.unwrap().0;
        let category = db::category::create(&pool, "Party").await.unwrap();
        let event = create(
            &pool,
            &NewEvent {
                name: "Picnic",
                number: 2,
                category_id: category.id,
            },
            owner.id,
        )
        .await
        .unwrap();

        let changes = NewEvent {
            name: "Picnic (rain date)",
            number: 5,
            category_id: category.id,
        };
        let updated = update(&pool, event.id, &changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "Picnic (rain date)");
        assert_eq!(updated.number, 5);
        assert_eq!(updated.user_id, owner.id);
        assert!(update(&pool, event.id + 1, &changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_negative_capacity_rejected_by_schema() {
        let pool = db::connect_in_memory().await.unwrap();
        let owner = db::user::find_or_create(&pool, "owner").await.unwrap().0;
        let category = db::category::create(&pool, "Party").await.unwrap();
        let result = create(
            &pool,
            &NewEvent {
                name: "Broken",
                number: -1,
                category_id: category.id,
            },
            owner.id,
        )
        .await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }
}
