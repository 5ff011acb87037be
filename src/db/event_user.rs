use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{Attendee, Event, JoinOutcome, LeaveOutcome};
use crate::utils::error::AppError;

pub async fn count_for_event(pool: &SqlitePool, event_id: i64) -> Result<i64, AppError> {
    sqlx::query_scalar("SELECT COUNT(*) FROM event_users WHERE event_id = ?")
        .bind(event_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

pub async fn is_attending(pool: &SqlitePool, event_id: i64, user_id: i64) -> Result<bool, AppError> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM event_users WHERE event_id = ? AND user_id = ?)")
        .bind(event_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

/// Attendees in join order.
pub async fn attendees(pool: &SqlitePool, event_id: i64) -> Result<Vec<Attendee>, AppError> {
    sqlx::query_as(
        "SELECT eu.user_id, u.username, eu.created_at AS joined_at \
         FROM event_users eu JOIN users u ON u.id = eu.user_id \
         WHERE eu.event_id = ? ORDER BY eu.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
    .map_err(AppError::from)
}

/// Inserts the join row only while the event is below capacity; the unique
/// (event_id, user_id) key drops repeat joins. Both checks live in one
/// statement so concurrent joins cannot overshoot. When nothing was inserted,
/// a full event is reported ahead of a repeat join.
pub async fn join(pool: &SqlitePool, event: &Event, user_id: i64) -> Result<JoinOutcome, AppError> {
    let now = Utc::now();
    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO event_users (event_id, user_id, created_at, modified_at) \
         SELECT e.id, ?, ?, ? FROM events e \
         WHERE e.id = ? \
           AND (SELECT COUNT(*) FROM event_users eu WHERE eu.event_id = e.id) < e.number",
    )
    .bind(user_id)
    .bind(now)
    .bind(now)
    .bind(event.id)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted > 0 {
        return Ok(JoinOutcome::Joined);
    }

    if count_for_event(pool, event.id).await? >= event.number {
        Ok(JoinOutcome::Full)
    } else {
        Ok(JoinOutcome::AlreadyJoined)
    }
}

pub async fn leave(pool: &SqlitePool, event_id: i64, user_id: i64) -> Result<LeaveOutcome, AppError> {
    let deleted = sqlx::query("DELETE FROM event_users WHERE event_id = ? AND user_id = ?")
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        Ok(LeaveOutcome::NotAttending)
    } else {
        Ok(LeaveOutcome::Left)
    }
}
