use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    /// Capacity: how many users may join.
    pub number: i64,
    pub category_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// An event joined with its category and owner, as shown in lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventSummary {
    pub id: i64,
    pub name: String,
    pub number: i64,
    pub category_id: i64,
    pub category_name: String,
    pub user_id: i64,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}
