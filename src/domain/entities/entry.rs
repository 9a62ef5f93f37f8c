use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A diary entry. Owned by exactly one user for its whole life; there are
/// no update or delete operations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub title: Option<String>,
    pub content: String,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: DateTime<Utc>,
    pub title: Option<String>,
    pub content: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub title: Option<String>,
    pub content: String,
}
