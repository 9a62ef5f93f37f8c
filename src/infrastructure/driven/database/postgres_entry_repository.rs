use async_trait::async_trait;
use anyhow::Result;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::domain::entities::entry::{Entry, NewEntry};
use crate::domain::repositories::entry_repository::EntryRepository;

pub struct PostgresEntryRepository {
    pool: Arc<Pool<Postgres>>,
}

impl PostgresEntryRepository {
    pub fn new(pool: Arc<Pool<Postgres>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PostgresEntryRepository {
    async fn create(&self, entry: &NewEntry) -> Result<Entry> {
        let result = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (date, title, content, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date, title, content, user_id
            "#,
        )
        .bind(entry.date)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.user_id)
        .fetch_one(&*self.pool)
        .await?;

        Ok(result)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Entry>> {
        let result = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, date, title, content, user_id
            FROM entries
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&*self.pool)
        .await?;

        Ok(result)
    }

    async fn latest_for_user(&self, user_id: i64) -> Result<Option<Entry>> {
        let result = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, date, title, content, user_id
            FROM entries
            WHERE user_id = $1
            ORDER BY date DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(result)
    }
}
