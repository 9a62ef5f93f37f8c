use async_trait::async_trait;

use crate::domain::entities::entry::{Entry, NewEntry};
use anyhow::Result;

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn create(&self, entry: &NewEntry) -> Result<Entry>;
    /// All entries owned by the user, newest first.
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Entry>>;
    async fn latest_for_user(&self, user_id: i64) -> Result<Option<Entry>>;
}
