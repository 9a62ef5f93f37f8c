use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::application::ports::in_ports::EntryManagementUseCase;
use crate::application::validation;
use crate::domain::entities::entry::{Entry, EntryForm, NewEntry};
use crate::domain::entities::user::Session;
use crate::domain::repositories::EntryRepository;
use crate::error::Result;

/// Create and list diary entries, always scoped to the session's owner.
pub struct EntryService<E: EntryRepository> {
    entries: Arc<E>,
}

impl<E: EntryRepository> EntryService<E> {
    pub fn new(entries: Arc<E>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl<E: EntryRepository> EntryManagementUseCase for EntryService<E> {
    async fn create_entry(&self, session: &Session, form: EntryForm) -> Result<Entry> {
        validation::validate_entry(&form)?;

        let entry = self
            .entries
            .create(&NewEntry {
                date: Utc::now(),
                title: validation::normalize_title(form.title.as_deref()),
                content: form.content,
                user_id: session.user_id,
            })
            .await?;

        info!(user_id = session.user_id, entry_id = entry.id, "entry created");
        Ok(entry)
    }

    async fn list_entries(&self, session: &Session) -> Result<Vec<Entry>> {
        Ok(self.entries.list_for_user(session.user_id).await?)
    }
}
