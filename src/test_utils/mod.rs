//! In-memory fakes and fixtures shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::application::ports::notifier::{Notifier, OutboundEmail};
use crate::application::services::AccountService;
use crate::domain::entities::entry::{Entry, NewEntry};
use crate::domain::entities::user::{NewUser, RegistrationForm, User};
use crate::domain::repositories::{EntryRepository, UserRepository};
use crate::domain::services::token_service::DEFAULT_RESET_TOKEN_TTL_SECS;
use crate::domain::services::TokenService;
use crate::error::{DiaryError, FieldError};

pub type TestAccountService =
    AccountService<InMemoryUserRepository, InMemoryEntryRepository, RecordingNotifier>;

/// Vec-backed user store. Mirrors the UNIQUE constraints the real schema
/// carries so tests exercise the same failure surface.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User> {
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(anyhow!("unique violation: username"));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(anyhow!("unique violation: email"));
        }
        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            username: user.username.clone(),
            dob: user.dob,
            email: user.email.clone(),
            kin_email: user.kin_email.clone(),
            password_hash: user.password_hash.clone(),
            join_date: user.join_date,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.read().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_kin_email(&self, kin_email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.kin_email == kin_email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        Ok(self.users.read().unwrap().clone())
    }

    async fn update_profile(&self, id: i64, username: &str, kin_email: &str) -> Result<User> {
        let mut users = self.users.write().unwrap();
        if users.iter().any(|u| u.id != id && u.username == username) {
            return Err(anyhow!("unique violation: username"));
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow!("user not found"))?;
        user.username = username.to_string();
        user.kin_email = kin_email.to_string();
        Ok(user.clone())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let mut users = self.users.write().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow!("user not found"))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicI64,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Plants an entry with a chosen timestamp, for dormancy scenarios.
    pub fn seed(&self, user_id: i64, date: DateTime<Utc>) {
        let mut entries = self.entries.write().unwrap();
        entries.push(Entry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            date,
            title: None,
            content: "seeded".to_string(),
            user_id,
        });
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn create(&self, entry: &NewEntry) -> Result<Entry> {
        let mut entries = self.entries.write().unwrap();
        let created = Entry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            date: entry.date,
            title: entry.title.clone(),
            content: entry.content.clone(),
            user_id: entry.user_id,
        };
        entries.push(created.clone());
        Ok(created)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Entry>> {
        let mut owned: Vec<Entry> = self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn latest_for_user(&self, user_id: i64) -> Result<Option<Entry>> {
        Ok(self.list_for_user(user_id).await?.into_iter().next())
    }
}

/// Captures outbound mail instead of delivering it; can be told to fail
/// the next send to exercise the notification-failure path.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_next: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("mail gateway unreachable"));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub fn test_token_service() -> TokenService {
    TokenService::new(
        "test-secret".to_string(),
        Duration::seconds(DEFAULT_RESET_TOKEN_TTL_SECS),
        Duration::hours(24),
        Duration::days(30),
    )
}

/// A fully wired account service over in-memory collaborators, returned
/// together with handles to each of them.
pub fn account_service() -> (
    TestAccountService,
    Arc<InMemoryUserRepository>,
    Arc<InMemoryEntryRepository>,
    Arc<RecordingNotifier>,
) {
    let users = Arc::new(InMemoryUserRepository::new());
    let entries = Arc::new(InMemoryEntryRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let service = AccountService::new(
        users.clone(),
        entries.clone(),
        notifier.clone(),
        test_token_service(),
        "http://testserver".to_string(),
    );
    (service, users, entries, notifier)
}

/// A valid registration submission; tests mutate single fields off this.
pub fn registration_form() -> RegistrationForm {
    RegistrationForm {
        firstname: "Ana".to_string(),
        lastname: "Banks".to_string(),
        username: "anab".to_string(),
        dob: "14/03/1990".to_string(),
        email: "ana@x.com".to_string(),
        kin_email: "kin@x.com".to_string(),
        password: "p1secret".to_string(),
        confirm_password: "p1secret".to_string(),
    }
}

/// A user store pre-populated with two accounts.
pub async fn seeded_users() -> InMemoryUserRepository {
    let users = InMemoryUserRepository::new();
    users
        .create(&NewUser {
            firstname: "Ana".to_string(),
            lastname: "Banks".to_string(),
            username: "anab".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
            email: "ana@x.com".to_string(),
            kin_email: "kin@x.com".to_string(),
            password_hash: "$argon2$unused".to_string(),
            join_date: Utc::now(),
        })
        .await
        .unwrap();
    users
        .create(&NewUser {
            firstname: "Ben".to_string(),
            lastname: "Cole".to_string(),
            username: "benc".to_string(),
            dob: NaiveDate::from_ymd_opt(1985, 7, 2).unwrap(),
            email: "ben@x.com".to_string(),
            kin_email: "benkin@x.com".to_string(),
            password_hash: "$argon2$unused".to_string(),
            join_date: Utc::now(),
        })
        .await
        .unwrap();
    users
}

/// Unwraps the per-field errors out of a validation failure.
pub fn field_errors(err: DiaryError) -> Vec<FieldError> {
    match err {
        DiaryError::Validation(errors) => errors,
        other => panic!("expected a validation error, got {other:?}"),
    }
}
