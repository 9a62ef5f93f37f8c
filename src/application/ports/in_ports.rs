use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::entry::{Entry, EntryForm};
use crate::domain::entities::user::{
    Credentials, KinResetRequestForm, LoginOutcome, ProfileForm, RegistrationForm,
    ResetPasswordForm, ResetRequestForm, Session, User,
};
use crate::error::Result;

#[async_trait]
pub trait RegistrationUseCase: Send + Sync {
    async fn register(&self, form: RegistrationForm) -> Result<User>;
}

#[async_trait]
pub trait AuthenticationUseCase: Send + Sync {
    /// Authenticates and establishes a session. `next` is an optional
    /// redirect target supplied by the caller, echoed back on success.
    async fn login(&self, credentials: Credentials, next: Option<String>) -> Result<LoginOutcome>;

    /// Turns a presented session token into a capability, or nothing if
    /// the token does not check out.
    fn session_from_token(&self, token: &str) -> Option<Session>;
}

#[async_trait]
pub trait ProfileUseCase: Send + Sync {
    async fn profile(&self, session: &Session) -> Result<User>;
    async fn update_profile(&self, session: &Session, form: ProfileForm) -> Result<User>;
}

#[async_trait]
pub trait PasswordResetUseCase: Send + Sync {
    async fn request_password_reset(&self, form: ResetRequestForm) -> Result<()>;
    async fn request_kin_password_reset(&self, form: KinResetRequestForm) -> Result<()>;
    async fn reset_password(
        &self,
        token: &str,
        form: ResetPasswordForm,
        session: Option<&Session>,
    ) -> Result<()>;
}

#[async_trait]
pub trait DormancyUseCase: Send + Sync {
    /// Sweeps every account and sends a dormancy notice for each one whose
    /// most recent entry is more than 31 days old. Safe to call repeatedly;
    /// notices are simply resent. Returns how many notices went out.
    async fn check_dormancy(&self, now: DateTime<Utc>) -> Result<usize>;
}

#[async_trait]
pub trait EntryManagementUseCase: Send + Sync {
    async fn create_entry(&self, session: &Session, form: EntryForm) -> Result<Entry>;
    async fn list_entries(&self, session: &Session) -> Result<Vec<Entry>>;
}
