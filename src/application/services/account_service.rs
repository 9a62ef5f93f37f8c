use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::ports::in_ports::{
    AuthenticationUseCase, DormancyUseCase, PasswordResetUseCase, ProfileUseCase,
    RegistrationUseCase,
};
use crate::application::ports::notifier::{Notifier, OutboundEmail};
use crate::application::validation;
use crate::domain::entities::user::{
    Credentials, KinResetRequestForm, LoginOutcome, NewUser, ProfileForm, RegistrationForm,
    ResetPasswordForm, ResetRequestForm, Session, User,
};
use crate::domain::repositories::{EntryRepository, UserRepository};
use crate::domain::services::{PasswordService, TokenService};
use crate::error::{DiaryError, Result};

/// How long an account may sit without a new entry before its owner and
/// kin are notified.
pub const DORMANCY_THRESHOLD_DAYS: i64 = 31;

/// The account lifecycle controller: registration, login, profile
/// updates, the two password-reset paths, and the dormancy sweep. Every
/// operation either fully applies or leaves the store untouched.
pub struct AccountService<U, E, N>
where
    U: UserRepository,
    E: EntryRepository,
    N: Notifier,
{
    users: Arc<U>,
    entries: Arc<E>,
    notifier: Arc<N>,
    tokens: TokenService,
    /// Externally reachable base URL, used to build reset links.
    public_url: String,
}

impl<U, E, N> AccountService<U, E, N>
where
    U: UserRepository,
    E: EntryRepository,
    N: Notifier,
{
    pub fn new(
        users: Arc<U>,
        entries: Arc<E>,
        notifier: Arc<N>,
        tokens: TokenService,
        public_url: String,
    ) -> Self {
        Self {
            users,
            entries,
            notifier,
            tokens,
            public_url,
        }
    }

    fn reset_email(&self, token: &str) -> (String, String) {
        let subject = "E-Diary - Password Reset Request".to_string();
        let body = format!(
            "To reset your password visit the following link:\n\
             {}/reset_password/{}\n\n\
             If you did not make this request, simply ignore this message \
             and no changes will be made.\n",
            self.public_url, token
        );
        (subject, body)
    }

    fn dormancy_email(&self, user: &User) -> OutboundEmail {
        OutboundEmail {
            to: vec![user.email.clone(), user.kin_email.clone()],
            subject: format!("E-Diary of {} {}", user.firstname, user.lastname),
            body: format!(
                "{}'s E-Diary account ({}) has seen no entries for over a month.\n\
                 You are receiving this because your address is listed as the \
                 account's mail of kin.\n\n\
                 Access can be recovered through a kin password reset:\n\
                 {}/kin_reset_password\n",
                user.firstname, user.email, self.public_url
            ),
        }
    }

    async fn dispatch(&self, email: OutboundEmail) -> Result<()> {
        self.notifier
            .send(&email)
            .await
            .map_err(|e| DiaryError::Notification(e.to_string()))
    }
}

#[async_trait]
impl<U, E, N> RegistrationUseCase for AccountService<U, E, N>
where
    U: UserRepository,
    E: EntryRepository,
    N: Notifier,
{
    async fn register(&self, form: RegistrationForm) -> Result<User> {
        let dob = validation::validate_registration(&*self.users, &form).await?;

        let password_hash = PasswordService::hash(&form.password)?;
        let user = self
            .users
            .create(&NewUser {
                firstname: form.firstname,
                lastname: form.lastname,
                username: form.username,
                dob,
                email: form.email,
                kin_email: form.kin_email,
                password_hash,
                join_date: Utc::now(),
            })
            .await?;

        info!(user_id = user.id, "account created");
        Ok(user)
    }
}

#[async_trait]
impl<U, E, N> AuthenticationUseCase for AccountService<U, E, N>
where
    U: UserRepository,
    E: EntryRepository,
    N: Notifier,
{
    async fn login(&self, credentials: Credentials, next: Option<String>) -> Result<LoginOutcome> {
        // One generic failure for both "no such user" and "wrong password".
        let user = match self.users.find_by_email(&credentials.email).await? {
            Some(user) => user,
            None => return Err(DiaryError::AuthenticationFailed),
        };

        if !PasswordService::verify(&credentials.password, &user.password_hash)? {
            return Err(DiaryError::AuthenticationFailed);
        }

        let token = self.tokens.issue_session(user.id, credentials.remember)?;
        info!(user_id = user.id, "login successful");

        Ok(LoginOutcome {
            token,
            redirect_to: next,
        })
    }

    fn session_from_token(&self, token: &str) -> Option<Session> {
        self.tokens.verify_session(token)
    }
}

#[async_trait]
impl<U, E, N> ProfileUseCase for AccountService<U, E, N>
where
    U: UserRepository,
    E: EntryRepository,
    N: Notifier,
{
    async fn profile(&self, session: &Session) -> Result<User> {
        match self.users.find_by_id(session.user_id).await? {
            Some(user) => Ok(user),
            None => Err(DiaryError::AuthenticationFailed),
        }
    }

    async fn update_profile(&self, session: &Session, form: ProfileForm) -> Result<User> {
        let current = self.profile(session).await?;
        validation::validate_profile_update(&*self.users, &current, &form).await?;

        let updated = self
            .users
            .update_profile(current.id, &form.username, &form.kin_email)
            .await?;
        info!(user_id = updated.id, "profile updated");
        Ok(updated)
    }
}

#[async_trait]
impl<U, E, N> PasswordResetUseCase for AccountService<U, E, N>
where
    U: UserRepository,
    E: EntryRepository,
    N: Notifier,
{
    async fn request_password_reset(&self, form: ResetRequestForm) -> Result<()> {
        let user = validation::validate_reset_request(&*self.users, &form.email).await?;

        let token = self.tokens.issue_reset(user.id)?;
        let (subject, body) = self.reset_email(&token.token);
        self.dispatch(OutboundEmail {
            to: vec![user.email.clone()],
            subject,
            body,
        })
        .await?;

        info!(user_id = user.id, "password reset requested");
        Ok(())
    }

    async fn request_kin_password_reset(&self, form: KinResetRequestForm) -> Result<()> {
        let user = validation::validate_kin_reset_request(&*self.users, &form).await?;

        // The token is for the account the user_email matched, and it goes
        // to that account's stored kin address, not the submitted one.
        let token = self.tokens.issue_reset(user.id)?;
        let (subject, body) = self.reset_email(&token.token);
        self.dispatch(OutboundEmail {
            to: vec![user.kin_email.clone()],
            subject,
            body,
        })
        .await?;

        info!(user_id = user.id, "kin password reset requested");
        Ok(())
    }

    async fn reset_password(
        &self,
        token: &str,
        form: ResetPasswordForm,
        session: Option<&Session>,
    ) -> Result<()> {
        let user_id = match self.tokens.verify_reset(token) {
            Some(user_id) => user_id,
            None => return Err(DiaryError::InvalidToken),
        };
        if session.is_some() {
            return Err(DiaryError::AlreadyAuthenticated);
        }

        // A token for an account that no longer resolves is just as
        // invalid as a tampered one.
        let user = match self.users.find_by_id(user_id).await? {
            Some(user) => user,
            None => return Err(DiaryError::InvalidToken),
        };

        validation::validate_password_reset(&form)?;

        let password_hash = PasswordService::hash(&form.password)?;
        self.users.update_password(user.id, &password_hash).await?;

        info!(user_id = user.id, "password reset");
        Ok(())
    }
}

#[async_trait]
impl<U, E, N> DormancyUseCase for AccountService<U, E, N>
where
    U: UserRepository,
    E: EntryRepository,
    N: Notifier,
{
    async fn check_dormancy(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut notified = 0;
        for user in self.users.list_all().await? {
            let latest = match self.entries.latest_for_user(user.id).await? {
                Some(entry) => entry,
                None => continue,
            };
            let idle_days = now.signed_duration_since(latest.date).num_days();
            if idle_days > DORMANCY_THRESHOLD_DAYS {
                self.dispatch(self.dormancy_email(&user)).await?;
                info!(user_id = user.id, idle_days, "dormancy notice sent");
                notified += 1;
            }
        }
        Ok(notified)
    }
}
