use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub dob: NaiveDate,
    pub email: String,
    pub kin_email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub join_date: DateTime<Utc>,
}

/// A user record ready for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub dob: NaiveDate,
    pub email: String,
    pub kin_email: String,
    pub password_hash: String,
    pub join_date: DateTime<Utc>,
}

/// Raw registration submission. Fields arrive as strings straight from the
/// form; the validation layer parses and checks them before anything is
/// hashed or stored.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub dob: String,
    pub email: String,
    pub kin_email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub username: String,
    pub kin_email: String,
}

#[derive(Debug, Clone)]
pub struct ResetRequestForm {
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct KinResetRequestForm {
    pub user_email: String,
    pub kin_email: String,
}

#[derive(Debug, Clone)]
pub struct ResetPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

/// Proof of an authenticated request, extracted from a verified session
/// token and passed explicitly into every operation that needs an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// What a successful login hands back to the boundary layer: the session
/// token and, when the caller supplied a `next` target, where to send them.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: AuthToken,
    pub redirect_to: Option<String>,
}
