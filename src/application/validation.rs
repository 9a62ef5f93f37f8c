//! Per-field validation rules, applied to submitted values before any
//! mutation. A submission with any failing field is rejected in full and
//! every failing field is reported, so callers can redisplay the lot.

use chrono::NaiveDate;

use crate::domain::entities::entry::EntryForm;
use crate::domain::entities::user::{
    KinResetRequestForm, ProfileForm, RegistrationForm, ResetPasswordForm, User,
};
use crate::domain::repositories::UserRepository;
use crate::error::{DiaryError, FieldError, FieldErrorKind, Result};

pub const USERNAME_MIN: usize = 4;
pub const USERNAME_MAX: usize = 25;

/// Date-of-birth wire format, as submitted by the form.
pub const DOB_FORMAT: &str = "%d/%m/%Y";

fn require(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, FieldErrorKind::MissingField));
        return false;
    }
    true
}

fn looks_like_email(value: &str) -> bool {
    // Same bar the login form sets: an @ with a dot somewhere after it.
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

fn check_email(field: &'static str, value: &str, errors: &mut Vec<FieldError>) -> bool {
    if !require(field, value, errors) {
        return false;
    }
    if !looks_like_email(value) {
        errors.push(FieldError::new(field, FieldErrorKind::InvalidFormat));
        return false;
    }
    true
}

fn check_username(value: &str, errors: &mut Vec<FieldError>) -> bool {
    if !require("username", value, errors) {
        return false;
    }
    let len = value.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        errors.push(FieldError::new(
            "username",
            FieldErrorKind::InvalidLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            },
        ));
        return false;
    }
    true
}

fn check_confirmation(password: &str, confirm: &str, errors: &mut Vec<FieldError>) {
    let password_ok = require("password", password, errors);
    let confirm_ok = require("confirm_password", confirm, errors);
    if password_ok && confirm_ok && password != confirm {
        errors.push(FieldError::new(
            "confirm_password",
            FieldErrorKind::ConfirmationMismatch,
        ));
    }
}

fn finish<T>(errors: Vec<FieldError>, ok: Option<T>) -> Result<T> {
    match (errors.is_empty(), ok) {
        (true, Some(value)) => Ok(value),
        (_, _) => Err(DiaryError::Validation(errors)),
    }
}

/// Full registration rule set, including the store-backed uniqueness
/// checks. Returns the parsed date of birth on success.
pub async fn validate_registration<R: UserRepository>(
    users: &R,
    form: &RegistrationForm,
) -> Result<NaiveDate> {
    let mut errors = Vec::new();

    require("firstname", &form.firstname, &mut errors);
    require("lastname", &form.lastname, &mut errors);

    let mut dob = None;
    if require("dob", &form.dob, &mut errors) {
        match NaiveDate::parse_from_str(&form.dob, DOB_FORMAT) {
            Ok(parsed) => dob = Some(parsed),
            Err(_) => errors.push(FieldError::new("dob", FieldErrorKind::InvalidFormat)),
        }
    }

    let email_ok = check_email("email", &form.email, &mut errors);
    let kin_ok = check_email("kin_email", &form.kin_email, &mut errors);
    if email_ok && kin_ok && form.kin_email == form.email {
        errors.push(FieldError::new("kin_email", FieldErrorKind::SelfKin));
    }

    check_confirmation(&form.password, &form.confirm_password, &mut errors);

    if check_username(&form.username, &mut errors)
        && users.find_by_username(&form.username).await?.is_some()
    {
        errors.push(FieldError::new(
            "username",
            FieldErrorKind::DuplicateUsername,
        ));
    }
    if email_ok && users.find_by_email(&form.email).await?.is_some() {
        errors.push(FieldError::new("email", FieldErrorKind::DuplicateEmail));
    }

    finish(errors, dob)
}

/// Profile update rules. Uniqueness is skipped when the submitted username
/// equals the stored one, so a no-op update never conflicts with itself;
/// the kin email is compared against the *stored* account email.
pub async fn validate_profile_update<R: UserRepository>(
    users: &R,
    current: &User,
    form: &ProfileForm,
) -> Result<()> {
    let mut errors = Vec::new();

    if check_username(&form.username, &mut errors)
        && form.username != current.username
        && users.find_by_username(&form.username).await?.is_some()
    {
        errors.push(FieldError::new(
            "username",
            FieldErrorKind::DuplicateUsername,
        ));
    }

    if check_email("kin_email", &form.kin_email, &mut errors) && form.kin_email == current.email {
        errors.push(FieldError::new("kin_email", FieldErrorKind::SelfKin));
    }

    finish(errors, Some(()))
}

/// The submitted email must resolve to exactly one existing account.
pub async fn validate_reset_request<R: UserRepository>(users: &R, email: &str) -> Result<User> {
    let mut errors = Vec::new();

    let mut account = None;
    if check_email("email", email, &mut errors) {
        match users.find_by_email(email).await? {
            Some(user) => account = Some(user),
            None => errors.push(FieldError::new("email", FieldErrorKind::UnknownAccount)),
        }
    }
    finish(errors, account)
}

/// Kin-initiated reset: both fields are checked independently. The kin
/// email must appear as some account's stored kin_email, and the user
/// email must resolve to an account on its own; the two lookups are not
/// cross-checked against each other. Returns the account matched by the
/// user email.
pub async fn validate_kin_reset_request<R: UserRepository>(
    users: &R,
    form: &KinResetRequestForm,
) -> Result<User> {
    let mut errors = Vec::new();

    if check_email("kin_email", &form.kin_email, &mut errors)
        && users.find_by_kin_email(&form.kin_email).await?.is_none()
    {
        errors.push(FieldError::new("kin_email", FieldErrorKind::UnknownKin));
    }

    let mut account = None;
    if check_email("user_email", &form.user_email, &mut errors) {
        match users.find_by_email(&form.user_email).await? {
            Some(user) => account = Some(user),
            None => errors.push(FieldError::new(
                "user_email",
                FieldErrorKind::UnknownAccount,
            )),
        }
    }

    finish(errors, account)
}

pub fn validate_password_reset(form: &ResetPasswordForm) -> Result<()> {
    let mut errors = Vec::new();
    check_confirmation(&form.password, &form.confirm_password, &mut errors);
    finish(errors, Some(()))
}

pub fn validate_entry(form: &EntryForm) -> Result<()> {
    let mut errors = Vec::new();
    require("content", &form.content, &mut errors);
    finish(errors, Some(()))
}

/// An empty or whitespace-only title counts as no title at all.
pub fn normalize_title(title: Option<&str>) -> Option<String> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
