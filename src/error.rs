use thiserror::Error;

/// What went wrong with a single submitted field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    #[error("This field is required")]
    MissingField,
    #[error("Invalid format")]
    InvalidFormat,
    #[error("Must be between {min} and {max} characters")]
    InvalidLength { min: usize, max: usize },
    #[error("Passwords do not match")]
    ConfirmationMismatch,
    #[error("You are not your own kin!")]
    SelfKin,
    #[error("This username is already taken!")]
    DuplicateUsername,
    #[error("This email is already registered!")]
    DuplicateEmail,
    #[error("There is no account with this email")]
    UnknownAccount,
    #[error("No account lists this address as mail of kin")]
    UnknownKin,
}

/// A validation failure attached to the field that caused it, so the
/// boundary can redisplay it next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

#[derive(Debug, Error)]
pub enum DiaryError {
    /// One or more fields failed validation. Nothing was applied.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    /// Deliberately generic: does not reveal whether the account exists
    /// or the password was wrong.
    #[error("Login unsuccessful. Please check email and password")]
    AuthenticationFailed,
    #[error("Token is invalid or has expired")]
    InvalidToken,
    #[error("Please log out and try again")]
    AlreadyAuthenticated,
    #[error("failed to send notification: {0}")]
    Notification(String),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

pub type Result<T, E = DiaryError> = std::result::Result<T, E>;
