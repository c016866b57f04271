use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for registration password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Why a sign-in was refused.
///
/// Kept for diagnostics only. Both variants render as the same message so
/// callers cannot tell a registered email from an unregistered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsFailure {
    UnknownEmail,
    PasswordMismatch,
}

impl CredentialsFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialsFailure::UnknownEmail => "unknown_email",
            CredentialsFailure::PasswordMismatch => "password_mismatch",
        }
    }
}

/// Coarse classification of [`AccountError`] for callers deciding how to
/// present or retry a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad client input.
    Validation,
    /// Email already registered.
    Conflict,
    /// Wrong credentials, bad token.
    Auth,
    /// Credential store failure; retryable by the caller.
    Storage,
    Internal,
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Input validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Weak password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    // Domain-level errors
    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials(CredentialsFailure),

    #[error("{0}")]
    Token(#[from] auth::JwtError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AccountError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AccountError::InvalidEmail(_) | AccountError::WeakPassword(_) => {
                ErrorCategory::Validation
            }
            AccountError::EmailTaken(_) => ErrorCategory::Conflict,
            AccountError::InvalidCredentials(_) => ErrorCategory::Auth,
            AccountError::Token(auth::JwtError::EncodingFailed(_)) => ErrorCategory::Internal,
            AccountError::Token(_) => ErrorCategory::Auth,
            AccountError::Storage(_) => ErrorCategory::Storage,
            AccountError::Password(_) | AccountError::Unknown(_) => ErrorCategory::Internal,
        }
    }
}

impl From<auth::AuthenticationError> for AccountError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => {
                AccountError::InvalidCredentials(CredentialsFailure::PasswordMismatch)
            }
            auth::AuthenticationError::PasswordError(e) => AccountError::Password(e),
            auth::AuthenticationError::JwtError(e) => AccountError::Token(e),
        }
    }
}
