use thiserror::Error;

/// Error type for password hashing and verification.
///
/// A password that simply does not match is not an error; see
/// [`super::PasswordHasher::verify`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is invalid: {0}")]
    InvalidHash(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),

    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),
}
