use thiserror::Error;

use super::claims::TokenKind;

/// Error type for token issuance and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Structurally not a token: wrong segment count, bad base64, bad JSON,
    /// missing claims, unexpected algorithm.
    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Wrong token kind: expected {expected}, got {actual}")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },
}
