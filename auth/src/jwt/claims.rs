use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::profile::Profile;

/// What a token may be used for.
///
/// Access and refresh tokens share one encoding; the kind is embedded so one
/// cannot be presented where the other is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    pub kind: TokenKind,

    #[serde(default)]
    pub profile: Profile,
}

impl TokenClaims {
    /// Claims expiring `ttl` after `now`, with the password hash removed
    /// from `profile`.
    pub fn new(profile: Profile, kind: TokenKind, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            kind,
            profile: profile.without_password_hash(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Expired once the current second is past `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
