use chrono::Duration;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;
use crate::jwt::TokenKind;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::profile::Profile;

/// How long issued tokens stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    pub fn new(access: Duration, refresh: Duration) -> Self {
        Self { access, refresh }
    }
}

/// 5 minute access tokens, 7 day refresh tokens.
impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(5),
            refresh: Duration::days(7),
        }
    }
}

/// Access and refresh token issued together at sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

/// Authentication coordinator combining password verification and token
/// issuance.
///
/// Holds no key material; every token operation takes the signing key.
#[derive(Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    lifetimes: TokenLifetimes,
}

impl Authenticator {
    pub fn new(lifetimes: TokenLifetimes) -> Self {
        Self::with_hasher(PasswordHasher::new(), lifetimes)
    }

    pub fn with_hasher(password_hasher: PasswordHasher, lifetimes: TokenLifetimes) -> Self {
        Self {
            password_hasher,
            lifetimes,
        }
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password and issue an access/refresh pair for `profile`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        signing_key: &[u8],
        password: &str,
        stored_hash: &str,
        profile: Profile,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_pair(signing_key, profile)?)
    }

    /// Refuse a sign-in for which no stored hash exists.
    ///
    /// Runs one hash of `password` at the configured cost first, so the
    /// refusal takes as long as a password mismatch in
    /// [`Authenticator::authenticate`].
    pub fn reject_without_hash(&self, password: &str) -> AuthenticationError {
        let _ = self.password_hasher.hash(password);
        AuthenticationError::InvalidCredentials
    }

    /// Issue an access/refresh pair embedding the same profile.
    pub fn issue_pair(&self, signing_key: &[u8], profile: Profile) -> Result<TokenPair, JwtError> {
        let handler = JwtHandler::new(signing_key);

        let access_token =
            handler.issue(profile.clone(), TokenKind::Access, self.lifetimes.access)?;
        let refresh_token = handler.issue(profile, TokenKind::Refresh, self.lifetimes.refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate an access token and return its claims.
    pub fn validate_token(
        &self,
        signing_key: &[u8],
        token: &str,
    ) -> Result<TokenClaims, JwtError> {
        JwtHandler::new(signing_key).parse_kind(token, TokenKind::Access)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The new token embeds the profile recovered from the refresh token;
    /// nothing is looked up, so profile data may be as old as the refresh
    /// token itself.
    pub fn refresh(&self, signing_key: &[u8], refresh_token: &str) -> Result<String, JwtError> {
        let handler = JwtHandler::new(signing_key);
        let claims = handler.parse_kind(refresh_token, TokenKind::Refresh)?;

        handler.issue(claims.profile, TokenKind::Access, self.lifetimes.access)
    }
}
