use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::claims::TokenKind;
use super::errors::JwtError;
use crate::profile::Profile;

/// Signs and parses HS256 tokens carrying [`TokenClaims`].
///
/// The handler is built from the signing key for the duration of an
/// operation; callers own the key and pass it in every time.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// Create a handler keyed by `secret`.
    ///
    /// Expiry is checked with zero leeway.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `profile` that expires `ttl` from now.
    ///
    /// The password hash is removed from the profile before it is embedded.
    /// A negative `ttl` yields an already expired token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue(
        &self,
        profile: Profile,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.issue_at(profile, kind, ttl, Utc::now())
    }

    /// Same as [`JwtHandler::issue`] with an explicit issuance time.
    pub fn issue_at(
        &self,
        profile: Profile,
        kind: TokenKind,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = TokenClaims::new(profile, kind, ttl, now);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// The signature is checked before the expiry, so a forged expired token
    /// reports `InvalidSignature`. The password hash is stripped from the
    /// returned profile even if a token somehow carried one.
    ///
    /// # Errors
    /// * `Malformed` - Not a structurally valid token
    /// * `InvalidSignature` - Signature does not verify under this key
    /// * `Expired` - `exp` is in the past
    pub fn parse(&self, token: &str) -> Result<TokenClaims, JwtError> {
        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(classify)?;

        let mut claims = token_data.claims;
        claims.profile.strip_password_hash();

        Ok(claims)
    }

    /// [`JwtHandler::parse`], then require the token to be of `expected` kind.
    ///
    /// # Errors
    /// * `WrongKind` - Token is valid but was issued for another use
    pub fn parse_kind(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, JwtError> {
        let claims = self.parse(token)?;

        if claims.kind != expected {
            return Err(JwtError::WrongKind {
                expected,
                actual: claims.kind,
            });
        }

        Ok(claims)
    }
}

fn classify(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::Malformed(error.to_string()),
    }
}
