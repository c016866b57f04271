use std::fmt;
use std::str::FromStr;

use auth::Profile;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;

/// Registered account.
///
/// Immutable once created. `password_hash` never leaves the service: it is
/// not part of [`Account::token_profile`] and no response type carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Profile embedded in issued tokens: the stored profile plus the
    /// account id and email, without the password hash.
    pub fn token_profile(&self) -> Profile {
        let mut profile = self.profile.clone();
        profile.insert("id", self.id.to_string());
        profile.insert("email", self.email.as_str());
        profile.without_password_hash()
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed and lowercased, then validated with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();

        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for registration.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Command to register a new account with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub profile: Profile,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// The email is checked before the password. A `password_hash` key in
    /// the supplied profile is dropped.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is not a plausible address
    /// * `WeakPassword` - Password shorter than 6 characters
    pub fn new(email: String, password: String, profile: Profile) -> Result<Self, AccountError> {
        let email = EmailAddress::new(email)?;
        let password = Password::new(password)?;

        Ok(Self {
            email,
            password,
            profile: profile.without_password_hash(),
        })
    }
}

/// Email and password presented at sign-in. Not validated; a malformed
/// email is simply an unknown one.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use auth::PASSWORD_HASH_KEY;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_garbage() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new("".to_string()).is_err());
        assert!(EmailAddress::new("a@".to_string()).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("secret1".to_string()).is_ok());
        assert!(Password::new("123456".to_string()).is_ok());
        assert_eq!(
            Password::new("12345".to_string()),
            Err(PasswordPolicyError::TooShort { min: 6, actual: 5 })
        );
        // Counted in characters, not bytes.
        assert!(Password::new("ääääa".to_string()).is_err());
    }

    #[test]
    fn test_secrets_are_redacted() {
        let password = Password::new("secret1".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("secret1"));

        let credentials = Credentials::new("a@b.com", "secret1");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("secret1"));
    }

    #[test]
    fn test_register_command_validation_order() {
        let err = RegisterCommand::new("bad".into(), "123".into(), Profile::new()).unwrap_err();
        assert!(matches!(err, AccountError::InvalidEmail(_)));

        let err = RegisterCommand::new("a@b.com".into(), "123".into(), Profile::new()).unwrap_err();
        assert!(matches!(err, AccountError::WeakPassword(_)));
    }

    #[test]
    fn test_register_command_drops_password_hash_from_profile() {
        let profile = Profile::new()
            .with_field("name", "alice")
            .with_field(PASSWORD_HASH_KEY, "sneaky");
        let command = RegisterCommand::new("a@b.com".into(), "secret1".into(), profile).unwrap();

        assert!(!command.profile.contains_key(PASSWORD_HASH_KEY));
        assert_eq!(command.profile.get("name"), Some(&json!("alice")));
    }

    #[test]
    fn test_token_profile() {
        let account = Account {
            id: AccountId::new(),
            email: EmailAddress::new("a@b.com".to_string()).unwrap(),
            password_hash: "$argon2id$hash".to_string(),
            profile: Profile::new().with_field("name", "alice"),
            created_at: Utc::now(),
        };

        let profile = account.token_profile();
        assert_eq!(profile.get("email"), Some(&json!("a@b.com")));
        assert_eq!(profile.get("id"), Some(&json!(account.id.to_string())));
        assert_eq!(profile.get("name"), Some(&json!("alice")));
        assert!(!profile.contains_key(PASSWORD_HASH_KEY));
    }
}
