//! Credential primitives for the authentication service
//!
//! - Password hashing (Argon2id, PHC strings)
//! - Signed token issuance and parsing (HS256) with expiry and an opaque profile
//! - Authentication coordination (password check, access/refresh pairs)
//!
//! No I/O and no logging: every function works on its arguments only, and the
//! signing key is passed in by the caller on every token operation.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{JwtHandler, Profile, TokenKind};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let profile = Profile::new().with_field("email", "a@b.com");
//! let token = handler.issue(profile, TokenKind::Access, Duration::minutes(5)).unwrap();
//! let claims = handler.parse(&token).unwrap();
//! assert_eq!(claims.profile.get("email").unwrap(), "a@b.com");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Profile, TokenLifetimes};
//!
//! let key = b"secret_key_at_least_32_bytes_long!";
//! let auth = Authenticator::new(TokenLifetimes::default());
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Sign in: verify and issue tokens
//! let profile = Profile::new().with_field("email", "alice@example.com");
//! let pair = auth.authenticate(key, "password123", &hash, profile).unwrap();
//!
//! // Verify and refresh
//! let claims = auth.validate_token(key, &pair.access_token).unwrap();
//! let fresh_access = auth.refresh(key, &pair.refresh_token).unwrap();
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod profile;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenLifetimes;
pub use authenticator::TokenPair;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SigningKey;
pub use jwt::TokenClaims;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use profile::Profile;
pub use profile::PASSWORD_HASH_KEY;
