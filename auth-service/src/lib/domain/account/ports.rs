use async_trait::async_trait;
use auth::TokenClaims;
use auth::TokenPair;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;

/// Port for the authentication use cases.
///
/// All four operations are independent and stateless apart from the
/// credential store.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated email, password and profile
    ///
    /// # Returns
    /// Identifier of the created account
    ///
    /// # Errors
    /// * `EmailTaken` - Email is already registered
    /// * `Storage` - Credential store failed
    async fn register(&self, command: RegisterCommand) -> Result<AccountId, AccountError>;

    /// Check credentials and issue an access/refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishable to callers
    /// * `Storage` - Credential store failed
    async fn sign_in(&self, credentials: Credentials) -> Result<TokenPair, AccountError>;

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    /// * `Token` - Malformed, bad signature, expired or not an access token
    async fn verify_token(
        &self,
        signing_key: &[u8],
        token: &str,
    ) -> Result<TokenClaims, AccountError>;

    /// Exchange a refresh token for a new access token without touching the
    /// credential store.
    ///
    /// # Errors
    /// * `Token` - Malformed, bad signature, expired or not a refresh token
    async fn refresh_token(
        &self,
        signing_key: &[u8],
        refresh_token: &str,
    ) -> Result<String, AccountError>;
}

/// Credential store.
///
/// Implementations must be safe to share between concurrent requests
/// without external locking.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Whether an account is registered under `email`.
    ///
    /// # Errors
    /// * `Storage` - Store operation failed
    async fn exists(&self, email: &EmailAddress) -> Result<bool, AccountError>;

    /// Persist a new account.
    ///
    /// # Returns
    /// Identifier of the stored account
    ///
    /// # Errors
    /// * `EmailTaken` - Email is already registered (concurrent registration)
    /// * `Storage` - Store operation failed
    async fn create(&self, account: Account) -> Result<AccountId, AccountError>;

    /// Retrieve an account by email address.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;
}
