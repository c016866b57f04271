use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::SigningKey;
use auth::TokenClaims;
use auth::TokenPair;
use chrono::Utc;
use tokio::task;

use crate::account::errors::AccountError;
use crate::account::errors::CredentialsFailure;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::Credentials;
use crate::account::models::EmailAddress;
use crate::account::models::RegisterCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;

/// Domain service implementation of the authentication use cases.
///
/// Password hashing and verification run on the blocking pool.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Authenticator,
    signing_key: SigningKey,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token lifetimes
    /// * `signing_key` - Key used to sign tokens issued at sign-in
    pub fn new(repository: Arc<AR>, authenticator: Authenticator, signing_key: SigningKey) -> Self {
        Self {
            repository,
            authenticator,
            signing_key,
        }
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AccountId, AccountError> {
        if self.repository.exists(&command.email).await? {
            return Err(AccountError::EmailTaken(command.email.to_string()));
        }

        let authenticator = self.authenticator.clone();
        let password = command.password.into_inner();
        let password_hash = task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Password hashing task failed: {}", e)))??;

        let account = Account {
            id: AccountId::new(),
            email: command.email,
            password_hash,
            profile: command.profile,
            created_at: Utc::now(),
        };

        self.repository.create(account).await
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<TokenPair, AccountError> {
        let account = match EmailAddress::new(credentials.email) {
            Ok(email) => self.repository.find_by_email(&email).await?,
            Err(_) => None,
        };

        let authenticator = self.authenticator.clone();
        let password = credentials.password;

        // Unknown accounts still pay for one hash so timing matches a wrong password.
        let Some(account) = account else {
            task::spawn_blocking(move || authenticator.reject_without_hash(&password))
                .await
                .map_err(|e| {
                    AccountError::Unknown(format!("Password verification task failed: {}", e))
                })?;
            return Err(AccountError::InvalidCredentials(
                CredentialsFailure::UnknownEmail,
            ));
        };

        let signing_key = self.signing_key.clone();
        let profile = account.token_profile();

        let pair = task::spawn_blocking(move || {
            authenticator.authenticate(
                signing_key.as_bytes(),
                &password,
                &account.password_hash,
                profile,
            )
        })
        .await
        .map_err(|e| AccountError::Unknown(format!("Password verification task failed: {}", e)))??;

        Ok(pair)
    }

    async fn verify_token(
        &self,
        signing_key: &[u8],
        token: &str,
    ) -> Result<TokenClaims, AccountError> {
        Ok(self.authenticator.validate_token(signing_key, token)?)
    }

    async fn refresh_token(
        &self,
        signing_key: &[u8],
        refresh_token: &str,
    ) -> Result<String, AccountError> {
        Ok(self.authenticator.refresh(signing_key, refresh_token)?)
    }
}
