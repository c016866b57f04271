use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;

/// Credential store kept in process memory, keyed by normalized email.
///
/// Used by tests and for running the service without a database. Contents
/// are lost on restart.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn exists(&self, email: &EmailAddress) -> Result<bool, AccountError> {
        Ok(self.accounts.read().await.contains_key(email.as_str()))
    }

    async fn create(&self, account: Account) -> Result<AccountId, AccountError> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(account.email.as_str()) {
            return Err(AccountError::EmailTaken(account.email.to_string()));
        }

        let id = account.id;
        accounts.insert(account.email.as_str().to_string(), account);

        Ok(id)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(email.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auth::Profile;
    use chrono::Utc;

    use super::*;

    fn account(email: &str) -> Account {
        Account {
            id: AccountId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            profile: Profile::new().with_field("name", "alice"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryAccountRepository::new();
        let account = account("a@b.com");

        let id = repository.create(account.clone()).await.unwrap();
        assert_eq!(id, account.id);

        let email = EmailAddress::new("A@B.COM".to_string()).unwrap();
        assert!(repository.exists(&email).await.unwrap());
        assert_eq!(repository.find_by_email(&email).await.unwrap(), Some(account));
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repository = InMemoryAccountRepository::new();
        let email = EmailAddress::new("nobody@b.com".to_string()).unwrap();

        assert!(!repository.exists(&email).await.unwrap());
        assert_eq!(repository.find_by_email(&email).await.unwrap(), None);
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repository = InMemoryAccountRepository::new();
        repository.create(account("a@b.com")).await.unwrap();

        let result = repository.create(account("a@b.com")).await;
        assert!(matches!(result, Err(AccountError::EmailTaken(_))));
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_store_one_account() {
        let repository = Arc::new(InMemoryAccountRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repository = Arc::clone(&repository);
                tokio::spawn(async move { repository.create(account("race@b.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repository.len().await, 1);
    }
}
