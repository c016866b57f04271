use async_trait::async_trait;
use auth::Profile;
use chrono::DateTime;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;

const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_key";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    profile: Json<Profile>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)
                .map_err(|e| AccountError::Storage(format!("Stored email is invalid: {}", e)))?,
            password_hash: row.password_hash,
            profile: row.profile.0,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn exists(&self, email: &EmailAddress) -> Result<bool, AccountError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)
            "#,
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AccountError::Storage(e.to_string()))
    }

    async fn create(&self, account: Account) -> Result<AccountId, AccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, profile, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(Json(&account.profile))
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                {
                    return AccountError::EmailTaken(account.email.to_string());
                }
            }
            AccountError::Storage(e.to_string())
        })?;

        Ok(account.id)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, profile, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::Storage(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }
}
