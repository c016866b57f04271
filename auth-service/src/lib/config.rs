use std::env;
use std::fmt;
use std::time::Duration as StdDuration;

use auth::PasswordError;
use auth::PasswordHasher;
use auth::SigningKey;
use auth::TokenLifetimes;
use chrono::Duration;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres URL. When unset the service keeps accounts in memory.
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("refresh_token_ttl_seconds", &self.refresh_token_ttl_seconds)
            .finish()
    }
}

/// Argon2id cost. The defaults put one hash in the hundreds of
/// milliseconds on commodity hardware.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordConfig {
    /// # Errors
    /// * `InvalidCost` - Parameters are outside the Argon2 bounds
    pub fn hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::with_cost(self.memory_kib, self.iterations, self.parallelism)
    }
}

/// Immutable token configuration handed to the account service and the
/// HTTP layer at startup.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub signing_key: SigningKey,
    pub lifetimes: TokenLifetimes,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    ///
    /// # Errors
    /// * `ConfigError` - Unreadable source, missing `jwt.secret`, non-positive TTLs
    ///   or an out-of-range password cost
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::with_defaults(ConfigBuilder::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    fn with_defaults(
        builder: config::builder::ConfigBuilder<DefaultState>,
    ) -> Result<config::builder::ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.http_port", 2023)?
            .set_default("server.request_timeout_seconds", 4)?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.access_token_ttl_seconds", 300)?
            .set_default("jwt.refresh_token_ttl_seconds", 604_800)?
            .set_default("password.memory_kib", 64 * 1024)?
            .set_default("password.iterations", 3)?
            .set_default("password.parallelism", 1)
    }

    fn build(builder: config::builder::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }
        if self.jwt.access_token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_ttl_seconds must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(
                "jwt.refresh_token_ttl_seconds must be positive".to_string(),
            ));
        }
        self.password
            .hasher()
            .map_err(|e| ConfigError::Message(format!("password cost: {}", e)))?;
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "server.request_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn token_settings(&self) -> TokenSettings {
        TokenSettings {
            signing_key: SigningKey::new(self.jwt.secret.as_bytes()),
            lifetimes: TokenLifetimes::new(
                Duration::seconds(self.jwt.access_token_ttl_seconds),
                Duration::seconds(self.jwt.refresh_token_ttl_seconds),
            ),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_seconds)
    }
}
