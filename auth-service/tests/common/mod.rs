use std::sync::Arc;
use std::time::Duration as StdDuration;

use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::SigningKey;
use auth::TokenLifetimes;
use auth_service::config::TokenSettings;
use auth_service::domain::account::service::AccountService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryAccountRepository;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const API: &str = "/api/v1/auth";

/// Test application that spawns a real server backed by the in-memory store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryAccountRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub lifetimes: TokenLifetimes,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_lifetimes(TokenLifetimes::new(
            Duration::minutes(5),
            Duration::days(7),
        ))
        .await
    }

    pub async fn spawn_with_lifetimes(lifetimes: TokenLifetimes) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());

        // Cheap hashing parameters keep the suite fast
        let authenticator = Authenticator::with_hasher(
            PasswordHasher::with_cost(8 * 1024, 1, 1).expect("Invalid hasher cost"),
            lifetimes,
        );

        let token_settings = TokenSettings {
            signing_key: SigningKey::new(TEST_SECRET),
            lifetimes,
        };

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            authenticator,
            token_settings.signing_key.clone(),
        ));

        let router = create_router(account_service, token_settings, StdDuration::from_secs(4));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            jwt_handler: JwtHandler::new(TEST_SECRET),
            lifetimes,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return the response
    pub async fn sign_up(&self, email: &str, password: &str) -> reqwest::Response {
        self.post(&format!("{}/sign-up", API))
            .json(&json!({
                "email": email,
                "password": password,
                "user_info": {"name": "alice"}
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign in and return the response
    pub async fn sign_in(&self, email: &str, password: &str) -> reqwest::Response {
        self.post(&format!("{}/sign-in", API))
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register, sign in and return (access_token, refresh_token)
    pub async fn signed_in(&self, email: &str, password: &str) -> (String, String) {
        self.sign_up(email, password).await;
        let body: Value = self
            .sign_in(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        (
            body["data"]["access_token"].as_str().unwrap().to_string(),
            body["data"]["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}
