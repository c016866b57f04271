use std::sync::Arc;

use auth::Authenticator;
use auth_service::config::Config;
use auth_service::domain::account::ports::AccountServicePort;
use auth_service::domain::account::service::AccountService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryAccountRepository;
use auth_service::outbound::repositories::PostgresAccountRepository;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_address = %config.server.address(),
        request_timeout_seconds = config.server.request_timeout_seconds,
        database_configured = config.database.url.is_some(),
        access_token_ttl_seconds = config.jwt.access_token_ttl_seconds,
        refresh_token_ttl_seconds = config.jwt.refresh_token_ttl_seconds,
        password_memory_kib = config.password.memory_kib,
        password_iterations = config.password.iterations,
        "Configuration loaded"
    );

    let token_settings = config.token_settings();
    let authenticator =
        Authenticator::with_hasher(config.password.hasher()?, token_settings.lifetimes);

    let account_service: Arc<dyn AccountServicePort> = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AccountService::new(
                Arc::new(PostgresAccountRepository::new(pg_pool)),
                authenticator,
                token_settings.signing_key.clone(),
            ))
        }
        None => {
            tracing::warn!(
                store = "memory",
                "database.url is not set, accounts are lost on restart"
            );
            Arc::new(AccountService::new(
                Arc::new(InMemoryAccountRepository::new()),
                authenticator,
                token_settings.signing_key.clone(),
            ))
        }
    };

    let http_address = config.server.address();
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        account_service,
        token_settings,
        config.server.request_timeout(),
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
