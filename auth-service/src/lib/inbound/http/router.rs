use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::handlers::verify::verify;
use super::middleware::authenticate as auth_middleware;
use crate::config::TokenSettings;
use crate::domain::account::ports::AccountServicePort;

pub const API_BASE_PATH: &str = "/api/v1/auth";
const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub token_settings: TokenSettings,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    token_settings: TokenSettings,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        account_service,
        token_settings,
    };

    let public_routes = Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/verify", post(verify))
        .route("/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        .nest(
            API_BASE_PATH,
            Router::new().merge(public_routes).merge(protected_routes),
        )
        .route("/health", get(health))
        .with_state(state);

    with_http_layers(router, request_timeout)
}

/// Wrap `router` in the shared HTTP stack. Outermost first: CORS, request id
/// assignment and echo, tracing, timeout, panic recovery.
fn with_http_layers(router: Router, request_timeout: Duration) -> Router {
    // Headers are left out of the span: they carry bearer tokens and cookies.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    router
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    async fn panics() -> &'static str {
        panic!("handler panicked")
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        address
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_500() {
        let router = Router::new()
            .route("/panic", get(panics))
            .route("/health", get(health));
        let address = serve(with_http_layers(router, Duration::from_secs(4))).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}/panic", address))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(REQUEST_ID_HEADER).is_some());

        // The server keeps serving after the panic
        let response = client
            .get(format!("{}/health", address))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
