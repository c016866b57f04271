use auth::TokenClaims;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified access token claims of the caller
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub claims: TokenClaims,
}

/// Middleware that validates the bearer access token and adds its claims to
/// request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?.to_string();

    let claims = state
        .account_service
        .verify_token(state.token_settings.signing_key.as_bytes(), &token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Bearer token rejected");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(AuthenticatedAccount { claims });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
