use auth::Profile;
use auth::TokenKind;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<ApiSuccess<VerifyResponseData>, ApiError> {
    let Json(body) = payload?;

    let claims = state
        .account_service
        .verify_token(state.token_settings.signing_key.as_bytes(), &body.token)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            ApiError::from(e)
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        VerifyResponseData {
            expires_at: claims.expires_at(),
            kind: claims.kind,
            profile: claims.profile,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyRequest {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyResponseData {
    pub expires_at: Option<DateTime<Utc>>,
    pub kind: TokenKind,
    pub profile: Profile,
}
