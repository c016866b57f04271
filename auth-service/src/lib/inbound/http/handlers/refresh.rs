use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::sign_in::REFRESH_TOKEN_COOKIE;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a new access token.
///
/// The token is read from the JSON body when present, otherwise from the
/// `refresh_token` cookie set at sign-in.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let refresh_token = RefreshRequest::parse(&body)?
        .token_or_cookie(&jar)
        .ok_or_else(|| ApiError::Unauthorized("Missing refresh token".to_string()))?;

    let access_token = state
        .account_service
        .refresh_token(state.token_settings.signing_key.as_bytes(), &refresh_token)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Token refresh failed");
            ApiError::from(e)
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshResponseData { access_token },
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

impl RefreshRequest {
    fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| {
            ApiError::BadRequest(format!("Failed to parse the request body as JSON: {}", e))
        })
    }

    fn token_or_cookie(self, jar: &CookieJar) -> Option<String> {
        self.refresh_token
            .filter(|token| !token.is_empty())
            .or_else(|| {
                jar.get(REFRESH_TOKEN_COOKIE)
                    .map(|cookie| cookie.value().to_string())
                    .filter(|token| !token.is_empty())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
}
