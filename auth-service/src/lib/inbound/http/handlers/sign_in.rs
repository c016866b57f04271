use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Credentials;
use crate::inbound::http::router::AppState;

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<SignInResponseData>), ApiError> {
    let Json(body) = payload?;

    let pair = state
        .account_service
        .sign_in(Credentials::new(body.email, body.password))
        .await
        .map_err(|e| {
            if let AccountError::InvalidCredentials(reason) = &e {
                tracing::debug!(reason = reason.as_str(), "Sign-in refused");
            }
            ApiError::from(e)
        })?;

    let jar = jar.add(refresh_token_cookie(
        pair.refresh_token.clone(),
        state.token_settings.lifetimes.refresh,
    ));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            SignInResponseData {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            },
        ),
    ))
}

fn refresh_token_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInResponseData {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_cookie() {
        let cookie = refresh_token_cookie("abc.def.ghi".to_string(), Duration::days(7));

        assert_eq!(cookie.name(), "refresh_token");
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
    }
}
