use auth::Profile;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedAccount;

/// Profile of the caller, taken from the verified access token.
pub async fn me(
    Extension(account): Extension<AuthenticatedAccount>,
) -> ApiSuccess<MeResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            profile: account.claims.profile,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeResponseData {
    pub profile: Profile,
}
