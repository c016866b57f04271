use auth::Profile;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::errors::AccountError;
use crate::domain::account::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    let Json(body) = payload?;
    let command = body.try_into_command()?;
    let email = command.email.to_string();

    state
        .account_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|id| {
            tracing::info!(account_id = %id, "Account registered");
            ApiSuccess::new(
                StatusCode::CREATED,
                SignUpResponseData {
                    id: id.to_string(),
                    email,
                },
            )
        })
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignUpRequest {
    email: String,
    password: String,
    #[serde(default)]
    user_info: Option<Value>,
}

#[derive(Debug, Clone, Error)]
enum ParseSignUpRequestError {
    #[error("user_info must be a JSON object")]
    UserInfo,

    #[error(transparent)]
    Account(#[from] AccountError),
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseSignUpRequestError> {
        let profile = match self.user_info {
            Some(value) => Profile::from_json(value).ok_or(ParseSignUpRequestError::UserInfo)?,
            None => Profile::new(),
        };
        Ok(RegisterCommand::new(self.email, self.password, profile)?)
    }
}

impl From<ParseSignUpRequestError> for ApiError {
    fn from(err: ParseSignUpRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpResponseData {
    pub id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(value: Value) -> SignUpRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_user_info_becomes_profile() {
        let command = request(json!({
            "email": "A@b.com",
            "password": "secret1",
            "user_info": {"name": "alice", "password_hash": "x"}
        }))
        .try_into_command()
        .unwrap();

        assert_eq!(command.email.as_str(), "a@b.com");
        assert_eq!(command.profile.get("name"), Some(&json!("alice")));
        assert!(!command.profile.contains_key("password_hash"));
    }

    #[test]
    fn test_user_info_is_optional() {
        let command = request(json!({"email": "a@b.com", "password": "secret1"}))
            .try_into_command()
            .unwrap();
        assert!(command.profile.is_empty());
    }

    #[test]
    fn test_user_info_must_be_object() {
        let err = request(json!({
            "email": "a@b.com",
            "password": "secret1",
            "user_info": [1, 2]
        }))
        .try_into_command()
        .unwrap_err();

        assert!(matches!(err, ParseSignUpRequestError::UserInfo));
    }
}
