use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::errors::AccountError;
use crate::account::errors::ErrorCategory;

pub mod health;
pub mod me;
pub mod refresh;
pub mod sign_in;
pub mod sign_up;
pub mod verify;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    UnprocessableEntity(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

/// Storage and internal failures are logged here and replaced with a
/// generic message; everything else is shown to the caller as is.
impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err.category() {
            ErrorCategory::Validation => ApiError::UnprocessableEntity(err.to_string()),
            ErrorCategory::Conflict => ApiError::Conflict(err.to_string()),
            ErrorCategory::Auth => ApiError::Unauthorized(err.to_string()),
            ErrorCategory::Storage => {
                tracing::error!(error = %err, "Credential store failure");
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            ErrorCategory::Internal => {
                tracing::error!(error = %err, "Internal error");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use auth::JwtError;

    use super::*;
    use crate::account::errors::CredentialsFailure;
    use crate::account::errors::EmailError;

    #[test]
    fn test_account_error_status_mapping() {
        assert!(matches!(
            ApiError::from(AccountError::from(EmailError::InvalidFormat("x".into()))),
            ApiError::UnprocessableEntity(_)
        ));
        assert!(matches!(
            ApiError::from(AccountError::EmailTaken("a@b.com".into())),
            ApiError::Conflict(_)
        ));
        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials(
                CredentialsFailure::UnknownEmail
            )),
            ApiError::Unauthorized("Invalid credentials".to_string())
        );
        assert_eq!(
            ApiError::from(AccountError::from(JwtError::Expired)),
            ApiError::Unauthorized("Token is expired".to_string())
        );
        assert!(matches!(
            ApiError::from(AccountError::Unknown("boom".into())),
            ApiError::InternalServerError(_)
        ));
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = ApiError::from(AccountError::Storage(
            "connection refused to 10.0.0.5:5432".into(),
        ));

        match err {
            ApiError::ServiceUnavailable(message) => assert!(!message.contains("10.0.0.5")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::Conflict("taken".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::ServiceUnavailable("down".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
