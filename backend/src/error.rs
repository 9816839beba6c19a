//! Application error handling
//!
//! Every workflow failure is mapped here to the HTTP contract: client-facing
//! failures (validation, credentials, role gating, tokens) are all 400 with a
//! `{status, message}` body — deliberately the same status code so the case
//! is distinguishable only by message. Internal failures are 500 with a
//! generic message; detail goes to the logs, never to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portal_auth_shared::{ApiStatus, MessageResponse};
use thiserror::Error;
use tracing::error;

use crate::auth::TokenError;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already registered.")]
    EmailAlreadyRegistered,

    #[error("User not found")]
    UserNotFound,

    #[error("You are not allowed to login from here")]
    RoleNotAllowed,

    #[error("Verify your email first")]
    EmailNotVerified,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired verification token.")]
    InvalidVerificationToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<TokenError> for ApiError {
    fn from(_: TokenError) -> Self {
        ApiError::InvalidVerificationToken
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::EmailAlreadyRegistered
            | ApiError::UserNotFound
            | ApiError::RoleNotAllowed
            | ApiError::EmailNotVerified
            | ApiError::InvalidCredentials
            | ApiError::InvalidVerificationToken => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                )
            }
        };

        let body = Json(MessageResponse {
            status: ApiStatus::Error,
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_are_bad_request() {
        for error in [
            ApiError::EmailAlreadyRegistered,
            ApiError::UserNotFound,
            ApiError::RoleNotAllowed,
            ApiError::EmailNotVerified,
            ApiError::InvalidCredentials,
            ApiError::InvalidVerificationToken,
            ApiError::Validation("Invalid email format".to_string()),
        ] {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_unauthorized_error_status() {
        let error = ApiError::Unauthorized("Invalid token".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_is_generic_500() {
        let error = ApiError::Internal(anyhow::anyhow!("secret detail"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_errors_flow_through_internal() {
        // Repository failures arrive wrapped in anyhow and must render as the
        // same generic 500 as any other internal error
        let error = ApiError::Internal(anyhow::Error::new(sqlx::Error::PoolTimedOut));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_token_error_maps_to_invalid_verification_token() {
        let error: ApiError = TokenError::Expired.into();
        assert!(matches!(error, ApiError::InvalidVerificationToken));
    }
}
