//! Authentication middleware
//!
//! Axum extractor that validates the Bearer session token and exposes the
//! caller's identity to protected handlers. Uses the pre-computed JWT keys
//! from AppState.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use portal_auth_shared::Role;
use uuid::Uuid;

/// Authenticated caller extracted from a session token
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub role: Role,
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for SessionUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        // Check Bearer prefix
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        let claims = app_state
            .jwt()
            .verify_session_token(token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(SessionUser {
            user_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_debug() {
        let user = SessionUser {
            user_id: Uuid::new_v4(),
            role: Role::Staff,
        };
        let debug_str = format!("{:?}", user);
        assert!(debug_str.contains("SessionUser"));
    }
}
