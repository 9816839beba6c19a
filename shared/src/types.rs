//! API request and response types
//!
//! Field names are serialized in camelCase to match the public JSON contract
//! (`firstName`, `lastName`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Account role
///
/// Customer accounts exist in the same user table but are excluded from this
/// portal's login; they authenticate through a different surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    /// Whether this role may log in through the portal
    pub fn may_use_portal(&self) -> bool {
        !matches!(self, Role::Customer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a role string that is not one of the known roles
#[derive(Error, Debug)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "customer" => Ok(Role::Customer),
            _ => Err(ParseRoleError(value)),
        }
    }
}

/// Outcome marker carried in every auth response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration response: the verification token is returned directly in
/// addition to being emailed, for non-interactive flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: ApiStatus,
    pub message: String,
    pub token: String,
}

/// Plain status + message response (email verification, errors)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: ApiStatus,
    pub message: String,
}

/// Login response with the session token and the sanitized user record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: ApiStatus,
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

/// User record as exposed over the API — never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}
