//! JWT token generation and validation
//!
//! Issues the two token kinds the service needs — short-lived email
//! verification tokens and session tokens — with pre-computed keys so no key
//! derivation happens per request.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use portal_auth_shared::Role;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Token verification failure
///
/// Token validity is solely signature + expiry; there is no server-side
/// revocation store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Claims of a verification token, bound to an email address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationClaims {
    /// Email the registrant must prove control of
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Always "verify"
    pub token_type: String,
}

/// Claims of a session token issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at time of issuance
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Always "session"
    pub token_type: String,
}

const VERIFY_TOKEN_TYPE: &str = "verify";
const SESSION_TOKEN_TYPE: &str = "session";

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// JWT service configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub verification_token_expiry_secs: i64,
    pub session_token_expiry_secs: i64,
}

/// JWT service for token operations
///
/// Uses pre-computed keys wrapped in Arc; create once at startup and store
/// in AppState, cloning is cheap.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    config: JwtConfig,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys
    pub fn new(
        secret: &str,
        verification_token_expiry_secs: i64,
        session_token_expiry_secs: i64,
    ) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            config: JwtConfig {
                verification_token_expiry_secs,
                session_token_expiry_secs,
            },
        }
    }

    /// Issue a verification token bound to an email address (ttl 1h by config)
    pub fn issue_verification_token(&self, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.verification_token_expiry_secs);

        let claims = VerificationClaims {
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: VERIFY_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign verification token: {}", e))
    }

    /// Issue a session token for an authenticated user (ttl 24h by config)
    pub fn issue_session_token(&self, user_id: Uuid, role: Role) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.session_token_expiry_secs);

        let claims = SessionClaims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign session token: {}", e))
    }

    /// Validate a verification token and return its claims
    pub fn verify_verification_token(&self, token: &str) -> Result<VerificationClaims, TokenError> {
        let claims: VerificationClaims = self.decode_claims(token)?;
        if claims.token_type != VERIFY_TOKEN_TYPE {
            return Err(TokenError::Malformed);
        }
        Ok(claims)
    }

    /// Validate a session token and return its claims
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let claims: SessionClaims = self.decode_claims(token)?;
        if claims.token_type != SESSION_TOKEN_TYPE {
            return Err(TokenError::Malformed);
        }
        Ok(claims)
    }

    fn decode_claims<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        let data = decode::<C>(token, self.keys.decoding(), &Validation::default())?;
        Ok(data.claims)
    }

    /// Session token lifetime in seconds
    #[inline]
    pub fn session_token_expiry_secs(&self) -> i64 {
        self.config.session_token_expiry_secs
    }
}
