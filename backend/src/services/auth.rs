//! Authentication workflow
//!
//! Orchestrates the register → verify → login state machine over the hasher,
//! token issuer, user store, and notification sender. Per user the states are
//! Unregistered → PendingVerification → Verified, with no backward
//! transitions: `verified` only ever moves false → true.

use crate::auth::{JwtService, PasswordService};
use crate::email::{templates::VerificationEmail, EmailService};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRepository};
use portal_auth_shared::{PublicUser, RegisterRequest};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;
use validator::ValidateEmail;

/// Successful login: the session token plus the sanitized user record
pub struct LoginOutcome {
    pub token: String,
    pub user: PublicUser,
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user and dispatch the verification email
    ///
    /// Returns the verification token: it is emailed *and* handed back to the
    /// caller so non-interactive flows can verify without a mailbox.
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        mailer: &EmailService,
        base_url: &str,
        req: &RegisterRequest,
    ) -> Result<String, ApiError> {
        // Validate email format
        if !req.email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }

        // Fast-path duplicate check; the UNIQUE constraint below is the
        // authoritative guard
        if UserRepository::email_exists(pool, &req.email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::EmailAlreadyRegistered);
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        // Verification token bound to the email, ttl 1h
        let token = jwt_service
            .issue_verification_token(&req.email)
            .map_err(ApiError::Internal)?;

        // Persist, unverified
        if let Err(err) = UserRepository::create(
            pool,
            NewUser {
                first_name: &req.first_name,
                last_name: &req.last_name,
                email: &req.email,
                password_hash: &password_hash,
                role: req.role,
            },
        )
        .await
        {
            if is_unique_violation(&err) {
                return Err(ApiError::EmailAlreadyRegistered);
            }
            return Err(ApiError::Internal(err));
        }

        // Best-effort dispatch: a mail failure must not mask a completed
        // registration, so it is logged and the request still succeeds
        let email = VerificationEmail::new(base_url, &token);
        if let Err(err) = mailer
            .send_email(
                &req.email,
                email.subject(),
                &email.html_body(),
                &email.text_body(),
            )
            .await
        {
            error!(to = %req.email, "Failed to send verification email: {:?}", err);
        }

        Ok(token)
    }

    /// Confirm control of an email address via the verification token
    ///
    /// Idempotent: re-verifying an already-verified user succeeds.
    pub async fn verify_email(
        pool: &PgPool,
        jwt_service: &JwtService,
        token: &str,
    ) -> Result<(), ApiError> {
        let claims = jwt_service.verify_verification_token(token)?;

        // Same response for unknown users as for bad tokens, so this endpoint
        // does not reveal whether an email is registered
        let mut user = UserRepository::find_by_email(pool, &claims.email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::InvalidVerificationToken)?;

        user.verified = true;
        UserRepository::save(pool, &user)
            .await
            .map_err(ApiError::Internal)?;

        Ok(())
    }

    /// Login with email and password, issuing a session token
    ///
    /// The check order — not found, role gate, verification gate, password —
    /// discloses the least information first and must not be reordered.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, ApiError> {
        let user = UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::UserNotFound)?;

        // This portal is reserved for staff/admin accounts
        if !user.role.may_use_portal() {
            return Err(ApiError::RoleNotAllowed);
        }

        if !user.verified {
            return Err(ApiError::EmailNotVerified);
        }

        // Verify password on blocking thread pool (CPU-intensive)
        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::InvalidCredentials);
        }

        let token = jwt_service
            .issue_session_token(user.id, user.role)
            .map_err(ApiError::Internal)?;

        Ok(LoginOutcome {
            token,
            user: user.into(),
        })
    }

    /// Look up the sanitized record for an authenticated user
    pub async fn profile(pool: &PgPool, user_id: Uuid) -> Result<PublicUser, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        Ok(user.into())
    }
}

/// Detect a `users.email` UNIQUE constraint violation behind anyhow
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    // The workflow is exercised end to end against a real database in
    // tests/auth_integration_test.rs (ignored without one).
}
