//! Authentication routes
//!
//! Registration with email verification, verification-link handling, and
//! credential login. Password work runs on the blocking thread pool; JWT keys
//! come pre-computed from AppState.

use crate::auth::SessionUser;
use crate::error::ApiResult;
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use portal_auth_shared::{
    ApiStatus, LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest,
    RegisterResponse,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify/:token", get(verify_email))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// Register a new user
///
/// POST /auth/register
///
/// Responds 201 with the verification token; the same token is also emailed
/// as a verification link.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let token = AuthService::register(
        &state.db,
        state.jwt(),
        state.mailer(),
        &state.config().app.base_url,
        &req,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: ApiStatus::Success,
            message: "User registered successfully. Please verify your email.".to_string(),
            token,
        }),
    ))
}

/// Verify an email address from the emailed link
///
/// GET /auth/verify/:token
async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    AuthService::verify_email(&state.db, state.jwt(), &token).await?;

    Ok(Json(MessageResponse {
        status: ApiStatus::Success,
        message: "Email verified successfully!".to_string(),
    }))
}

/// Login with email and password
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = AuthService::login(&state.db, state.jwt(), &req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        status: ApiStatus::Success,
        message: "Login successfully".to_string(),
        token: outcome.token,
        user: outcome.user,
    }))
}

/// Get the authenticated user's record
///
/// GET /auth/me — requires a valid Bearer session token.
async fn me(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Json<PublicUser>> {
    let user = AuthService::profile(&state.db, session.user_id).await?;
    Ok(Json(user))
}
