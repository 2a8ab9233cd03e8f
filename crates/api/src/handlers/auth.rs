//! Handlers for the `/auth` resource (register, login, refresh).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_core::error::CoreError;
use taskboard_core::user::{PublicUser, RegisterUser, User};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, validate_token, JwtConfig, TokenType,
};
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`. `username` may also be an email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: PublicUser,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterUser>,
) -> AppResult<(StatusCode, Json<DataResponse<PublicUser>>)> {
    let user = state.tracker.register_user(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: user.to_public(),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username (or email) and password.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let user = state.tracker.login(&input.username, &input.password).await?;
    let response = issue_tokens(&user, &state.config.jwt)?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a fresh token pair.
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let claims = validate_token(&input.refresh_token, TokenType::Refresh, &state.config.jwt)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected refresh token");
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = state.tracker.session_user(claims.sub).await?;
    tracing::info!(user_id = user.id, "Token refreshed");

    let response = issue_tokens(&user, &state.config.jwt)?;
    Ok(Json(DataResponse { data: response }))
}

fn issue_tokens(user: &User, config: &JwtConfig) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.username, config)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh_token = generate_refresh_token(user.id, &user.username, config)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: config.access_expires_in(),
        user: user.to_public(),
    })
}
