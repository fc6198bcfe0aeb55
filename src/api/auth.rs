use anyhow::Context;
use axum::extract::State;
use axum::{Extension, Json};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::Claims;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserDto};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = req.email.trim().to_string();
    let name = req.name.trim().to_string();
    if email.is_empty() || name.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email, name and password are required".to_string(),
        ));
    }
    if state.store.find_user_by_email(&email).is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("Password hashing task failed")??;

    let user = state.store.create_user(&email, &name, password_hash)?;
    tracing::info!("Registered user {}", user.id);
    Ok(Json(auth_response(&state, &user)?))
}

/// POST /api/auth/login - Verifies the stored password hash; there is no
/// other way in.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Some(user) = state.store.find_user_by_email(&req.email) else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .context("Password verification task failed")?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(Json(auth_response(&state, &user)?))
}

/// GET /api/auth/me - Claims of the presented token
pub async fn me(Extension(claims): Extension<Claims>) -> Json<Claims> {
    Json(claims)
}

fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let token = state.tokens.issue(&user.email, &user.name)?;
    Ok(AuthResponse {
        token,
        user: UserDto::from(user),
    })
}
