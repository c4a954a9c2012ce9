//! Authentication handlers: register, login, token refresh

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::handlers::users::UserResponse;
use crate::AppState;
use courtside_common::{
    auth::{hash_password, verify_password, AuthContext},
    db::models::UserRole,
    errors::{AppError, Result},
};

/// Request to register a new staff account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 8))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[serde(default)]
    pub role: Option<UserRole>,

    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    request.validate()?;

    if state
        .repo
        .find_user_by_username(&request.username)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateKey {
            field: "username",
            value: request.username,
        });
    }

    if state
        .repo
        .find_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateKey {
            field: "email",
            value: request.email,
        });
    }

    let hashed_password = hash_password(&request.password)?;

    let user = state
        .repo
        .create_user(
            request.email,
            request.username,
            hashed_password,
            request.first_name,
            request.last_name,
            request.role.unwrap_or(UserRole::Staff),
            request.phone_number,
        )
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login with username and password to receive JWT tokens
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let user = state
        .repo
        .find_user_by_username(&credentials.username)
        .await?;

    let Some(user) = user else {
        return Err(AppError::Unauthorized {
            message: "Incorrect username or password".to_string(),
        });
    };

    if !verify_password(&credentials.password, &user.hashed_password) {
        return Err(AppError::Unauthorized {
            message: "Incorrect username or password".to_string(),
        });
    }

    if !user.is_active {
        return Err(AppError::Unauthorized {
            message: "User account is deactivated".to_string(),
        });
    }

    let role = user.user_role();
    let access_token = state.jwt.generate_access_token(user.id, role)?;
    let refresh_token = state.jwt.generate_refresh_token(user.id, role)?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer",
    }))
}

/// Refresh the token pair using a valid refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>> {
    let claims = state.jwt.validate_token(&request.refresh_token)?;

    if !claims.is_refresh() {
        return Err(AppError::Unauthorized {
            message: "Invalid token type".to_string(),
        });
    }

    let user_id = claims.user_id()?;

    // Verify user still exists and is active
    let user = state
        .repo
        .find_user_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Unauthorized {
            message: "User not found or deactivated".to_string(),
        })?;

    let role = user.user_role();
    let access_token = state.jwt.generate_access_token(user.id, role)?;
    let refresh_token = state.jwt.generate_refresh_token(user.id, role)?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        token_type: "bearer",
    }))
}

/// Get information about the currently authenticated user
pub async fn me(State(state): State<AppState>, auth: AuthContext) -> Result<Json<UserResponse>> {
    let user = state
        .repo
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "User",
            id: auth.user_id.to_string(),
        })?;

    Ok(Json(UserResponse::from(user)))
}
