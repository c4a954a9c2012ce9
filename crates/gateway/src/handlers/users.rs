//! User management handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use courtside_common::{
    auth::AuthContext,
    db::models::{User, UserRole},
    db::repository::UserPatch,
    errors::{AppError, Result},
    pagination::{PageParams, Paginated},
};

/// User representation returned by the API (never the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            phone_number: user.phone_number,
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// List users with pagination
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(params): Query<PageParams>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Paginated<UserResponse>>> {
    let params = params.clamped(state.config.pagination.max_page_size);

    let page = state.repo.list_users(query.is_active, params).await?;

    Ok(Json(page.map(UserResponse::from)))
}

/// Get a specific user by ID
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let user = state
        .repo
        .find_user_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "User",
            id: user_id.to_string(),
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// Update a user profile (admin only)
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    auth.require_admin()?;

    let user = state
        .repo
        .update_user(
            user_id,
            UserPatch {
                first_name: request.first_name,
                last_name: request.last_name,
                phone_number: request.phone_number,
                role: request.role,
                is_active: request.is_active,
            },
        )
        .await?;

    tracing::info!(user_id = %user.id, "User updated");

    Ok(Json(UserResponse::from(user)))
}

/// Deactivate a user (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode> {
    auth.require_admin()?;

    state.repo.deactivate_user(user_id).await?;

    tracing::info!(user_id = %user_id, "User deactivated");

    Ok(StatusCode::NO_CONTENT)
}
