//! Product category handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use courtside_common::{
    auth::AuthContext,
    db::models::ProductCategory,
    errors::{AppError, Result},
};

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new("^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern is valid"))
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProductCategory> for CategoryResponse {
    fn from(category: ProductCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            sort_order: category.sort_order,
            is_active: category.is_active,
            created_at: category.created_at.to_rfc3339(),
            updated_at: category.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub slug: String,

    pub description: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

fn validate_slug(slug: &str) -> Result<()> {
    if slug_re().is_match(slug) {
        Ok(())
    } else {
        Err(AppError::invalid_field(
            "slug",
            "must be lowercase letters, digits, and hyphens",
        ))
    }
}

/// List all active categories in display order
pub async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<Vec<CategoryResponse>>> {
    let categories = state.repo.list_categories().await?;

    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Get a specific category by ID
pub async fn get_category(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(category_id): Path<Uuid>,
) -> Result<Json<CategoryResponse>> {
    let category = state
        .repo
        .find_category_by_id(category_id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "Category",
            id: category_id.to_string(),
        })?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Create a new product category
pub async fn create_category(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>)> {
    request.validate()?;
    validate_slug(&request.slug)?;

    if let Some(existing) = state
        .repo
        .find_category_by_name_or_slug(&request.name, &request.slug)
        .await?
    {
        let (field, value) = if existing.name == request.name {
            ("name", request.name)
        } else {
            ("slug", request.slug)
        };
        return Err(AppError::DuplicateKey { field, value });
    }

    let category = state
        .repo
        .create_category(
            request.name,
            request.slug,
            request.description,
            request.sort_order,
        )
        .await?;

    tracing::info!(category_id = %category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Update an existing category
pub async fn update_category(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(category_id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>> {
    if let Some(ref slug) = request.slug {
        validate_slug(slug)?;
    }

    let category = state
        .repo
        .update_category(
            category_id,
            request.name,
            request.slug,
            request.description,
            request.sort_order,
            request.is_active,
        )
        .await?;

    tracing::info!(category_id = %category.id, "Category updated");

    Ok(Json(CategoryResponse::from(category)))
}

/// Soft delete a category
pub async fn delete_category(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repo.deactivate_category(category_id).await?;

    tracing::info!(category_id = %category_id, "Category deactivated");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_format() {
        assert!(validate_slug("strings").is_ok());
        assert!(validate_slug("over-grips").is_ok());
        assert!(validate_slug("bags2").is_ok());

        assert!(validate_slug("Strings").is_err());
        assert!(validate_slug("over grips").is_err());
        assert!(validate_slug("-strings").is_err());
        assert!(validate_slug("strings-").is_err());
        assert!(validate_slug("").is_err());
    }
}
