//! Client racket handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use courtside_common::{
    auth::AuthContext,
    db::models::ClientRacket,
    db::repository::{NewRacket, RacketFilter, RacketPatch},
    errors::{AppError, Result},
    pagination::{PageParams, Paginated},
};

#[derive(Debug, Serialize)]
pub struct RacketResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub product_id: Option<Uuid>,
    pub custom_name: Option<String>,
    pub brand: String,
    pub model: String,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_unstrung: Option<Decimal>,
    pub grip_size: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ClientRacket> for RacketResponse {
    fn from(racket: ClientRacket) -> Self {
        Self {
            id: racket.id,
            client_id: racket.client_id,
            product_id: racket.product_id,
            custom_name: racket.custom_name,
            brand: racket.brand,
            model: racket.model,
            serial_number: racket.serial_number,
            purchase_date: racket.purchase_date,
            weight_unstrung: racket.weight_unstrung,
            grip_size: racket.grip_size,
            notes: racket.notes,
            is_active: racket.is_active,
            created_at: racket.created_at.to_rfc3339(),
            updated_at: racket.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRacketRequest {
    pub client_id: Uuid,

    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 1, max = 20))]
    pub grip_size: String,

    pub product_id: Option<Uuid>,
    pub custom_name: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_unstrung: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRacketRequest {
    pub product_id: Option<Uuid>,
    pub custom_name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_unstrung: Option<Decimal>,
    pub grip_size: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RacketListQuery {
    pub client_id: Option<Uuid>,
    pub brand: Option<String>,
    pub is_active: Option<bool>,
}

/// List rackets with pagination and filters
pub async fn list_rackets(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(params): Query<PageParams>,
    Query(query): Query<RacketListQuery>,
) -> Result<Json<Paginated<RacketResponse>>> {
    let params = params.clamped(state.config.pagination.max_page_size);

    let page = state
        .repo
        .list_rackets(
            RacketFilter {
                client_id: query.client_id,
                brand: query.brand,
                is_active: query.is_active,
            },
            params,
        )
        .await?;

    Ok(Json(page.map(RacketResponse::from)))
}

/// Get a specific racket by ID
pub async fn get_racket(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(racket_id): Path<Uuid>,
) -> Result<Json<RacketResponse>> {
    let racket = state
        .repo
        .find_racket_by_id(racket_id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "Racket",
            id: racket_id.to_string(),
        })?;

    Ok(Json(RacketResponse::from(racket)))
}

/// Add a new racket for a client
pub async fn create_racket(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateRacketRequest>,
) -> Result<(StatusCode, Json<RacketResponse>)> {
    request.validate()?;

    // Verify client exists
    if state
        .repo
        .find_client_by_id(request.client_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound {
            resource: "Client",
            id: request.client_id.to_string(),
        });
    }

    // Verify catalog product exists when linked
    if let Some(product_id) = request.product_id {
        if state.repo.find_product_by_id(product_id).await?.is_none() {
            return Err(AppError::NotFound {
                resource: "Product",
                id: product_id.to_string(),
            });
        }
    }

    let racket = state
        .repo
        .create_racket(NewRacket {
            client_id: request.client_id,
            product_id: request.product_id,
            custom_name: request.custom_name,
            brand: request.brand,
            model: request.model,
            serial_number: request.serial_number,
            purchase_date: request.purchase_date,
            weight_unstrung: request.weight_unstrung,
            grip_size: request.grip_size,
            notes: request.notes,
        })
        .await?;

    tracing::info!(racket_id = %racket.id, client_id = %racket.client_id, "Racket created");

    Ok((StatusCode::CREATED, Json(RacketResponse::from(racket))))
}

/// Update an existing racket
pub async fn update_racket(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(racket_id): Path<Uuid>,
    Json(request): Json<UpdateRacketRequest>,
) -> Result<Json<RacketResponse>> {
    if let Some(product_id) = request.product_id {
        if state.repo.find_product_by_id(product_id).await?.is_none() {
            return Err(AppError::NotFound {
                resource: "Product",
                id: product_id.to_string(),
            });
        }
    }

    let racket = state
        .repo
        .update_racket(
            racket_id,
            RacketPatch {
                product_id: request.product_id,
                custom_name: request.custom_name,
                brand: request.brand,
                model: request.model,
                serial_number: request.serial_number,
                purchase_date: request.purchase_date,
                weight_unstrung: request.weight_unstrung,
                grip_size: request.grip_size,
                notes: request.notes,
                is_active: request.is_active,
            },
        )
        .await?;

    tracing::info!(racket_id = %racket.id, "Racket updated");

    Ok(Json(RacketResponse::from(racket)))
}

/// Soft delete a racket.
///
/// Its maintenance history remains queryable.
pub async fn delete_racket(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(racket_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repo.deactivate_racket(racket_id).await?;

    tracing::info!(racket_id = %racket_id, "Racket deactivated");

    Ok(StatusCode::NO_CONTENT)
}
