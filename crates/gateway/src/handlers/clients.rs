//! Client management handlers

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

use crate::handlers::rackets::RacketResponse;
use crate::AppState;
use courtside_common::{
    auth::AuthContext,
    db::models::Client,
    db::repository::{ClientFilter, ClientPatch, NewClient, NewRacket},
    errors::{AppError, Result},
    metrics,
    pagination::{PageParams, Paginated},
};

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phone_number: client.phone_number,
            date_of_birth: client.date_of_birth,
            address_line1: client.address_line1,
            address_line2: client.address_line2,
            city: client.city,
            postal_code: client.postal_code,
            country: client.country,
            notes: client.notes,
            is_active: client.is_active,
            created_at: client.created_at.to_rfc3339(),
            updated_at: client.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub phone_number: String,

    pub date_of_birth: Option<NaiveDate>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateClientRequest> for NewClient {
    fn from(request: CreateClientRequest) -> Self {
        NewClient {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            date_of_birth: request.date_of_birth,
            address_line1: request.address_line1,
            address_line2: request.address_line2,
            city: request.city,
            postal_code: request.postal_code,
            country: request.country,
            notes: request.notes,
        }
    }
}

/// Racket details supplied when onboarding a client with their rackets
#[derive(Debug, Deserialize, Validate)]
pub struct RacketInput {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 1, max = 20))]
    pub grip_size: String,

    pub custom_name: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub weight_unstrung: Option<Decimal>,
    pub product_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientWithRacketsRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub client: CreateClientRequest,

    #[serde(default)]
    #[validate(nested)]
    pub rackets: Vec<RacketInput>,
}

#[derive(Debug, Serialize)]
pub struct ClientWithRacketsResponse {
    #[serde(flatten)]
    pub client: ClientResponse,
    pub rackets: Vec<RacketResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    /// Search by name, email, or phone
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// List clients with pagination and search
pub async fn list_clients(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(params): Query<PageParams>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Paginated<ClientResponse>>> {
    let params = params.clamped(state.config.pagination.max_page_size);

    let page = state
        .repo
        .list_clients(
            ClientFilter {
                search: query.search,
                is_active: query.is_active,
            },
            params,
        )
        .await?;

    Ok(Json(page.map(ClientResponse::from)))
}

/// Get a specific client by ID
pub async fn get_client(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientResponse>> {
    let client = state
        .repo
        .find_client_by_id(client_id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "Client",
            id: client_id.to_string(),
        })?;

    Ok(Json(ClientResponse::from(client)))
}

/// Create a new client
pub async fn create_client(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>)> {
    request.validate()?;

    if let Some(ref email) = request.email {
        if state.repo.find_client_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateKey {
                field: "email",
                value: email.clone(),
            });
        }
    }

    let client = state.repo.create_client(request.into()).await?;

    metrics::record_client_registered();
    tracing::info!(client_id = %client.id, "Client created");

    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

/// Create a client along with their rackets in a single transaction.
///
/// Useful when onboarding a client who already owns rackets.
pub async fn create_client_with_rackets(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateClientWithRacketsRequest>,
) -> Result<(StatusCode, Json<ClientWithRacketsResponse>)> {
    request.validate()?;

    if let Some(ref email) = request.client.email {
        if state.repo.find_client_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateKey {
                field: "email",
                value: email.clone(),
            });
        }
    }

    let rackets = request
        .rackets
        .into_iter()
        .map(|r| NewRacket {
            // Overwritten with the generated client id inside the transaction
            client_id: Uuid::nil(),
            product_id: r.product_id,
            custom_name: r.custom_name,
            brand: r.brand,
            model: r.model,
            serial_number: r.serial_number,
            purchase_date: r.purchase_date,
            weight_unstrung: r.weight_unstrung,
            grip_size: r.grip_size,
            notes: r.notes,
        })
        .collect();

    let (client, rackets) = state
        .repo
        .create_client_with_rackets(request.client.into(), rackets)
        .await?;

    metrics::record_client_registered();
    tracing::info!(
        client_id = %client.id,
        racket_count = rackets.len(),
        "Client created with rackets"
    );

    Ok((
        StatusCode::CREATED,
        Json(ClientWithRacketsResponse {
            client: ClientResponse::from(client),
            rackets: rackets.into_iter().map(RacketResponse::from).collect(),
        }),
    ))
}

/// Update an existing client
pub async fn update_client(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(client_id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>> {
    let client = state
        .repo
        .update_client(
            client_id,
            ClientPatch {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone_number: request.phone_number,
                date_of_birth: request.date_of_birth,
                address_line1: request.address_line1,
                address_line2: request.address_line2,
                city: request.city,
                postal_code: request.postal_code,
                country: request.country,
                notes: request.notes,
                is_active: request.is_active,
            },
        )
        .await?;

    tracing::info!(client_id = %client.id, "Client updated");

    Ok(Json(ClientResponse::from(client)))
}

/// Soft delete a client.
///
/// Their rackets are deactivated with them; maintenance history stays.
pub async fn delete_client(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repo.deactivate_client(client_id).await?;

    tracing::info!(client_id = %client_id, "Client deactivated");

    Ok(StatusCode::NO_CONTENT)
}
