//! Maintenance record handlers: stringing history and services

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use courtside_common::{
    auth::AuthContext,
    db::models::{MaintenanceRecord, ServiceType},
    db::repository::RecordFilter,
    errors::{AppError, Result},
    maintenance::{
        DampenerConfig, GripConfig, MaintenanceRecordPatch, NewMaintenanceRecord, StringConfig,
    },
    metrics,
    pagination::{PageParams, Paginated},
};

#[derive(Debug, Serialize)]
pub struct MaintenanceRecordResponse {
    pub id: Uuid,
    pub client_racket_id: Uuid,
    pub performed_by_user_id: Uuid,
    pub service_date: String,
    pub service_type: String,

    pub main_string_id: Option<Uuid>,
    pub cross_string_id: Option<Uuid>,
    pub main_tension_kg: Option<Decimal>,
    pub cross_tension_kg: Option<Decimal>,
    pub string_pattern: Option<String>,

    pub base_grip_id: Option<Uuid>,
    pub overgrip_id: Option<Uuid>,
    pub number_of_overgrips: i32,

    pub dampener_id: Option<Uuid>,
    pub dampener_position: Option<String>,

    pub service_cost: Decimal,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub is_warranty_service: bool,
    pub next_service_due_date: Option<NaiveDate>,

    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MaintenanceRecord> for MaintenanceRecordResponse {
    fn from(record: MaintenanceRecord) -> Self {
        Self {
            id: record.id,
            client_racket_id: record.client_racket_id,
            performed_by_user_id: record.performed_by_user_id,
            service_date: record.service_date.to_rfc3339(),
            service_type: record.service_type,
            main_string_id: record.main_string_id,
            cross_string_id: record.cross_string_id,
            main_tension_kg: record.main_tension_kg,
            cross_tension_kg: record.cross_tension_kg,
            string_pattern: record.string_pattern,
            base_grip_id: record.base_grip_id,
            overgrip_id: record.overgrip_id,
            number_of_overgrips: record.number_of_overgrips,
            dampener_id: record.dampener_id,
            dampener_position: record.dampener_position,
            service_cost: record.service_cost,
            duration_minutes: record.duration_minutes,
            notes: record.notes,
            is_warranty_service: record.is_warranty_service,
            next_service_due_date: record.next_service_due_date,
            is_active: record.is_active,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

/// Request to record a performed service.
///
/// The three configuration groups are all optional; every supplied
/// product id must resolve.
#[derive(Debug, Deserialize)]
pub struct CreateMaintenanceRecordRequest {
    pub client_racket_id: Uuid,

    #[serde(default)]
    pub service_type: ServiceType,

    /// Defaults to the current time when omitted
    pub service_date: Option<DateTime<Utc>>,

    // String configuration
    pub main_string_id: Option<Uuid>,
    pub cross_string_id: Option<Uuid>,
    pub main_tension_kg: Option<Decimal>,
    pub cross_tension_kg: Option<Decimal>,
    pub string_pattern: Option<String>,

    // Grip configuration
    pub base_grip_id: Option<Uuid>,
    pub overgrip_id: Option<Uuid>,
    pub number_of_overgrips: Option<i32>,

    // Accessories
    pub dampener_id: Option<Uuid>,
    pub dampener_position: Option<String>,

    // Service details
    pub service_cost: Decimal,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,

    #[serde(default)]
    pub is_warranty_service: bool,

    pub next_service_due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMaintenanceRecordRequest {
    // Immutable after creation; supplying them fails with ImmutableField
    pub client_racket_id: Option<Uuid>,
    pub performed_by_user_id: Option<Uuid>,
    pub service_date: Option<DateTime<Utc>>,

    pub service_type: Option<ServiceType>,
    pub service_cost: Option<Decimal>,

    pub main_string_id: Option<Uuid>,
    pub cross_string_id: Option<Uuid>,
    pub main_tension_kg: Option<Decimal>,
    pub cross_tension_kg: Option<Decimal>,
    pub string_pattern: Option<String>,

    pub base_grip_id: Option<Uuid>,
    pub overgrip_id: Option<Uuid>,
    pub number_of_overgrips: Option<i32>,

    pub dampener_id: Option<Uuid>,
    pub dampener_position: Option<String>,

    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub is_warranty_service: Option<bool>,
    pub next_service_due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub client_racket_id: Option<Uuid>,
    pub service_type: Option<ServiceType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// List maintenance records with pagination and filters
pub async fn list_records(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(params): Query<PageParams>,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<Paginated<MaintenanceRecordResponse>>> {
    let params = params.clamped(state.config.pagination.max_page_size);

    let page = state
        .repo
        .list_records(
            RecordFilter {
                client_racket_id: query.client_racket_id,
                service_type: query.service_type,
                date_from: query.date_from,
                date_to: query.date_to,
            },
            params,
        )
        .await?;

    Ok(Json(page.map(MaintenanceRecordResponse::from)))
}

/// Get a specific maintenance record by ID
pub async fn get_record(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(record_id): Path<Uuid>,
) -> Result<Json<MaintenanceRecordResponse>> {
    let record = state
        .repo
        .find_record_by_id(record_id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "Maintenance record",
            id: record_id.to_string(),
        })?;

    Ok(Json(MaintenanceRecordResponse::from(record)))
}

/// Record a performed stringing or service.
///
/// The record is attributed to the authenticated user (or the
/// configured fallback user while auth is disabled).
pub async fn create_record(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<CreateMaintenanceRecordRequest>,
) -> Result<(StatusCode, Json<MaintenanceRecordResponse>)> {
    let input = NewMaintenanceRecord {
        client_racket_id: request.client_racket_id,
        performed_by_user_id: auth.user_id,
        service_type: request.service_type,
        service_date: request.service_date,
        strings: StringConfig {
            main_string_id: request.main_string_id,
            cross_string_id: request.cross_string_id,
            main_tension_kg: request.main_tension_kg,
            cross_tension_kg: request.cross_tension_kg,
        },
        string_pattern: request.string_pattern,
        grips: GripConfig {
            base_grip_id: request.base_grip_id,
            overgrip_id: request.overgrip_id,
            number_of_overgrips: request.number_of_overgrips,
        },
        dampener: DampenerConfig {
            dampener_id: request.dampener_id,
            dampener_position: request.dampener_position,
        },
        service_cost: request.service_cost,
        duration_minutes: request.duration_minutes,
        notes: request.notes,
        is_warranty_service: request.is_warranty_service,
        next_service_due_date: request.next_service_due_date,
    };

    let record = state.workflow.create_record(input).await?;

    metrics::record_service_created(&record.service_type);

    Ok((
        StatusCode::CREATED,
        Json(MaintenanceRecordResponse::from(record)),
    ))
}

/// Update an existing maintenance record over the supplied fields only
pub async fn update_record(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(record_id): Path<Uuid>,
    Json(request): Json<UpdateMaintenanceRecordRequest>,
) -> Result<Json<MaintenanceRecordResponse>> {
    let patch = MaintenanceRecordPatch {
        client_racket_id: request.client_racket_id,
        performed_by_user_id: request.performed_by_user_id,
        service_date: request.service_date,
        service_type: request.service_type,
        service_cost: request.service_cost,
        main_string_id: request.main_string_id,
        cross_string_id: request.cross_string_id,
        main_tension_kg: request.main_tension_kg,
        cross_tension_kg: request.cross_tension_kg,
        string_pattern: request.string_pattern,
        base_grip_id: request.base_grip_id,
        overgrip_id: request.overgrip_id,
        number_of_overgrips: request.number_of_overgrips,
        dampener_id: request.dampener_id,
        dampener_position: request.dampener_position,
        duration_minutes: request.duration_minutes,
        notes: request.notes,
        is_warranty_service: request.is_warranty_service,
        next_service_due_date: request.next_service_due_date,
    };

    let record = state.workflow.update_record(record_id, patch).await?;

    Ok(Json(MaintenanceRecordResponse::from(record)))
}

/// Soft delete a maintenance record (admin only)
pub async fn delete_record(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(record_id): Path<Uuid>,
) -> Result<StatusCode> {
    auth.require_admin()?;

    state.repo.deactivate_record(record_id).await?;

    tracing::info!(record_id = %record_id, "Maintenance record deactivated");

    Ok(StatusCode::NO_CONTENT)
}
