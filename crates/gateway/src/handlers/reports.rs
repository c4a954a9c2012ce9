//! Read-only reporting handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::maintenance::MaintenanceRecordResponse;
use crate::AppState;
use courtside_common::{
    auth::AuthContext,
    db::ProductUsage,
    errors::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Full maintenance history for a racket, most recent service first.
///
/// A racket with no history yields an empty list, not an error. History
/// survives deactivation of the racket, its client, or any referenced
/// product.
pub async fn racket_history(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(racket_id): Path<Uuid>,
) -> Result<Json<Vec<MaintenanceRecordResponse>>> {
    // The racket itself must exist, active or not
    if state.repo.find_racket_by_id(racket_id).await?.is_none() {
        return Err(AppError::NotFound {
            resource: "Racket",
            id: racket_id.to_string(),
        });
    }

    let records = state.repo.history_for_racket(racket_id).await?;

    Ok(Json(
        records
            .into_iter()
            .map(MaintenanceRecordResponse::from)
            .collect(),
    ))
}

/// How often each product was used across the five maintenance roles,
/// optionally restricted to a service-date range
pub async fn product_usage(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<UsageQuery>,
) -> Result<Json<Vec<ProductUsage>>> {
    let usage = state
        .repo
        .product_usage_counts(query.date_from, query.date_to)
        .await?;

    Ok(Json(usage))
}
