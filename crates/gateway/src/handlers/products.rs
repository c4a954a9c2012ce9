//! Product and inventory handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use courtside_common::{
    auth::AuthContext,
    db::models::Product,
    db::repository::{NewProduct, ProductFilter, ProductPatch},
    errors::{AppError, Result},
    metrics,
    pagination::{PageParams, Paginated},
};

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub quantity_in_stock: i32,
    pub image_url: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            category_id: product.category_id,
            name: product.name,
            brand: product.brand,
            model: product.model,
            sku: product.sku,
            description: product.description,
            price: product.price,
            cost_price: product.cost_price,
            quantity_in_stock: product.quantity_in_stock,
            image_url: product.image_url,
            specifications: product.specifications,
            is_active: product.is_active,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    pub model: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub quantity_in_stock: i32,

    pub image_url: Option<String>,

    /// Open attribute bag; valid keys vary by category
    pub specifications: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,

    #[validate(range(min = 0))]
    pub quantity_in_stock: Option<i32>,

    pub image_url: Option<String>,
    pub specifications: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Search by name, brand, or model
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_active: Option<bool>,
    /// Only items below the configured low-stock threshold
    #[serde(default)]
    pub low_stock: bool,
}

fn validate_price(field: &'static str, price: Option<Decimal>) -> Result<()> {
    if let Some(p) = price {
        if p < Decimal::ZERO {
            return Err(AppError::invalid_field(field, "must be non-negative"));
        }
    }
    Ok(())
}

/// List products with pagination, search, and filters
pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(params): Query<PageParams>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Paginated<ProductResponse>>> {
    let params = params.clamped(state.config.pagination.max_page_size);

    let below_stock = query
        .low_stock
        .then_some(state.config.business.low_stock_threshold);

    let page = state
        .repo
        .list_products(
            ProductFilter {
                search: query.search,
                category_id: query.category_id,
                is_active: query.is_active,
                below_stock,
            },
            params,
        )
        .await?;

    Ok(Json(page.map(ProductResponse::from)))
}

/// Get active products below the low-stock threshold, lowest stock first
pub async fn low_stock_products(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = state
        .repo
        .low_stock_products(state.config.business.low_stock_threshold)
        .await?;

    metrics::record_low_stock_count(products.len());

    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

/// Get a specific product by ID
pub async fn get_product(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductResponse>> {
    let product = state
        .repo
        .find_product_by_id(product_id)
        .await?
        .ok_or(AppError::NotFound {
            resource: "Product",
            id: product_id.to_string(),
        })?;

    Ok(Json(ProductResponse::from(product)))
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    _auth: AuthContext,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    request.validate()?;
    validate_price("price", request.price)?;
    validate_price("cost_price", request.cost_price)?;

    // Verify category exists
    if state
        .repo
        .find_category_by_id(request.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound {
            resource: "Category",
            id: request.category_id.to_string(),
        });
    }

    if let Some(ref sku) = request.sku {
        if state.repo.find_product_by_sku(sku).await?.is_some() {
            return Err(AppError::DuplicateKey {
                field: "sku",
                value: sku.clone(),
            });
        }
    }

    let product = state
        .repo
        .create_product(NewProduct {
            category_id: request.category_id,
            name: request.name,
            brand: request.brand,
            model: request.model,
            sku: request.sku,
            description: request.description,
            price: request.price,
            cost_price: request.cost_price,
            quantity_in_stock: request.quantity_in_stock,
            image_url: request.image_url,
            specifications: request.specifications,
        })
        .await?;

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// Update an existing product
pub async fn update_product(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(product_id): Path<Uuid>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    request.validate()?;
    validate_price("price", request.price)?;
    validate_price("cost_price", request.cost_price)?;

    if let Some(category_id) = request.category_id {
        if state
            .repo
            .find_category_by_id(category_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound {
                resource: "Category",
                id: category_id.to_string(),
            });
        }
    }

    let product = state
        .repo
        .update_product(
            product_id,
            ProductPatch {
                category_id: request.category_id,
                name: request.name,
                brand: request.brand,
                model: request.model,
                sku: request.sku,
                description: request.description,
                price: request.price,
                cost_price: request.cost_price,
                quantity_in_stock: request.quantity_in_stock,
                image_url: request.image_url,
                specifications: request.specifications,
                is_active: request.is_active,
            },
        )
        .await?;

    tracing::info!(product_id = %product.id, "Product updated");

    Ok(Json(ProductResponse::from(product)))
}

/// Soft delete a product.
///
/// Past maintenance records referencing it remain resolvable.
pub async fn delete_product(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(product_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.repo.deactivate_product(product_id).await?;

    tracing::info!(product_id = %product_id, "Product deactivated");

    Ok(StatusCode::NO_CONTENT)
}
