//! Product catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_db::repositories::product::{
    CreateProductInput, ProductError, ProductRepository, UpdateProductInput,
};
use kopra_shared::{AppError, PageRequest};

/// Creates the product routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products", post(create_product))
        .route("/products/low-stock", get(low_stock))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", put(update_product))
        .route("/products/{id}", delete(deactivate_product))
        .route("/products/{id}/stock-adjustments", post(adjust_stock))
}

/// Query parameters for listing products.
#[derive(Debug, Deserialize)]
struct ListProductsQuery {
    /// Match against name or barcode.
    search: Option<String>,
    /// Filter by active status.
    active: Option<bool>,
    /// Page number (1-indexed).
    page: Option<u32>,
    /// Items per page.
    per_page: Option<u32>,
}

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
struct CreateProductRequest {
    /// Product name.
    name: String,
    /// Optional barcode, unique within the cooperative.
    barcode: Option<String>,
    /// Selling price.
    selling_price: Decimal,
    /// Cost price.
    cost_price: Decimal,
    /// Opening stock.
    #[serde(default)]
    stock: i64,
    /// Stock level that flags the product as low.
    #[serde(default)]
    low_stock_threshold: i64,
}

/// Request body for updating a product. Stock moves only through sales
/// and explicit adjustments.
#[derive(Debug, Deserialize)]
struct UpdateProductRequest {
    /// New name.
    name: Option<String>,
    /// New barcode.
    barcode: Option<String>,
    /// New selling price.
    selling_price: Option<Decimal>,
    /// New cost price.
    cost_price: Option<Decimal>,
    /// New low-stock threshold.
    low_stock_threshold: Option<i64>,
    /// New active flag.
    active: Option<bool>,
}

/// Request body for a manual stock correction.
#[derive(Debug, Deserialize)]
struct StockAdjustmentRequest {
    /// Units to add (positive) or remove (negative).
    delta: i64,
}

fn map_error(e: ProductError) -> AppError {
    match e {
        ProductError::DuplicateBarcode(barcode) => {
            AppError::Conflict(format!("barcode {barcode} is already in use"))
        }
        ProductError::ProductNotFound(_) => AppError::NotFound("product not found".to_string()),
        ProductError::StockWouldGoNegative(_) => {
            AppError::BusinessRule("adjustment would make stock negative".to_string())
        }
        ProductError::Database(e) => {
            error!(error = %e, "Product query failed");
            database_error()
        }
    }
}

/// GET `/products` - List products, paginated.
async fn list_products(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListProductsQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewProducts) {
        return response;
    }

    let repo = ProductRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo
        .list_products(
            auth.cooperative_id(),
            query.search.as_deref(),
            query.active,
            page,
        )
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/products` - Create a product.
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageProducts) {
        return response;
    }

    if payload.name.trim().is_empty() {
        return error_response(&AppError::Validation(
            "product name is required".to_string(),
        ));
    }
    if payload.selling_price < Decimal::ZERO
        || payload.cost_price < Decimal::ZERO
        || payload.stock < 0
        || payload.low_stock_threshold < 0
    {
        return error_response(&AppError::Validation(
            "prices, stock, and thresholds must not be negative".to_string(),
        ));
    }

    let repo = ProductRepository::new((*state.db).clone());
    let input = CreateProductInput {
        name: payload.name,
        barcode: payload.barcode,
        selling_price: payload.selling_price,
        cost_price: payload.cost_price,
        stock: payload.stock,
        low_stock_threshold: payload.low_stock_threshold,
    };

    match repo.create_product(auth.cooperative_id(), input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/products/low-stock` - Products at or below their threshold.
async fn low_stock(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewProducts) {
        return response;
    }

    let repo = ProductRepository::new((*state.db).clone());
    match repo.low_stock(auth.cooperative_id()).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/products/{id}` - One product.
async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewProducts) {
        return response;
    }

    let repo = ProductRepository::new((*state.db).clone());
    match repo.find_product(auth.cooperative_id(), id).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// PUT `/products/{id}` - Update catalog details.
async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageProducts) {
        return response;
    }

    let repo = ProductRepository::new((*state.db).clone());
    let input = UpdateProductInput {
        name: payload.name,
        barcode: payload.barcode.map(Some),
        selling_price: payload.selling_price,
        cost_price: payload.cost_price,
        low_stock_threshold: payload.low_stock_threshold,
        active: payload.active,
    };

    match repo.update_product(auth.cooperative_id(), id, input).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// DELETE `/products/{id}` - Deactivate a product.
async fn deactivate_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageProducts) {
        return response;
    }

    let repo = ProductRepository::new((*state.db).clone());
    match repo.deactivate_product(auth.cooperative_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/products/{id}/stock-adjustments` - Manual stock correction.
///
/// Corrections touch stock only; they do not post to the ledger.
async fn adjust_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustmentRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageProducts) {
        return response;
    }

    if payload.delta == 0 {
        return error_response(&AppError::Validation(
            "adjustment delta must not be zero".to_string(),
        ));
    }

    let repo = ProductRepository::new((*state.db).clone());
    match repo.adjust_stock(auth.cooperative_id(), id, payload.delta).await {
        Ok(product) => Json(product).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
