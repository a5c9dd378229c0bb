//! Point-of-sale routes.
//!
//! Checkout decrements stock, writes the sale, and posts revenue and
//! cost of goods to the ledger in one database transaction.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_core::pos::{PosError, SaleItemInput};
use kopra_db::entities::{sale_items, sales};
use kopra_db::repositories::journal::JournalError;
use kopra_db::repositories::sale::{SaleError, SaleRepository, SaleWithItems};
use kopra_shared::{AppError, PageRequest};

/// Creates the sales routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales))
        .route("/sales", post(process_sale))
        .route("/sales/daily", get(daily_sales))
        .route("/sales/top-products", get(top_products))
        .route("/sales/{id}", get(get_sale))
}

/// Query parameters for listing sales.
#[derive(Debug, Deserialize)]
struct ListSalesQuery {
    /// Earliest sale date, inclusive.
    from: Option<NaiveDate>,
    /// Latest sale date, inclusive.
    to: Option<NaiveDate>,
    /// Filter by cashier.
    cashier_id: Option<Uuid>,
    /// Page number (1-indexed).
    page: Option<u32>,
    /// Items per page.
    per_page: Option<u32>,
}

/// Query parameters for the daily sales totals.
#[derive(Debug, Deserialize)]
struct DailySalesQuery {
    /// The day to total; defaults to today.
    date: Option<NaiveDate>,
}

/// Query parameters for the best-seller ranking.
#[derive(Debug, Deserialize)]
struct TopProductsQuery {
    /// Start of the period, inclusive.
    from: NaiveDate,
    /// End of the period, inclusive.
    to: NaiveDate,
    /// Maximum rows to return.
    limit: Option<u64>,
}

/// Request body for ringing up a sale.
#[derive(Debug, Deserialize)]
struct CreateSaleRequest {
    /// Buying member, when the sale is on a member account.
    member_id: Option<Uuid>,
    /// The requested items.
    items: Vec<SaleItemInput>,
    /// Amount tendered.
    paid: Decimal,
}

/// Response for a sale with its item lines.
#[derive(Debug, Serialize)]
struct SaleResponse {
    /// The sale header.
    #[serde(flatten)]
    sale: sales::Model,
    /// The item lines.
    items: Vec<sale_items::Model>,
}

impl From<SaleWithItems> for SaleResponse {
    fn from(value: SaleWithItems) -> Self {
        Self {
            sale: value.sale,
            items: value.items,
        }
    }
}

fn map_error(e: SaleError) -> AppError {
    match e {
        SaleError::Rule(PosError::InsufficientStock {
            product,
            available,
            requested,
        }) => AppError::BusinessRule(format!(
            "insufficient stock for {product}: available {available}, requested {requested}"
        )),
        SaleError::Rule(PosError::InsufficientPayment { total, paid }) => AppError::BusinessRule(
            format!("insufficient payment: total {total}, paid {paid}"),
        ),
        SaleError::Rule(rule) => AppError::Validation(rule.to_string()),
        SaleError::ProductNotFound(_) => AppError::NotFound("product not found".to_string()),
        SaleError::MemberNotFound(_) => AppError::NotFound("member not found".to_string()),
        SaleError::SaleNotFound(_) => AppError::NotFound("sale not found".to_string()),
        SaleError::MissingAccount(code) => {
            error!(code = %code, "Chart of accounts is missing a posting account");
            AppError::Internal("an internal error occurred".to_string())
        }
        SaleError::Posting(JournalError::Rule(rule)) => AppError::Validation(rule.to_string()),
        SaleError::Posting(e) => {
            error!(error = %e, "Sale ledger posting failed");
            database_error()
        }
        SaleError::Database(e) => {
            error!(error = %e, "Sale query failed");
            database_error()
        }
    }
}

/// GET `/sales` - List sales newest first.
async fn list_sales(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListSalesQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewSales) {
        return response;
    }

    let repo = SaleRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo
        .list_sales(
            auth.cooperative_id(),
            query.from,
            query.to,
            query.cashier_id,
            page,
        )
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/sales/daily` - Totals and count for one day.
async fn daily_sales(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DailySalesQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewSales) {
        return response;
    }

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let repo = SaleRepository::new((*state.db).clone());
    match repo.daily_sales(auth.cooperative_id(), date).await {
        Ok(totals) => Json(totals).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/sales/top-products` - Best sellers over a period.
async fn top_products(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TopProductsQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewSales) {
        return response;
    }
    if query.from > query.to {
        return error_response(&AppError::Validation(
            "period start must not be after period end".to_string(),
        ));
    }

    let limit = query.limit.unwrap_or(10).min(100);
    let repo = SaleRepository::new((*state.db).clone());
    match repo
        .top_products(auth.cooperative_id(), query.from, query.to, limit)
        .await
    {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/sales` - Ring up a sale.
async fn process_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSaleRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ProcessSale) {
        return response;
    }

    let repo = SaleRepository::new((*state.db).clone());
    match repo
        .process_sale(
            auth.cooperative_id(),
            auth.user_id(),
            payload.member_id,
            payload.items,
            payload.paid,
        )
        .await
    {
        Ok(sale) => (StatusCode::CREATED, Json(SaleResponse::from(sale))).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/sales/{id}` - One sale with its items.
async fn get_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewSales) {
        return response;
    }

    let repo = SaleRepository::new((*state.db).clone());
    match repo.get_sale(auth.cooperative_id(), id).await {
        Ok(sale) => Json(SaleResponse::from(sale)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
