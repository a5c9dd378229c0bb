//! Savings routes, nested under the member they belong to.
//!
//! A deposit or withdrawal writes the savings record and its ledger
//! posting in one database transaction; the response carries both the
//! movement and its journal reference.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_core::savings::SavingsType;
use kopra_db::repositories::journal::JournalError;
use kopra_db::repositories::savings::{SavingsError, SavingsInput, SavingsRepository};
use kopra_shared::{AppError, PageRequest};

/// Creates the savings routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members/{id}/savings", get(member_savings))
        .route("/members/{id}/savings/transactions", get(list_transactions))
        .route("/members/{id}/savings/deposits", post(record_deposit))
        .route("/members/{id}/savings/withdrawals", post(record_withdrawal))
        .route("/savings/summary", get(savings_summary))
}

/// Query parameters for listing savings transactions.
#[derive(Debug, Deserialize)]
struct ListTransactionsQuery {
    /// Filter by savings type.
    #[serde(rename = "type")]
    savings_type: Option<SavingsType>,
    /// Page number (1-indexed).
    page: Option<u32>,
    /// Items per page.
    per_page: Option<u32>,
}

/// Request body for recording a deposit or withdrawal.
#[derive(Debug, Deserialize)]
struct MovementRequest {
    /// Savings type: principal, mandatory, voluntary.
    savings_type: SavingsType,
    /// Movement amount.
    amount: Decimal,
    /// Value date; defaults to today.
    date: Option<NaiveDate>,
    /// Optional free-text note.
    note: Option<String>,
}

impl MovementRequest {
    fn into_input(self, member_id: Uuid) -> SavingsInput {
        SavingsInput {
            member_id,
            savings_type: self.savings_type,
            amount: self.amount,
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            note: self.note,
        }
    }
}

fn map_error(e: SavingsError) -> AppError {
    match e {
        SavingsError::Rule(rule) => AppError::BusinessRule(rule.to_string()),
        SavingsError::MemberNotFound(_) => AppError::NotFound("member not found".to_string()),
        SavingsError::MissingAccount(code) => {
            error!(code = %code, "Chart of accounts is missing a posting account");
            AppError::Internal("an internal error occurred".to_string())
        }
        SavingsError::Posting(JournalError::Rule(rule)) => AppError::Validation(rule.to_string()),
        SavingsError::Posting(e) => {
            error!(error = %e, "Savings ledger posting failed");
            database_error()
        }
        SavingsError::Database(e) => {
            error!(error = %e, "Savings query failed");
            database_error()
        }
    }
}

/// GET `/members/{id}/savings` - Derived balances for the three types.
async fn member_savings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewSavings) {
        return response;
    }

    let repo = SavingsRepository::new((*state.db).clone());
    match repo.member_savings(auth.cooperative_id(), id).await {
        Ok(savings) => Json(savings).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/members/{id}/savings/transactions` - Movement history, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewSavings) {
        return response;
    }

    let repo = SavingsRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo
        .list_transactions(auth.cooperative_id(), id, query.savings_type, page)
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/savings/summary` - Tenant-wide savings totals per type.
async fn savings_summary(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewSavings) {
        return response;
    }

    let repo = SavingsRepository::new((*state.db).clone());
    match repo.savings_summary(auth.cooperative_id()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/members/{id}/savings/deposits` - Record a deposit.
async fn record_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovementRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::RecordSavings) {
        return response;
    }

    let repo = SavingsRepository::new((*state.db).clone());
    match repo
        .record_deposit(auth.cooperative_id(), auth.user_id(), payload.into_input(id))
        .await
    {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/members/{id}/savings/withdrawals` - Record a voluntary withdrawal.
async fn record_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovementRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::RecordSavings) {
        return response;
    }

    let repo = SavingsRepository::new((*state.db).clone());
    match repo
        .record_withdrawal(auth.cooperative_id(), auth.user_id(), payload.into_input(id))
        .await
    {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
