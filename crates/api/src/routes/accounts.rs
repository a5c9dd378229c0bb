//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_core::coa::AccountType;
use kopra_db::entities::accounts;
use kopra_db::repositories::account::{
    AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
use kopra_shared::AppError;
use rust_decimal::Decimal;

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}", put(update_account))
        .route("/accounts/{id}", delete(deactivate_account))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
struct ListAccountsQuery {
    /// Filter by account class.
    #[serde(rename = "type")]
    account_type: Option<AccountType>,
    /// Filter by active status.
    active: Option<bool>,
}

/// Query parameters for reading one account.
#[derive(Debug, Deserialize)]
struct GetAccountQuery {
    /// Derive the balance over entries dated on or before this day.
    as_of: Option<chrono::NaiveDate>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    /// Account code, unique within the cooperative.
    code: String,
    /// Account name.
    name: String,
    /// Account class: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    account_type: AccountType,
}

/// Request body for updating an account. Code and class are immutable.
#[derive(Debug, Deserialize)]
struct UpdateAccountRequest {
    /// New account name.
    name: Option<String>,
    /// New active flag.
    active: Option<bool>,
}

/// Response for a single account with its derived balance.
#[derive(Debug, Serialize)]
struct AccountDetailResponse {
    /// The account record.
    account: accounts::Model,
    /// Balance derived from posted journal lines.
    balance: Decimal,
}

fn map_error(e: AccountError) -> AppError {
    match e {
        AccountError::DuplicateCode(code) => {
            AppError::Conflict(format!("account code {code} is already in use"))
        }
        AccountError::AccountNotFound(_) => AppError::NotFound("account not found".to_string()),
        AccountError::AccountInUse(lines) => AppError::BusinessRule(format!(
            "account has {lines} posted journal lines and cannot be deactivated"
        )),
        AccountError::Database(e) => {
            error!(error = %e, "Account query failed");
            database_error()
        }
    }
}

/// GET `/accounts` - List accounts, ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewAccounts) {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());
    match repo
        .list_accounts(auth.cooperative_id(), query.account_type, query.active)
        .await
    {
        Ok(accounts) => Json(accounts).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageAccounts) {
        return response;
    }

    if payload.code.trim().is_empty() || payload.name.trim().is_empty() {
        return error_response(&AppError::Validation(
            "account code and name are required".to_string(),
        ));
    }

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        code: payload.code,
        name: payload.name,
        account_type: payload.account_type,
    };

    match repo.create_account(auth.cooperative_id(), input).await {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/accounts/{id}` - One account with its derived balance,
/// optionally as of a date.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<GetAccountQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewAccounts) {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());
    match repo.find_account(auth.cooperative_id(), id, query.as_of).await {
        Ok(found) => Json(AccountDetailResponse {
            account: found.account,
            balance: found.balance,
        })
        .into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// PUT `/accounts/{id}` - Rename or toggle an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageAccounts) {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());
    let input = UpdateAccountInput {
        name: payload.name,
        active: payload.active,
    };

    match repo.update_account(auth.cooperative_id(), id, input).await {
        Ok(account) => Json(account).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// DELETE `/accounts/{id}` - Deactivate an account with no postings.
async fn deactivate_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageAccounts) {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());
    match repo.deactivate_account(auth.cooperative_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
