//! Financial report routes.
//!
//! Every figure here is derived from posted journal lines at request
//! time; no balance column exists anywhere to drift out of sync.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_core::coa::AccountType;
use kopra_core::reports::{AccountBalance, DashboardStats, ReportService};
use kopra_db::repositories::report::{ReportError, ReportRepository};
use kopra_shared::AppError;

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(trial_balance))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/income-statement", get(income_statement))
        .route("/reports/equity-changes", get(equity_changes))
        .route("/reports/general-ledger/{code}", get(general_ledger))
        .route("/reports/daily", get(daily))
        .route("/reports/dashboard", get(dashboard))
}

/// Query parameters for point-in-time reports.
#[derive(Debug, Deserialize)]
struct AsOfQuery {
    /// Report date; defaults to today.
    as_of: Option<NaiveDate>,
}

/// Query parameters for period reports.
#[derive(Debug, Deserialize)]
struct PeriodQuery {
    /// Period start, inclusive.
    from: NaiveDate,
    /// Period end, inclusive.
    to: NaiveDate,
}

/// Query parameters for the daily summary.
#[derive(Debug, Deserialize)]
struct DailyQuery {
    /// Summary date; defaults to today.
    date: Option<NaiveDate>,
}

fn map_error(e: ReportError) -> AppError {
    match e {
        ReportError::AccountNotFound(code) => {
            AppError::NotFound(format!("account {code} not found"))
        }
        ReportError::Database(e) => {
            error!(error = %e, "Report query failed");
            database_error()
        }
    }
}

fn validate_period(query: &PeriodQuery) -> Result<(), AppError> {
    if query.from > query.to {
        return Err(AppError::Validation(
            "period start must not be after period end".to_string(),
        ));
    }
    Ok(())
}

/// Splits cumulative balances into the equity total and the surplus
/// components (revenue and expense totals).
fn equity_components(accounts: &[AccountBalance]) -> (Decimal, Decimal, Decimal) {
    let mut equity = Decimal::ZERO;
    let mut revenue = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for account in accounts {
        match account.account_type {
            AccountType::Equity => equity += account.balance(),
            AccountType::Revenue => revenue += account.balance(),
            AccountType::Expense => expense += account.balance(),
            AccountType::Asset | AccountType::Liability => {}
        }
    }

    (equity, revenue, expense)
}

/// GET `/reports/trial-balance` - Trial balance as of a date.
async fn trial_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AsOfQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewReports) {
        return response;
    }

    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let repo = ReportRepository::new((*state.db).clone());

    match repo.account_balances_as_of(auth.cooperative_id(), as_of).await {
        Ok(balances) => Json(ReportService::trial_balance(as_of, &balances)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/reports/balance-sheet` - Balance sheet as of a date.
async fn balance_sheet(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AsOfQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewReports) {
        return response;
    }

    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let repo = ReportRepository::new((*state.db).clone());

    match repo.account_balances_as_of(auth.cooperative_id(), as_of).await {
        Ok(balances) => Json(ReportService::balance_sheet(as_of, &balances)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/reports/income-statement` - Revenue and expenses for a period.
async fn income_statement(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewReports) {
        return response;
    }
    if let Err(e) = validate_period(&query) {
        return error_response(&e);
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .account_balances_between(auth.cooperative_id(), query.from, query.to)
        .await
    {
        Ok(balances) => {
            Json(ReportService::income_statement(query.from, query.to, &balances)).into_response()
        }
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/reports/equity-changes` - Statement of changes in equity.
async fn equity_changes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewReports) {
        return response;
    }
    if let Err(e) = validate_period(&query) {
        return error_response(&e);
    }
    let Some(day_before) = query.from.pred_opt() else {
        return error_response(&AppError::Validation("invalid period start".to_string()));
    };

    let repo = ReportRepository::new((*state.db).clone());

    // Opening equity folds the surplus earned before the period in, the
    // same way the balance sheet does.
    let opening = match repo
        .account_balances_as_of(auth.cooperative_id(), day_before)
        .await
    {
        Ok(balances) => balances,
        Err(e) => return error_response(&map_error(e)),
    };
    let period = match repo
        .account_balances_between(auth.cooperative_id(), query.from, query.to)
        .await
    {
        Ok(balances) => balances,
        Err(e) => return error_response(&map_error(e)),
    };

    let (opening_equity, opening_revenue, opening_expense) = equity_components(&opening);
    let (contributions, period_revenue, period_expense) = equity_components(&period);

    Json(ReportService::equity_changes(
        query.from,
        query.to,
        opening_equity + opening_revenue - opening_expense,
        contributions,
        period_revenue - period_expense,
    ))
    .into_response()
}

/// GET `/reports/general-ledger/{code}` - Account history with running balance.
async fn general_ledger(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewReports) {
        return response;
    }
    if let Err(e) = validate_period(&query) {
        return error_response(&e);
    }

    let repo = ReportRepository::new((*state.db).clone());
    let account = match repo.account_by_code(auth.cooperative_id(), &code).await {
        Ok(account) => account,
        Err(e) => return error_response(&map_error(e)),
    };

    let opening = match repo
        .opening_balance(auth.cooperative_id(), &account, query.from)
        .await
    {
        Ok(balance) => balance,
        Err(e) => return error_response(&map_error(e)),
    };
    let movements = match repo
        .account_movements(auth.cooperative_id(), account.id, query.from, query.to)
        .await
    {
        Ok(movements) => movements,
        Err(e) => return error_response(&map_error(e)),
    };

    Json(ReportService::general_ledger(
        account.code,
        account.name,
        account.account_type.into(),
        query.from,
        query.to,
        opening,
        &movements,
    ))
    .into_response()
}

/// GET `/reports/daily` - Cash and activity summary for one day.
async fn daily(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DailyQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewReports) {
        return response;
    }

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let repo = ReportRepository::new((*state.db).clone());

    match repo.daily_activity(auth.cooperative_id(), date).await {
        Ok(activity) => Json(ReportService::daily_report(
            date,
            activity.cash_in,
            activity.cash_out,
            activity.entry_count,
            activity.sales_count,
            activity.sales_total,
            activity.deposit_count,
            activity.deposit_total,
        ))
        .into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/reports/dashboard` - Headline numbers.
async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewReports) {
        return response;
    }

    let today = Utc::now().date_naive();
    let repo = ReportRepository::new((*state.db).clone());

    match repo.dashboard_counts(auth.cooperative_id(), today).await {
        Ok(counts) => Json(DashboardStats {
            member_count: counts.member_count,
            product_count: counts.product_count,
            sales_today: counts.sales_today,
            total_savings: counts.total_savings,
            cash_balance: counts.cash_balance,
            low_stock_count: counts.low_stock_count,
        })
        .into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
