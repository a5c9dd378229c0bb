//! Journal entry routes.
//!
//! Entries post at creation and are immutable. PUT and DELETE exist so
//! clients get a clear business-rule error instead of a 405, and reversal
//! is the only way to neutralize a posted entry.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_core::ledger::{EntryInput, EntrySource, LedgerError};
use kopra_db::entities::{journal_entries, journal_lines};
use kopra_db::repositories::journal::{
    JournalEntryWithLines, JournalError, JournalFilter, JournalRepository,
};
use kopra_shared::{AppError, PageRequest};

/// Creates the journal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal", get(list_entries))
        .route("/journal", post(create_entry))
        .route("/journal/{id}", get(get_entry))
        .route("/journal/{id}", put(update_entry))
        .route("/journal/{id}", delete(delete_entry))
        .route("/journal/{id}/reverse", post(reverse_entry))
}

/// Query parameters for listing journal entries.
#[derive(Debug, Deserialize)]
struct ListJournalQuery {
    /// Earliest entry date, inclusive.
    from: Option<NaiveDate>,
    /// Latest entry date, inclusive.
    to: Option<NaiveDate>,
    /// Restrict to one source: manual, savings, pos, reversal.
    source: Option<EntrySource>,
    /// Page number (1-indexed).
    page: Option<u32>,
    /// Items per page.
    per_page: Option<u32>,
}

/// Request body for reversing an entry.
#[derive(Debug, Deserialize)]
struct ReverseRequest {
    /// Why the entry is being reversed; becomes the reversal description.
    reason: String,
}

/// Response for a journal entry with its lines.
#[derive(Debug, Serialize)]
struct EntryResponse {
    /// The entry header.
    #[serde(flatten)]
    entry: journal_entries::Model,
    /// The balanced lines.
    lines: Vec<journal_lines::Model>,
}

impl From<JournalEntryWithLines> for EntryResponse {
    fn from(value: JournalEntryWithLines) -> Self {
        Self {
            entry: value.entry,
            lines: value.lines,
        }
    }
}

fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
}

fn map_rule(rule: &LedgerError) -> AppError {
    match rule {
        LedgerError::AlreadyPosted | LedgerError::AlreadyReversed => {
            AppError::BusinessRule(rule.to_string())
        }
        _ => AppError::Validation(rule.to_string()),
    }
}

fn map_error(e: JournalError) -> AppError {
    match e {
        JournalError::Rule(rule) => map_rule(&rule),
        JournalError::EntryNotFound(_) => AppError::NotFound("journal entry not found".to_string()),
        JournalError::Database(e) => {
            error!(error = %e, "Journal query failed");
            database_error()
        }
    }
}

/// GET `/journal` - List entries newest first.
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListJournalQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewJournal) {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    let filter = JournalFilter {
        from: query.from,
        to: query.to,
        source: query.source,
    };

    match repo
        .list_entries(
            auth.cooperative_id(),
            filter,
            page_request(query.page, query.per_page),
        )
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/journal` - Validate and post a manual entry.
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<EntryInput>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::PostJournal) {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo
        .create_entry(auth.cooperative_id(), auth.user_id(), payload)
        .await
    {
        Ok(entry) => (StatusCode::CREATED, Json(EntryResponse::from(entry))).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/journal/{id}` - One entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewJournal) {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo.get_entry(auth.cooperative_id(), id).await {
        Ok(entry) => Json(EntryResponse::from(entry)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// PUT `/journal/{id}` - Always refused; posted entries are immutable.
async fn update_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::PostJournal) {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo.update_entry(auth.cooperative_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// DELETE `/journal/{id}` - Always refused; reverse instead.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::PostJournal) {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo.delete_entry(auth.cooperative_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/journal/{id}/reverse` - Post the reversing entry.
async fn reverse_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReverseRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ReverseJournal) {
        return response;
    }

    if payload.reason.trim().is_empty() {
        return error_response(&AppError::Validation(
            "a reversal reason is required".to_string(),
        ));
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo
        .reverse_entry(auth.cooperative_id(), id, &payload.reason, auth.user_id())
        .await
    {
        Ok(entry) => (StatusCode::CREATED, Json(EntryResponse::from(entry))).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
