//! Member-portal routes.
//!
//! Reachable only with a member-scoped token; the member id comes from
//! the token, so a member can never read another member's savings.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_db::repositories::savings::{SavingsError, SavingsRepository};
use kopra_shared::{AppError, PageRequest};

/// Creates the portal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/portal/savings", get(my_savings))
        .route("/portal/savings/transactions", get(my_transactions))
}

/// Query parameters for the portal transaction list.
#[derive(Debug, Deserialize)]
struct ListQuery {
    /// Page number (1-indexed).
    page: Option<u32>,
    /// Items per page.
    per_page: Option<u32>,
}

fn map_error(e: SavingsError) -> AppError {
    match e {
        SavingsError::MemberNotFound(_) => AppError::NotFound("member not found".to_string()),
        e => {
            error!(error = %e, "Portal savings query failed");
            database_error()
        }
    }
}

/// GET `/portal/savings` - The caller's derived savings balances.
async fn my_savings(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let member_id = match auth.portal_member_id() {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = SavingsRepository::new((*state.db).clone());
    match repo.member_savings(auth.cooperative_id(), member_id).await {
        Ok(savings) => Json(savings).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/portal/savings/transactions` - The caller's movement history.
async fn my_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let member_id = match auth.portal_member_id() {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = SavingsRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo
        .list_transactions(auth.cooperative_id(), member_id, None, page)
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
