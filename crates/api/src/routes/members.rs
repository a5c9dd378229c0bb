//! Member registry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_db::repositories::member::{
    CreateMemberInput, MemberError, MemberRepository, UpdateMemberInput,
};
use kopra_shared::{AppError, PageRequest};

/// Shortest PIN accepted for the member portal.
const MIN_PIN_LENGTH: usize = 4;

/// Creates the member routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members))
        .route("/members", post(create_member))
        .route("/members/{id}", get(get_member))
        .route("/members/{id}", put(update_member))
        .route("/members/{id}", delete(deactivate_member))
        .route("/members/{id}/pin", put(set_pin))
}

/// Query parameters for listing members.
#[derive(Debug, Deserialize)]
struct ListMembersQuery {
    /// Match against name or member number.
    search: Option<String>,
    /// Filter by active status.
    active: Option<bool>,
    /// Page number (1-indexed).
    page: Option<u32>,
    /// Items per page.
    per_page: Option<u32>,
}

/// Request body for registering a member.
#[derive(Debug, Deserialize)]
struct CreateMemberRequest {
    /// Member name.
    name: String,
    /// National identity number.
    national_id: Option<String>,
    /// Phone number.
    phone: Option<String>,
    /// Address.
    address: Option<String>,
    /// Date the member joined; defaults to today.
    join_date: Option<NaiveDate>,
}

/// Request body for updating a member's contact details.
#[derive(Debug, Deserialize)]
struct UpdateMemberRequest {
    /// New name.
    name: Option<String>,
    /// New national identity number.
    national_id: Option<String>,
    /// New phone number.
    phone: Option<String>,
    /// New address.
    address: Option<String>,
}

/// Request body for setting a portal PIN.
#[derive(Debug, Deserialize)]
struct SetPinRequest {
    /// The new PIN.
    pin: String,
}

fn map_error(e: MemberError) -> AppError {
    match e {
        MemberError::MemberNotFound(_) => AppError::NotFound("member not found".to_string()),
        MemberError::HasSavings(balance) => AppError::BusinessRule(format!(
            "member still holds {balance} in savings and cannot be deactivated"
        )),
        MemberError::InvalidCredentials | MemberError::PinNotSet => {
            AppError::Unauthorized("invalid member number or PIN".to_string())
        }
        MemberError::Password(e) => {
            error!(error = %e, "PIN hashing failed");
            AppError::Internal("an internal error occurred".to_string())
        }
        MemberError::Database(e) => {
            error!(error = %e, "Member query failed");
            database_error()
        }
    }
}

/// GET `/members` - List members, paginated.
async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListMembersQuery>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewMembers) {
        return response;
    }

    let repo = MemberRepository::new((*state.db).clone());
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo
        .list_members(
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

/// POST `/members` - Register a member with the next `AGT-NNNN` number.
async fn create_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateMemberRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageMembers) {
        return response;
    }

    if payload.name.trim().is_empty() {
        return error_response(&AppError::Validation(
            "member name is required".to_string(),
        ));
    }

    let repo = MemberRepository::new((*state.db).clone());
    let input = CreateMemberInput {
        name: payload.name,
        national_id: payload.national_id,
        phone: payload.phone,
        address: payload.address,
        join_date: payload.join_date.unwrap_or_else(|| Utc::now().date_naive()),
    };

    match repo.create_member(auth.cooperative_id(), input).await {
        Ok(member) => (StatusCode::CREATED, Json(member)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/members/{id}` - One member.
async fn get_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ViewMembers) {
        return response;
    }

    let repo = MemberRepository::new((*state.db).clone());
    match repo.find_member(auth.cooperative_id(), id).await {
        Ok(member) => Json(member).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// PUT `/members/{id}` - Update contact details.
async fn update_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageMembers) {
        return response;
    }

    let repo = MemberRepository::new((*state.db).clone());
    let input = UpdateMemberInput {
        name: payload.name,
        national_id: payload.national_id.map(Some),
        phone: payload.phone.map(Some),
        address: payload.address.map(Some),
    };

    match repo.update_member(auth.cooperative_id(), id, input).await {
        Ok(member) => Json(member).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// DELETE `/members/{id}` - Deactivate a member with zero savings.
async fn deactivate_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageMembers) {
        return response;
    }

    let repo = MemberRepository::new((*state.db).clone());
    match repo.deactivate_member(auth.cooperative_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// PUT `/members/{id}/pin` - Set the member's portal PIN.
async fn set_pin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetPinRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageMembers) {
        return response;
    }

    if payload.pin.len() < MIN_PIN_LENGTH || !payload.pin.chars().all(|c| c.is_ascii_digit()) {
        return error_response(&AppError::Validation(format!(
            "PIN must be at least {MIN_PIN_LENGTH} digits"
        )));
    }

    let repo = MemberRepository::new((*state.db).clone());
    match repo.set_pin(auth.cooperative_id(), id, &payload.pin).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
