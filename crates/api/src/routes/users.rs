//! Staff user routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{database_error, error_response};
use kopra_core::auth::Operation;
use kopra_db::repositories::user::{CreateUserInput, UserError, UserRepository};
use kopra_shared::{AppError, Role};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/me", get(current_user))
}

/// Request body for creating a staff user.
#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    /// Login username, unique across the system.
    username: String,
    /// Password.
    password: String,
    /// Display name.
    name: String,
    /// Staff role: admin, treasurer, cashier.
    role: Role,
}

fn map_error(e: UserError) -> AppError {
    match e {
        UserError::DuplicateUsername(username) => {
            AppError::Conflict(format!("username {username} is already taken"))
        }
        UserError::UserNotFound(_) => AppError::NotFound("user not found".to_string()),
        UserError::InvalidCredentials => {
            AppError::Unauthorized("invalid username or password".to_string())
        }
        UserError::Password(e) => {
            error!(error = %e, "Password hashing failed");
            AppError::Internal("an internal error occurred".to_string())
        }
        UserError::Database(e) => {
            error!(error = %e, "User query failed");
            database_error()
        }
    }
}

/// GET `/users` - Staff users of the cooperative.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageUsers) {
        return response;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list_users(auth.cooperative_id()).await {
        Ok(users) => Json(users).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// POST `/users` - Create a staff user.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(response) = auth.require(Operation::ManageUsers) {
        return response;
    }

    if payload.password.len() < 8 {
        return error_response(&AppError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if payload.username.trim().is_empty() || payload.name.trim().is_empty() {
        return error_response(&AppError::Validation(
            "username and name are required".to_string(),
        ));
    }

    let repo = UserRepository::new((*state.db).clone());
    let input = CreateUserInput {
        username: payload.username,
        password: payload.password,
        name: payload.name,
        role: payload.role,
    };

    match repo.create_user(auth.cooperative_id(), input).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}

/// GET `/users/me` - The authenticated staff user.
async fn current_user(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = auth.require_staff() {
        return response;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.find_user(auth.user_id()).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => error_response(&map_error(e)),
    }
}
