//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use kopra_shared::AppError;

pub mod accounts;
pub mod auth;
pub mod health;
pub mod journal;
pub mod members;
pub mod portal;
pub mod products;
pub mod reports;
pub mod sales;
pub mod savings;
pub mod users;

/// Creates the API router with all routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(accounts::routes())
        .merge(journal::routes())
        .merge(members::routes())
        .merge(savings::routes())
        .merge(products::routes())
        .merge(sales::routes())
        .merge(reports::routes())
        .merge(users::routes())
        .merge(portal::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Builds the JSON error response for an [`AppError`].
///
/// Every handler funnels its repository errors through this so the
/// status codes and body shape stay uniform across the API.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// The fixed database error; raw driver messages are logged, not returned.
pub(crate) fn database_error() -> AppError {
    AppError::Database("an internal error occurred".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status_matches_variant() {
        let response = error_response(&AppError::NotFound("member".to_string()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = error_response(&AppError::Conflict("code taken".to_string()));
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = error_response(&database_error());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
