//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use kopra_core::auth::policy::{Operation, authorize};
use kopra_shared::{Claims, TokenScope};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (status, error, message) = match e {
                kopra_shared::JwtError::Expired => (
                    StatusCode::UNAUTHORIZED,
                    "token_expired",
                    "Token has expired",
                ),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    "invalid_token",
                    "Invalid or malformed token",
                ),
            };

            (status, Json(json!({ "error": error, "message": message }))).into_response()
        }
    }
}

/// Extractor for authenticated claims.
///
/// Use this in handlers to identify the caller and check the role policy:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     if let Err(response) = auth.require(Operation::ViewJournal) {
///         return response;
///     }
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the subject id (staff user or portal member).
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.0.subject_id()
    }

    /// Returns the cooperative (tenant) id.
    #[must_use]
    pub fn cooperative_id(&self) -> Uuid {
        self.0.cooperative_id()
    }

    /// Returns the inner claims.
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    /// Checks the caller against the role policy table.
    ///
    /// Member-portal tokens carry no staff role and are refused here;
    /// they can only reach the portal routes.
    ///
    /// # Errors
    ///
    /// Returns a `403` response when the caller may not perform the
    /// operation.
    pub fn require(&self, operation: Operation) -> Result<(), Response> {
        let role = match (self.0.scope, self.0.role) {
            (TokenScope::Staff, Some(role)) => role,
            _ => return Err(forbidden()),
        };

        authorize(role, operation).map_err(|_| forbidden())
    }

    /// Checks that the caller holds any staff token.
    ///
    /// # Errors
    ///
    /// Returns a `403` response for member-portal tokens.
    pub fn require_staff(&self) -> Result<(), Response> {
        match (self.0.scope, self.0.role) {
            (TokenScope::Staff, Some(_)) => Ok(()),
            _ => Err(forbidden()),
        }
    }

    /// Returns the member id for a portal token.
    ///
    /// # Errors
    ///
    /// Returns a `403` response for staff tokens.
    pub fn portal_member_id(&self) -> Result<Uuid, Response> {
        if self.0.scope == TokenScope::MemberPortal {
            Ok(self.0.subject_id())
        } else {
            Err(forbidden())
        }
    }
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": "You do not have permission to perform this action"
        })),
    )
        .into_response()
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kopra_shared::Role;

    fn staff(role: Role) -> AuthUser {
        AuthUser(Claims::staff(
            Uuid::new_v4(),
            Uuid::new_v4(),
            role,
            Utc::now() + chrono::Duration::hours(1),
        ))
    }

    fn portal() -> AuthUser {
        AuthUser(Claims::member_portal(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() + chrono::Duration::hours(1),
        ))
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_staff_role_policy_applies() {
        assert!(staff(Role::Admin).require(Operation::ManageUsers).is_ok());
        assert!(staff(Role::Cashier).require(Operation::ProcessSale).is_ok());
        assert!(staff(Role::Cashier).require(Operation::PostJournal).is_err());
    }

    #[test]
    fn test_portal_token_never_passes_staff_checks() {
        assert!(portal().require(Operation::ViewSavings).is_err());
        assert!(portal().require(Operation::ViewMembers).is_err());
    }

    #[test]
    fn test_portal_member_id_requires_portal_scope() {
        assert!(portal().portal_member_id().is_ok());
        assert!(staff(Role::Admin).portal_member_id().is_err());
    }
}
