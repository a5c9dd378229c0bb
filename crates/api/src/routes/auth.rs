//! Authentication routes: registration and logins.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use tracing::{error, info};

use crate::AppState;
use crate::routes::{database_error, error_response};
use kopra_db::entities::{cooperatives, members};
use kopra_db::repositories::cooperative::{
    CooperativeError, CooperativeRepository, RegisterCooperativeInput,
};
use kopra_db::repositories::member::{MemberError, MemberRepository};
use kopra_db::repositories::user::{UserError, UserRepository};
use kopra_shared::{
    AppError, LoginRequest, LoginResponse, MemberLoginRequest, RegisterCooperativeRequest, Role,
    UserInfo,
};

/// Creates the authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/member-login", post(member_login))
}

/// Response for cooperative registration.
#[derive(Debug, Serialize)]
struct RegisterResponse {
    /// The created cooperative.
    cooperative: cooperatives::Model,
    /// The first admin user.
    user: UserInfo,
    /// Access token for the admin.
    access_token: String,
    /// Token expiration in seconds.
    expires_in: i64,
}

/// Response for member-portal login.
#[derive(Debug, Serialize)]
struct MemberLoginResponse {
    /// Access token scoped to the member portal.
    access_token: String,
    /// Token expiration in seconds.
    expires_in: i64,
    /// The authenticated member.
    member: members::Model,
}

/// POST `/auth/register` - Bootstrap a cooperative with its first admin.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterCooperativeRequest>,
) -> impl IntoResponse {
    if payload.admin_password.len() < 8 {
        return error_response(&AppError::Validation(
            "admin password must be at least 8 characters".to_string(),
        ));
    }

    let repo = CooperativeRepository::new((*state.db).clone());
    let input = RegisterCooperativeInput {
        name: payload.name,
        address: payload.address,
        phone: payload.phone,
        email: payload.email,
        admin_username: payload.admin_username,
        admin_password: payload.admin_password,
        admin_name: payload.admin_name,
    };

    match repo.register(input).await {
        Ok((cooperative, admin)) => {
            let token = match state
                .jwt_service
                .generate_staff_token(admin.id, cooperative.id, Role::Admin)
            {
                Ok(token) => token,
                Err(e) => {
                    error!(error = %e, "Failed to issue token after registration");
                    return error_response(&AppError::Internal(
                        "an internal error occurred".to_string(),
                    ));
                }
            };

            info!(cooperative_id = %cooperative.id, "Cooperative registered");

            (
                StatusCode::CREATED,
                Json(RegisterResponse {
                    user: UserInfo {
                        id: admin.id,
                        username: admin.username,
                        name: admin.name,
                        role: admin.role.into(),
                        cooperative_id: cooperative.id,
                    },
                    cooperative,
                    access_token: token,
                    expires_in: state.jwt_service.access_token_expires_in(),
                }),
            )
                .into_response()
        }
        Err(CooperativeError::Admin(UserError::DuplicateUsername(username))) => error_response(
            &AppError::Conflict(format!("username {username} is already taken")),
        ),
        Err(e) => {
            error!(error = %e, "Failed to register cooperative");
            error_response(&database_error())
        }
    }
}

/// POST `/auth/login` - Staff login with username and password.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.verify_credentials(&payload.username, &payload.password).await {
        Ok(user) => {
            let role: Role = user.role.into();
            let token = match state
                .jwt_service
                .generate_staff_token(user.id, user.cooperative_id, role)
            {
                Ok(token) => token,
                Err(e) => {
                    error!(error = %e, "Failed to issue staff token");
                    return error_response(&AppError::Internal(
                        "an internal error occurred".to_string(),
                    ));
                }
            };

            Json(LoginResponse {
                access_token: token,
                expires_in: state.jwt_service.access_token_expires_in(),
                user: UserInfo {
                    id: user.id,
                    username: user.username,
                    name: user.name,
                    role,
                    cooperative_id: user.cooperative_id,
                },
            })
            .into_response()
        }
        Err(UserError::InvalidCredentials) => error_response(&AppError::Unauthorized(
            "invalid username or password".to_string(),
        )),
        Err(e) => {
            error!(error = %e, "Failed to verify staff credentials");
            error_response(&database_error())
        }
    }
}

/// POST `/auth/member-login` - Member-portal login with member number and PIN.
async fn member_login(
    State(state): State<AppState>,
    Json(payload): Json<MemberLoginRequest>,
) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    match repo
        .verify_pin(payload.cooperative_id, &payload.member_number, &payload.pin)
        .await
    {
        Ok(member) => {
            let token = match state
                .jwt_service
                .generate_member_token(member.id, member.cooperative_id)
            {
                Ok(token) => token,
                Err(e) => {
                    error!(error = %e, "Failed to issue member token");
                    return error_response(&AppError::Internal(
                        "an internal error occurred".to_string(),
                    ));
                }
            };

            Json(MemberLoginResponse {
                access_token: token,
                expires_in: state.jwt_service.access_token_expires_in(),
                member,
            })
            .into_response()
        }
        Err(MemberError::InvalidCredentials) => error_response(&AppError::Unauthorized(
            "invalid member number or PIN".to_string(),
        )),
        Err(e) => {
            error!(error = %e, "Failed to verify member PIN");
            error_response(&database_error())
        }
    }
}
