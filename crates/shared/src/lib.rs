//! Shared types, errors, and configuration for Kopra.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types with HTTP mappings
//! - JWT claims, token service, and the staff role enum
//! - Pagination types for list endpoints
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{
    Claims, LoginRequest, LoginResponse, MemberLoginRequest, RegisterCooperativeRequest, Role,
    TokenScope, UserInfo,
};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{PageMeta, PageRequest, PageResponse};
