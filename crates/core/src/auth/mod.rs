//! Authentication and authorization logic.
//!
//! This module provides:
//! - Password and portal-PIN hashing with Argon2id
//! - The role policy table mapping operations to allowed roles

mod password;
pub mod policy;

pub use password::{PasswordError, hash_password, verify_password};
pub use policy::{AuthzError, Operation, authorize};
