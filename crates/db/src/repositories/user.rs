//! User repository for staff accounts.

use chrono::Utc;
use kopra_core::auth::{PasswordError, hash_password, verify_password};
use kopra_shared::Role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Username already taken.
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Login credentials were wrong or the user is inactive.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a staff user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login username, unique across the system.
    pub username: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Staff role.
    pub role: Role,
}

/// User repository for staff account management and login checks.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a staff user with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::DuplicateUsername`] when the username is
    /// taken, or a hashing or database error.
    pub async fn create_user(
        &self,
        cooperative_id: Uuid,
        input: CreateUserInput,
    ) -> Result<users::Model, UserError> {
        Self::create_user_on(&self.db, cooperative_id, input).await
    }

    /// Creates a staff user inside an existing connection or
    /// transaction. Used by cooperative registration.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::DuplicateUsername`] when the username is
    /// taken, or a hashing or database error.
    pub async fn create_user_on<C: ConnectionTrait>(
        conn: &C,
        cooperative_id: Uuid,
        input: CreateUserInput,
    ) -> Result<users::Model, UserError> {
        let existing = users::Entity::find()
            .filter(users::Column::Username.eq(&input.username))
            .one(conn)
            .await?;
        if existing.is_some() {
            return Err(UserError::DuplicateUsername(input.username));
        }

        let password_hash = hash_password(&input.password)?;
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            cooperative_id: Set(cooperative_id),
            username: Set(input.username),
            password_hash: Set(password_hash),
            name: Set(input.name),
            role: Set(input.role.into()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(conn).await?)
    }

    /// Lists the cooperative's staff users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_users(&self, cooperative_id: Uuid) -> Result<Vec<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::CooperativeId.eq(cooperative_id))
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await?)
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::UserNotFound`] for an unknown id.
    pub async fn find_user(&self, id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::UserNotFound(id))
    }

    /// Verifies staff credentials and returns the user on success.
    ///
    /// A wrong username, an inactive user, and a wrong password all
    /// report the same error.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::InvalidCredentials`] unless everything
    /// checks out.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<users::Model, UserError> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !user.active {
            return Err(UserError::InvalidCredentials);
        }
        if !verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }
}
