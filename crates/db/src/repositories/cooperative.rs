//! Cooperative repository for tenant registration.

use chrono::Utc;
use kopra_shared::Role;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{cooperatives, users};
use crate::repositories::account::AccountRepository;
use crate::repositories::user::{CreateUserInput, UserError, UserRepository};

/// Error types for cooperative operations.
#[derive(Debug, thiserror::Error)]
pub enum CooperativeError {
    /// Cooperative not found.
    #[error("Cooperative not found: {0}")]
    CooperativeNotFound(Uuid),

    /// Creating the first admin user failed.
    #[error(transparent)]
    Admin(#[from] UserError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a cooperative.
#[derive(Debug, Clone)]
pub struct RegisterCooperativeInput {
    /// Cooperative name.
    pub name: String,
    /// Address.
    pub address: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// First admin's username.
    pub admin_username: String,
    /// First admin's password.
    pub admin_password: String,
    /// First admin's display name.
    pub admin_name: String,
}

/// Cooperative repository for tenant setup and lookup.
#[derive(Debug, Clone)]
pub struct CooperativeRepository {
    db: DatabaseConnection,
}

impl CooperativeRepository {
    /// Creates a new cooperative repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a cooperative: the tenant record, its first admin
    /// user, and the default chart of accounts, all in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::DuplicateUsername`] through
    /// [`CooperativeError::Admin`] when the admin username is taken.
    pub async fn register(
        &self,
        input: RegisterCooperativeInput,
    ) -> Result<(cooperatives::Model, users::Model), CooperativeError> {
        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let cooperative = cooperatives::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let cooperative = cooperative.insert(&txn).await?;

        let admin = UserRepository::create_user_on(
            &txn,
            cooperative.id,
            CreateUserInput {
                username: input.admin_username,
                password: input.admin_password,
                name: input.admin_name,
                role: Role::Admin,
            },
        )
        .await?;

        AccountRepository::seed_chart_on(&txn, cooperative.id).await?;

        txn.commit().await?;
        Ok((cooperative, admin))
    }

    /// Finds a cooperative by id.
    ///
    /// # Errors
    ///
    /// Returns [`CooperativeError::CooperativeNotFound`] for an
    /// unknown id.
    pub async fn find_cooperative(&self, id: Uuid) -> Result<cooperatives::Model, CooperativeError> {
        cooperatives::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CooperativeError::CooperativeNotFound(id))
    }
}
