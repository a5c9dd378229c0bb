//! Account repository for chart of accounts operations.

use chrono::NaiveDate;
use kopra_core::coa::{self, default_chart, signed_balance};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, journal_entries, journal_lines, sea_orm_active_enums::AccountType};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists in the cooperative.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Cannot deactivate an account that has journal lines.
    #[error("Account has {0} journal lines and cannot be deactivated")]
    AccountInUse(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code, unique within the cooperative.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account class.
    pub account_type: coa::AccountType,
}

/// Input for updating an account. Code and class are immutable.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New account name.
    pub name: Option<String>,
    /// New active flag.
    pub active: Option<bool>,
}

/// Account with its derived balance.
#[derive(Debug, Clone)]
pub struct AccountWithBalance {
    /// The account record.
    pub account: accounts::Model,
    /// Balance derived from posted journal lines.
    pub balance: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct LineTotals {
    total_debit: Option<Decimal>,
    total_credit: Option<Decimal>,
}

/// Account repository for chart of accounts CRUD.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with a unique code within the cooperative.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::DuplicateCode`] when the code is taken.
    pub async fn create_account(
        &self,
        cooperative_id: Uuid,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            cooperative_id: Set(cooperative_id),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Lists the cooperative's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        cooperative_id: Uuid,
        account_type: Option<coa::AccountType>,
        active: Option<bool>,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .order_by_asc(accounts::Column::Code);

        if let Some(account_type) = account_type {
            query = query.filter(accounts::Column::AccountType.eq(AccountType::from(account_type)));
        }
        if let Some(active) = active {
            query = query.filter(accounts::Column::Active.eq(active));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds an account with its derived balance, optionally bounded
    /// to entries dated on or before `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AccountNotFound`] when the id does not
    /// exist under this cooperative.
    pub async fn find_account(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
        as_of: Option<NaiveDate>,
    ) -> Result<AccountWithBalance, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let balance = self.derived_balance(&account, as_of).await?;
        Ok(AccountWithBalance { account, balance })
    }

    /// Updates an account's name or active flag.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AccountNotFound`] when the id does not
    /// exist under this cooperative.
    pub async fn update_account(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(flag) = input.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deactivates an account that has never been posted to.
    ///
    /// Accounts with journal lines stay in the chart so history keeps
    /// resolving; they can only be deactivated through
    /// [`Self::update_account`] once that is intended.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AccountInUse`] when lines reference it.
    pub async fn deactivate_account(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
    ) -> Result<(), AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let line_count = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(id))
            .count(&self.db)
            .await?;
        if line_count > 0 {
            return Err(AccountError::AccountInUse(line_count));
        }

        let mut active: accounts::ActiveModel = account.into();
        active.active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Seeds the default chart of accounts if the cooperative has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn seed_default_chart(&self, cooperative_id: Uuid) -> Result<u64, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        Self::seed_chart_on(&self.db, cooperative_id).await?;
        Ok(default_chart().len() as u64)
    }

    /// Inserts the default chart inside an existing connection or
    /// transaction. Used by cooperative registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn seed_chart_on<C: ConnectionTrait>(
        conn: &C,
        cooperative_id: Uuid,
    ) -> Result<(), DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let rows = default_chart().into_iter().map(|d| accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            cooperative_id: Set(cooperative_id),
            code: Set(d.code.to_owned()),
            name: Set(d.name.to_owned()),
            account_type: Set(d.account_type.into()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        });

        accounts::Entity::insert_many(rows).exec(conn).await?;
        Ok(())
    }

    /// Resolves a well-known account code inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns `None` when the chart is missing the code.
    pub async fn find_by_code_on(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        code: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .filter(accounts::Column::Code.eq(code))
            .one(txn)
            .await
    }

    /// Sums posted lines and signs the total by the normal balance side.
    async fn derived_balance(
        &self,
        account: &accounts::Model,
        as_of: Option<NaiveDate>,
    ) -> Result<Decimal, AccountError> {
        let mut query = journal_lines::Entity::find()
            .select_only()
            .column_as(journal_lines::Column::Debit.sum(), "total_debit")
            .column_as(journal_lines::Column::Credit.sum(), "total_credit")
            .filter(journal_lines::Column::AccountId.eq(account.id));
        if let Some(as_of) = as_of {
            query = query
                .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
                .filter(journal_entries::Column::EntryDate.lte(as_of));
        }
        let totals = query.into_model::<LineTotals>().one(&self.db).await?;

        let (debit, credit) = totals.map_or((Decimal::ZERO, Decimal::ZERO), |t| {
            (
                t.total_debit.unwrap_or(Decimal::ZERO),
                t.total_credit.unwrap_or(Decimal::ZERO),
            )
        });

        let account_type: coa::AccountType = account.account_type.into();
        Ok(signed_balance(
            account_type.normal_balance(),
            debit,
            credit,
        ))
    }
}
