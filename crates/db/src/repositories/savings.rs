//! Savings repository for member share-capital movements.
//!
//! Every deposit and withdrawal writes its savings record and its
//! journal posting in one database transaction. Balances are derived
//! from the movement history.

use chrono::{NaiveDate, Utc};
use kopra_core::ledger::{
    self, DocumentKind, EntryInput, LineInput, document_number, next_sequence,
};
use kopra_core::savings::{
    MemberSavings, SavingsDirection, SavingsType, validate_deposit, validate_withdrawal,
};
use kopra_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{members, savings_transactions, sea_orm_active_enums};
use crate::repositories::account::AccountRepository;
use crate::repositories::journal::{JournalError, JournalRepository};

/// Error types for savings operations.
#[derive(Debug, thiserror::Error)]
pub enum SavingsError {
    /// A savings business rule was violated.
    #[error(transparent)]
    Rule(#[from] kopra_core::savings::SavingsError),

    /// Member not found.
    #[error("Member not found: {0}")]
    MemberNotFound(Uuid),

    /// The chart is missing a required posting account.
    #[error("Required account '{0}' is missing from the chart")]
    MissingAccount(String),

    /// The ledger posting failed.
    #[error(transparent)]
    Posting(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a deposit or withdrawal.
#[derive(Debug, Clone)]
pub struct SavingsInput {
    /// The member the movement belongs to.
    pub member_id: Uuid,
    /// Savings type.
    pub savings_type: SavingsType,
    /// Movement amount.
    pub amount: Decimal,
    /// Value date of the movement.
    pub date: NaiveDate,
    /// Optional free-text note.
    pub note: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct TypeTotal {
    savings_type: sea_orm_active_enums::SavingsType,
    direction: sea_orm_active_enums::SavingsDirection,
    total: Option<Decimal>,
}

/// Savings repository for deposits, withdrawals, and derived balances.
#[derive(Debug, Clone)]
pub struct SavingsRepository {
    db: DatabaseConnection,
}

impl SavingsRepository {
    /// Creates a new savings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a deposit and posts it to the ledger atomically.
    ///
    /// Debits cash, credits the savings type's equity account.
    ///
    /// # Errors
    ///
    /// Returns [`SavingsError::Rule`] when the movement breaks a
    /// savings rule, or posting and database errors.
    pub async fn record_deposit(
        &self,
        cooperative_id: Uuid,
        created_by: Uuid,
        input: SavingsInput,
    ) -> Result<savings_transactions::Model, SavingsError> {
        let txn = self.db.begin().await?;

        let member = Self::load_member(&txn, cooperative_id, input.member_id).await?;
        let today = Utc::now().date_naive();
        validate_deposit(input.amount, input.date, today, member.active)?;

        let posting = ledger::deposit_lines(input.savings_type, input.amount);
        let model = Self::record_movement(
            &txn,
            cooperative_id,
            created_by,
            &member,
            &input,
            SavingsDirection::Deposit,
            &posting,
        )
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Records a withdrawal and posts it to the ledger atomically.
    ///
    /// Only voluntary savings can be withdrawn, and never below zero.
    /// Debits the equity account, credits cash.
    ///
    /// # Errors
    ///
    /// Returns [`SavingsError::Rule`] when the movement breaks a
    /// savings rule, or posting and database errors.
    pub async fn record_withdrawal(
        &self,
        cooperative_id: Uuid,
        created_by: Uuid,
        input: SavingsInput,
    ) -> Result<savings_transactions::Model, SavingsError> {
        let txn = self.db.begin().await?;

        let member = Self::load_member(&txn, cooperative_id, input.member_id).await?;
        let available =
            Self::balance_of_type(&txn, cooperative_id, input.member_id, input.savings_type)
                .await?;
        let today = Utc::now().date_naive();
        validate_withdrawal(
            input.savings_type,
            input.amount,
            available,
            input.date,
            today,
            member.active,
        )?;

        let posting = ledger::withdrawal_lines(input.savings_type, input.amount);
        let model = Self::record_movement(
            &txn,
            cooperative_id,
            created_by,
            &member,
            &input,
            SavingsDirection::Withdrawal,
            &posting,
        )
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Derives a member's savings balances from the movement history.
    ///
    /// # Errors
    ///
    /// Returns [`SavingsError::MemberNotFound`] for an unknown member.
    pub async fn member_savings(
        &self,
        cooperative_id: Uuid,
        member_id: Uuid,
    ) -> Result<MemberSavings, SavingsError> {
        let member = members::Entity::find_by_id(member_id)
            .filter(members::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?;
        if member.is_none() {
            return Err(SavingsError::MemberNotFound(member_id));
        }

        let rows = savings_transactions::Entity::find()
            .select_only()
            .column(savings_transactions::Column::SavingsType)
            .column(savings_transactions::Column::Direction)
            .column_as(savings_transactions::Column::Amount.sum(), "total")
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .filter(savings_transactions::Column::MemberId.eq(member_id))
            .group_by(savings_transactions::Column::SavingsType)
            .group_by(savings_transactions::Column::Direction)
            .into_model::<TypeTotal>()
            .all(&self.db)
            .await?;

        let mut savings = MemberSavings::default();
        for row in rows {
            savings.apply(
                row.savings_type.into(),
                row.direction.into(),
                row.total.unwrap_or(Decimal::ZERO),
            );
        }
        Ok(savings)
    }

    /// Derives tenant-wide savings totals per type across all members.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn savings_summary(
        &self,
        cooperative_id: Uuid,
    ) -> Result<MemberSavings, SavingsError> {
        let rows = savings_transactions::Entity::find()
            .select_only()
            .column(savings_transactions::Column::SavingsType)
            .column(savings_transactions::Column::Direction)
            .column_as(savings_transactions::Column::Amount.sum(), "total")
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .group_by(savings_transactions::Column::SavingsType)
            .group_by(savings_transactions::Column::Direction)
            .into_model::<TypeTotal>()
            .all(&self.db)
            .await?;

        let mut summary = MemberSavings::default();
        for row in rows {
            summary.apply(
                row.savings_type.into(),
                row.direction.into(),
                row.total.unwrap_or(Decimal::ZERO),
            );
        }
        Ok(summary)
    }

    /// Lists a member's movements newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transactions(
        &self,
        cooperative_id: Uuid,
        member_id: Uuid,
        savings_type: Option<SavingsType>,
        page: PageRequest,
    ) -> Result<PageResponse<savings_transactions::Model>, SavingsError> {
        let page = page.clamped();

        let mut query = savings_transactions::Entity::find()
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .filter(savings_transactions::Column::MemberId.eq(member_id));
        if let Some(savings_type) = savings_type {
            query = query.filter(
                savings_transactions::Column::SavingsType
                    .eq(sea_orm_active_enums::SavingsType::from(savings_type)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(savings_transactions::Column::TransactionDate)
            .order_by_desc(savings_transactions::Column::ReferenceNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn load_member(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        member_id: Uuid,
    ) -> Result<members::Model, SavingsError> {
        members::Entity::find_by_id(member_id)
            .filter(members::Column::CooperativeId.eq(cooperative_id))
            .one(txn)
            .await?
            .ok_or(SavingsError::MemberNotFound(member_id))
    }

    /// Sums deposits minus withdrawals for one member and type.
    async fn balance_of_type(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        member_id: Uuid,
        savings_type: SavingsType,
    ) -> Result<Decimal, SavingsError> {
        let rows = savings_transactions::Entity::find()
            .select_only()
            .column(savings_transactions::Column::SavingsType)
            .column(savings_transactions::Column::Direction)
            .column_as(savings_transactions::Column::Amount.sum(), "total")
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .filter(savings_transactions::Column::MemberId.eq(member_id))
            .filter(
                savings_transactions::Column::SavingsType
                    .eq(sea_orm_active_enums::SavingsType::from(savings_type)),
            )
            .group_by(savings_transactions::Column::SavingsType)
            .group_by(savings_transactions::Column::Direction)
            .into_model::<TypeTotal>()
            .all(txn)
            .await?;

        let mut balance = Decimal::ZERO;
        for row in rows {
            let amount = row.total.unwrap_or(Decimal::ZERO);
            match row.direction.into() {
                SavingsDirection::Deposit => balance += amount,
                SavingsDirection::Withdrawal => balance -= amount,
            }
        }
        Ok(balance)
    }

    /// Writes the savings record and its posting within the caller's
    /// transaction.
    #[allow(clippy::too_many_arguments)]
    async fn record_movement(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        created_by: Uuid,
        member: &members::Model,
        input: &SavingsInput,
        direction: SavingsDirection,
        posting: &[ledger::PostingLine],
    ) -> Result<savings_transactions::Model, SavingsError> {
        let reference_number =
            Self::next_reference(txn, cooperative_id, input.date).await?;

        let verb = match direction {
            SavingsDirection::Deposit => "deposit",
            SavingsDirection::Withdrawal => "withdrawal",
        };
        let description = format!(
            "Savings {verb} {} ({}) {}",
            member.member_number,
            input.savings_type.as_str(),
            reference_number
        );

        let lines = Self::resolve_posting(txn, cooperative_id, posting).await?;
        let entry = JournalRepository::post_on(
            txn,
            cooperative_id,
            Some(created_by),
            EntryInput {
                date: input.date,
                description,
                reference: Some(reference_number.clone()),
                lines,
            },
            ledger::EntrySource::Savings,
            None,
        )
        .await?;

        let model = savings_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            cooperative_id: Set(cooperative_id),
            member_id: Set(member.id),
            reference_number: Set(reference_number),
            savings_type: Set(input.savings_type.into()),
            direction: Set(direction.into()),
            amount: Set(input.amount),
            transaction_date: Set(input.date),
            note: Set(input.note.clone()),
            journal_entry_id: Set(entry.entry.id),
            created_by: Set(Some(created_by)),
            created_at: Set(Utc::now().into()),
        };

        Ok(model.insert(txn).await?)
    }

    /// Maps account codes from a posting template to account ids.
    async fn resolve_posting(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        posting: &[ledger::PostingLine],
    ) -> Result<Vec<LineInput>, SavingsError> {
        let mut lines = Vec::with_capacity(posting.len());
        for p in posting {
            let account = AccountRepository::find_by_code_on(txn, cooperative_id, p.account_code)
                .await?
                .ok_or_else(|| SavingsError::MissingAccount(p.account_code.to_owned()))?;
            lines.push(LineInput {
                account_id: account.id,
                debit: p.debit,
                credit: p.credit,
                memo: None,
            });
        }
        Ok(lines)
    }

    /// Produces the next `SMP` reference for the day under an
    /// exclusive lock.
    async fn next_reference(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        date: NaiveDate,
    ) -> Result<String, DbErr> {
        let kind = DocumentKind::Savings;
        let prefix = format!("{}-{}-", kind.prefix(), date.format("%Y%m%d"));
        let last = savings_transactions::Entity::find()
            .filter(savings_transactions::Column::CooperativeId.eq(cooperative_id))
            .filter(savings_transactions::Column::ReferenceNumber.starts_with(&prefix))
            .order_by_desc(savings_transactions::Column::ReferenceNumber)
            .lock_exclusive()
            .one(txn)
            .await?;

        let seq = next_sequence(last.as_ref().map(|m| m.reference_number.as_str()));
        Ok(document_number(kind, date, seq))
    }
}
