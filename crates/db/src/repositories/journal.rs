//! Journal repository for double-entry postings.
//!
//! Entries post at creation and never change afterwards. The only way
//! to undo one is a reversing entry, written in the same transaction
//! that marks the original as reversed.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use kopra_core::ledger::{
    self, AccountInfo, DocumentKind, EntryInput, LedgerError, LineSnapshot, document_number,
    next_sequence, resolve_accounts, reversal_description, reversing_lines, validate_entry,
};
use kopra_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    accounts, journal_entries, journal_lines,
    sea_orm_active_enums::{EntrySource, EntryStatus},
};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// A ledger business rule was violated.
    #[error(transparent)]
    Rule(#[from] LedgerError),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A journal entry with its lines.
#[derive(Debug, Clone)]
pub struct JournalEntryWithLines {
    /// The entry header.
    pub entry: journal_entries::Model,
    /// The balanced lines.
    pub lines: Vec<journal_lines::Model>,
}

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Earliest entry date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest entry date, inclusive.
    pub to: Option<NaiveDate>,
    /// Restrict to one source.
    pub source: Option<ledger::EntrySource>,
}

/// Journal repository for posting and reading entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and posts a manual journal entry.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Rule`] when the entry breaks a ledger
    /// rule, or a database error.
    pub async fn create_entry(
        &self,
        cooperative_id: Uuid,
        created_by: Uuid,
        input: EntryInput,
    ) -> Result<JournalEntryWithLines, JournalError> {
        let txn = self.db.begin().await?;
        let posted = Self::post_on(
            &txn,
            cooperative_id,
            Some(created_by),
            input,
            ledger::EntrySource::Manual,
            None,
        )
        .await?;
        txn.commit().await?;
        Ok(posted)
    }

    /// Validates and posts an entry inside an existing transaction.
    ///
    /// Savings and sale repositories call this so the business record
    /// and its posting commit or roll back together.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Rule`] when the entry breaks a ledger
    /// rule, or a database error.
    pub async fn post_on(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        created_by: Option<Uuid>,
        input: EntryInput,
        source: ledger::EntrySource,
        reverses_entry_id: Option<Uuid>,
    ) -> Result<JournalEntryWithLines, JournalError> {
        let today = Utc::now().date_naive();
        validate_entry(&input, today)?;

        let account_map = Self::load_accounts(txn, cooperative_id, &input).await?;
        resolve_accounts(&input.lines, |id| {
            account_map
                .get(&id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(id))
        })?;

        let journal_number =
            Self::next_number(txn, cooperative_id, DocumentKind::Journal, input.date).await?;

        let entry_id = Uuid::new_v4();
        let entry = journal_entries::ActiveModel {
            id: Set(entry_id),
            cooperative_id: Set(cooperative_id),
            journal_number: Set(journal_number),
            entry_date: Set(input.date),
            description: Set(input.description),
            reference: Set(input.reference),
            source: Set(source.into()),
            status: Set(EntryStatus::Posted),
            reverses_entry_id: Set(reverses_entry_id),
            reversed_by_entry_id: Set(None),
            created_by: Set(created_by),
            created_at: Set(Utc::now().into()),
        };
        let entry = entry.insert(txn).await?;

        let line_models: Vec<journal_lines::ActiveModel> = input
            .lines
            .iter()
            .map(|line| journal_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                journal_entry_id: Set(entry_id),
                account_id: Set(line.account_id),
                debit: Set(line.debit),
                credit: Set(line.credit),
                memo: Set(line.memo.clone()),
            })
            .collect();
        journal_lines::Entity::insert_many(line_models).exec(txn).await?;

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(entry_id))
            .all(txn)
            .await?;

        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Fetches an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::EntryNotFound`] when the id does not
    /// exist under this cooperative.
    pub async fn get_entry(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
    ) -> Result<JournalEntryWithLines, JournalError> {
        let entry = journal_entries::Entity::find_by_id(id)
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id))
            .one(&self.db)
            .await?
            .ok_or(JournalError::EntryNotFound(id))?;

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(id))
            .all(&self.db)
            .await?;

        Ok(JournalEntryWithLines { entry, lines })
    }

    /// Lists entries newest first, with date and source filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        cooperative_id: Uuid,
        filter: JournalFilter,
        page: PageRequest,
    ) -> Result<PageResponse<journal_entries::Model>, JournalError> {
        let page = page.clamped();

        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id));

        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        if let Some(source) = filter.source {
            query = query.filter(journal_entries::Column::Source.eq(EntrySource::from(source)));
        }

        let total = query.clone().count(&self.db).await?;
        let data = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::JournalNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Rejects an update attempt against a posted entry.
    ///
    /// Entries post at creation, so every existing entry is immutable.
    /// The lookup still runs so a missing id reports not-found rather
    /// than immutability.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyPosted`] for any existing entry.
    pub async fn update_entry(&self, cooperative_id: Uuid, id: Uuid) -> Result<(), JournalError> {
        let _ = self.get_entry(cooperative_id, id).await?;
        Err(LedgerError::AlreadyPosted.into())
    }

    /// Rejects a delete attempt against a posted entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyPosted`] for any existing entry.
    pub async fn delete_entry(&self, cooperative_id: Uuid, id: Uuid) -> Result<(), JournalError> {
        let _ = self.get_entry(cooperative_id, id).await?;
        Err(LedgerError::AlreadyPosted.into())
    }

    /// Posts a reversing entry and marks the original as reversed.
    ///
    /// The reversal swaps every line's sides, posts under today's date,
    /// and links both entries. Reversing an already reversed entry is
    /// refused; reversing a reversal is allowed and nets to zero.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyReversed`] when the entry was
    /// already neutralized.
    pub async fn reverse_entry(
        &self,
        cooperative_id: Uuid,
        id: Uuid,
        reason: &str,
        created_by: Uuid,
    ) -> Result<JournalEntryWithLines, JournalError> {
        let txn = self.db.begin().await?;

        let original = journal_entries::Entity::find_by_id(id)
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(JournalError::EntryNotFound(id))?;

        if original.status == EntryStatus::Reversed {
            return Err(LedgerError::AlreadyReversed.into());
        }

        let original_lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.eq(id))
            .all(&txn)
            .await?;

        let snapshots: Vec<LineSnapshot> = original_lines
            .iter()
            .map(|l| LineSnapshot {
                account_id: l.account_id,
                debit: l.debit,
                credit: l.credit,
                memo: l.memo.clone(),
            })
            .collect();

        let input = EntryInput {
            date: Utc::now().date_naive(),
            description: reversal_description(&original.journal_number, reason),
            reference: Some(original.journal_number.clone()),
            lines: reversing_lines(&snapshots),
        };

        let reversal = Self::post_on(
            &txn,
            cooperative_id,
            Some(created_by),
            input,
            ledger::EntrySource::Reversal,
            Some(id),
        )
        .await?;

        let mut original: journal_entries::ActiveModel = original.into();
        original.status = Set(EntryStatus::Reversed);
        original.reversed_by_entry_id = Set(Some(reversal.entry.id));
        original.update(&txn).await?;

        txn.commit().await?;
        Ok(reversal)
    }

    /// Produces the next document number for a kind and date, holding
    /// an exclusive lock on the day's latest row so two writers cannot
    /// take the same sequence.
    pub(crate) async fn next_number(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        kind: DocumentKind,
        date: NaiveDate,
    ) -> Result<String, DbErr> {
        let prefix = format!("{}-{}-", kind.prefix(), date.format("%Y%m%d"));
        let last = journal_entries::Entity::find()
            .filter(journal_entries::Column::CooperativeId.eq(cooperative_id))
            .filter(journal_entries::Column::JournalNumber.starts_with(&prefix))
            .order_by_desc(journal_entries::Column::JournalNumber)
            .lock_exclusive()
            .one(txn)
            .await?;

        let seq = next_sequence(last.as_ref().map(|m| m.journal_number.as_str()));
        Ok(document_number(kind, date, seq))
    }

    /// Loads and maps every account the entry lines reference.
    async fn load_accounts(
        txn: &DatabaseTransaction,
        cooperative_id: Uuid,
        input: &EntryInput,
    ) -> Result<HashMap<Uuid, AccountInfo>, DbErr> {
        let ids: Vec<Uuid> = input.lines.iter().map(|l| l.account_id).collect();
        let rows = accounts::Entity::find()
            .filter(accounts::Column::CooperativeId.eq(cooperative_id))
            .filter(accounts::Column::Id.is_in(ids))
            .all(txn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|a| {
                (
                    a.id,
                    AccountInfo {
                        id: a.id,
                        code: a.code,
                        account_type: a.account_type.into(),
                        active: a.active,
                    },
                )
            })
            .collect())
    }
}
