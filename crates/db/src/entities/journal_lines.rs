//! Journal line entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One line of a journal entry. Exactly one of `debit`/`credit` is
/// non-zero; the database check mirrors the core validation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_lines")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning journal entry.
    pub journal_entry_id: Uuid,
    /// Account posted to.
    pub account_id: Uuid,
    /// Debit amount.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub debit: Decimal,
    /// Credit amount.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub credit: Decimal,
    /// Optional line memo.
    pub memo: Option<String>,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning journal entry.
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntry,
    /// The account posted to.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
