//! Savings transaction entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{SavingsDirection, SavingsType};

/// One savings movement. Always created in the same database transaction
/// as its journal entry; `journal_entry_id` is therefore never null.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "savings_transactions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning cooperative.
    pub cooperative_id: Uuid,
    /// The member whose savings moved.
    pub member_id: Uuid,
    /// `SMP-YYYYMMDD-NNNN`, unique per cooperative.
    pub reference_number: String,
    /// Savings type.
    pub savings_type: SavingsType,
    /// Deposit or withdrawal.
    pub direction: SavingsDirection,
    /// Amount moved (always positive).
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub amount: Decimal,
    /// Transaction date.
    pub transaction_date: Date,
    /// Free-form note.
    pub note: Option<String>,
    /// The ledger posting for this movement.
    pub journal_entry_id: Uuid,
    /// Staff user who recorded it.
    pub created_by: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The member.
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id"
    )]
    Member,
    /// The ledger posting.
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntry,
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
