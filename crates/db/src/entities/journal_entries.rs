//! Journal entry header entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntrySource, EntryStatus};

/// A posted journal entry. Immutable once stored; the only state change
/// allowed is `posted -> reversed`, recorded together with the link to
/// the reversing entry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning cooperative.
    pub cooperative_id: Uuid,
    /// `JRN-YYYYMMDD-NNNN`, unique per cooperative.
    pub journal_number: String,
    /// Entry date.
    pub entry_date: Date,
    /// What the entry records.
    pub description: String,
    /// External reference (savings ref, sale number, receipt).
    pub reference: Option<String>,
    /// Where the entry came from.
    pub source: EntrySource,
    /// Lifecycle state.
    pub status: EntryStatus,
    /// For reversal entries: the entry this one reverses.
    pub reverses_entry_id: Option<Uuid>,
    /// For reversed entries: the reversal that neutralized this one.
    pub reversed_by_entry_id: Option<Uuid>,
    /// Staff user who created the entry.
    pub created_by: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning cooperative.
    #[sea_orm(
        belongs_to = "super::cooperatives::Entity",
        from = "Column::CooperativeId",
        to = "super::cooperatives::Column::Id"
    )]
    Cooperative,
    /// Lines of this entry.
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::cooperatives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cooperative.def()
    }
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
