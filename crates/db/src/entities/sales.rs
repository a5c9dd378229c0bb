//! Sale header entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A completed POS sale. Created atomically with its items, the stock
/// decrements, and the journal posting.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning cooperative.
    pub cooperative_id: Uuid,
    /// `POS-YYYYMMDD-NNNN`, unique per cooperative.
    pub sale_number: String,
    /// Sale date.
    pub sale_date: Date,
    /// Cashier who rang it up.
    pub cashier_id: Uuid,
    /// Buying member, when known.
    pub member_id: Option<Uuid>,
    /// Sale total.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total: Decimal,
    /// Amount tendered.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub paid: Decimal,
    /// Change returned.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub change: Decimal,
    /// The ledger posting for this sale.
    pub journal_entry_id: Uuid,
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
    /// Items on the sale.
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
    /// The ledger posting.
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntry,
}

impl Related<super::cooperatives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cooperative.def()
    }
}

impl Related<super::sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
