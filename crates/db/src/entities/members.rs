//! Cooperative member entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A member of the cooperative. Savings belong to members; sales may
/// reference one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning cooperative.
    pub cooperative_id: Uuid,
    /// Member number (`AGT-0001`), unique per cooperative.
    pub member_number: String,
    /// Full name.
    pub name: String,
    /// National id number, if recorded.
    pub national_id: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Address.
    pub address: Option<String>,
    /// Date the member joined.
    pub join_date: Date,
    /// Portal PIN hash; absent until the member sets one.
    #[serde(skip_serializing)]
    pub pin_hash: Option<String>,
    /// Whether the member is active.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
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
    /// Savings transactions of this member.
    #[sea_orm(has_many = "super::savings_transactions::Entity")]
    SavingsTransactions,
}

impl Related<super::cooperatives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cooperative.def()
    }
}

impl Related<super::savings_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SavingsTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
