//! Product catalog entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A product in the member store.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning cooperative.
    pub cooperative_id: Uuid,
    /// Barcode/SKU; unique per cooperative when present.
    pub barcode: Option<String>,
    /// Product name.
    pub name: String,
    /// Selling price per unit.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub selling_price: Decimal,
    /// Cost price per unit; drives the COGS posting.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub cost_price: Decimal,
    /// Units on hand. Never negative; decrements are guarded.
    pub stock: i64,
    /// Stock level at or below which the product is flagged.
    pub low_stock_threshold: i64,
    /// Whether the product is sellable.
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
    /// Sale lines referencing this product.
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
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

impl ActiveModelBehavior for ActiveModel {}
