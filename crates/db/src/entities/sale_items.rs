//! Sale line entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One line of a sale. Name and prices are captured at sale time so
/// later product edits never change recorded sales.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_items")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning sale.
    pub sale_id: Uuid,
    /// Product sold.
    pub product_id: Uuid,
    /// Product name at sale time.
    pub product_name: String,
    /// Units sold.
    pub quantity: i32,
    /// Selling price per unit at sale time.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub unit_price: Decimal,
    /// Cost per unit at sale time.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub unit_cost: Decimal,
    /// Line subtotal.
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub subtotal: Decimal,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning sale.
    #[sea_orm(
        belongs_to = "super::sales::Entity",
        from = "Column::SaleId",
        to = "super::sales::Column::Id"
    )]
    Sale,
    /// Product sold.
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Product,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
