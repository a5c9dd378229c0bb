//! POS domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One requested sale line, as submitted by the cashier.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemInput {
    /// Product being sold.
    pub product_id: Uuid,
    /// Units requested.
    pub quantity: u32,
}

/// A sale line after the product has been looked up.
///
/// Prices are captured at sale time; later product edits must not change
/// recorded sales.
#[derive(Debug, Clone)]
pub struct PricedItem {
    /// Product id.
    pub product_id: Uuid,
    /// Product name, for error messages and the receipt.
    pub name: String,
    /// Units requested.
    pub quantity: u32,
    /// Selling price per unit at sale time.
    pub unit_price: Decimal,
    /// Cost price per unit at sale time.
    pub unit_cost: Decimal,
    /// Stock on hand when the sale was priced.
    pub available_stock: i64,
}

impl PricedItem {
    /// Line subtotal (quantity x unit price).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// Line cost (quantity x unit cost).
    #[must_use]
    pub fn line_cost(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_cost
    }
}

/// Monetary totals of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleTotals {
    /// Sum of line subtotals.
    pub total: Decimal,
    /// Sum of line costs; drives the COGS posting leg.
    pub cost_of_goods: Decimal,
}
