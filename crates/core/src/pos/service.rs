//! Sale validation and totals.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{PricedItem, SaleTotals};
use crate::ledger::LedgerError;
use crate::ledger::validation::validate_amount;

/// Largest quantity a single sale line may carry.
pub const MAX_LINE_QUANTITY: u32 = 1_000_000;

/// Errors for POS operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PosError {
    /// A sale needs at least one item.
    #[error("Sale must contain at least one item")]
    EmptySale,

    /// Quantity is zero or above the cap.
    #[error("Invalid quantity {quantity} for {product}")]
    InvalidQuantity {
        /// Product name.
        product: String,
        /// Requested quantity.
        quantity: u32,
    },

    /// Not enough stock on hand.
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        /// Product name.
        product: String,
        /// Units on hand.
        available: i64,
        /// Units requested.
        requested: u32,
    },

    /// Payment does not cover the total.
    #[error("Insufficient payment: total {total}, paid {paid}")]
    InsufficientPayment {
        /// Sale total.
        total: Decimal,
        /// Amount tendered.
        paid: Decimal,
    },

    /// Amount failed the common ledger rules.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Sums line subtotals and costs.
#[must_use]
pub fn compute_totals(items: &[PricedItem]) -> SaleTotals {
    items.iter().fold(
        SaleTotals {
            total: Decimal::ZERO,
            cost_of_goods: Decimal::ZERO,
        },
        |acc, item| SaleTotals {
            total: acc.total + item.subtotal(),
            cost_of_goods: acc.cost_of_goods + item.line_cost(),
        },
    )
}

/// Validates the priced items of a sale and computes its totals.
///
/// Stock is checked against the snapshot taken at pricing time; the
/// repository re-checks with a guarded decrement when committing, so a
/// concurrent sale still cannot oversell.
///
/// # Errors
///
/// Returns the first [`PosError`] encountered.
pub fn validate_sale(items: &[PricedItem]) -> Result<SaleTotals, PosError> {
    if items.is_empty() {
        return Err(PosError::EmptySale);
    }

    for item in items {
        if item.quantity == 0 || item.quantity > MAX_LINE_QUANTITY {
            return Err(PosError::InvalidQuantity {
                product: item.name.clone(),
                quantity: item.quantity,
            });
        }
        if i64::from(item.quantity) > item.available_stock {
            return Err(PosError::InsufficientStock {
                product: item.name.clone(),
                available: item.available_stock,
                requested: item.quantity,
            });
        }
    }

    let totals = compute_totals(items);
    validate_amount(totals.total)?;
    Ok(totals)
}

/// Validates the tendered payment and computes the change.
///
/// # Errors
///
/// Rejects payments below the total.
pub fn validate_payment(total: Decimal, paid: Decimal) -> Result<Decimal, PosError> {
    if paid < total {
        return Err(PosError::InsufficientPayment { total, paid });
    }
    Ok(paid - total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn item(quantity: u32, price: Decimal, cost: Decimal, stock: i64) -> PricedItem {
        PricedItem {
            product_id: Uuid::new_v4(),
            name: "Rice 5kg".to_string(),
            quantity,
            unit_price: price,
            unit_cost: cost,
            available_stock: stock,
        }
    }

    #[test]
    fn test_totals() {
        // 2 x 65,000 at cost 55,000
        let items = vec![item(2, dec!(65_000), dec!(55_000), 10)];
        let totals = validate_sale(&items).unwrap();

        assert_eq!(totals.total, dec!(130_000));
        assert_eq!(totals.cost_of_goods, dec!(110_000));
    }

    #[test]
    fn test_empty_sale() {
        assert_eq!(validate_sale(&[]), Err(PosError::EmptySale));
    }

    #[test]
    fn test_zero_quantity() {
        let items = vec![item(0, dec!(1_000), dec!(800), 10)];
        assert!(matches!(
            validate_sale(&items),
            Err(PosError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_insufficient_stock() {
        let items = vec![item(5, dec!(1_000), dec!(800), 3)];
        assert_eq!(
            validate_sale(&items),
            Err(PosError::InsufficientStock {
                product: "Rice 5kg".to_string(),
                available: 3,
                requested: 5,
            })
        );
    }

    #[test]
    fn test_exact_stock_ok() {
        let items = vec![item(3, dec!(1_000), dec!(800), 3)];
        assert!(validate_sale(&items).is_ok());
    }

    #[test]
    fn test_payment_change() {
        assert_eq!(
            validate_payment(dec!(130_000), dec!(150_000)).unwrap(),
            dec!(20_000)
        );
    }

    #[test]
    fn test_payment_exact() {
        assert_eq!(
            validate_payment(dec!(130_000), dec!(130_000)).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_payment_short() {
        assert_eq!(
            validate_payment(dec!(130_000), dec!(100_000)),
            Err(PosError::InsufficientPayment {
                total: dec!(130_000),
                paid: dec!(100_000),
            })
        );
    }
}
