//! Point-of-sale math and validation for the member store.

pub mod service;
pub mod types;

pub use service::{PosError, compute_totals, validate_payment, validate_sale};
pub use types::{PricedItem, SaleItemInput, SaleTotals};
