//! Chart of accounts domain types.
//!
//! Account balances are never stored; everything downstream derives them
//! from posted journal lines, signed by the account's normal balance side.

pub mod default_chart;
pub mod types;

pub use default_chart::{DefaultAccount, default_chart};
pub use types::{AccountType, NormalBalance, signed_balance};
