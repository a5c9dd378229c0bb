//! Share-capital savings rules.
//!
//! Members hold three kinds of savings, each mapped to its own equity
//! account. Balances are derived from the savings transaction history,
//! never stored.

pub mod types;
pub mod validation;

pub use types::{MemberSavings, SavingsDirection, SavingsType};
pub use validation::{SavingsError, validate_deposit, validate_withdrawal};
