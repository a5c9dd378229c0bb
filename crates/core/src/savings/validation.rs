//! Savings transaction validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::SavingsType;
use crate::ledger::LedgerError;
use crate::ledger::validation::{validate_amount, validate_entry_date};

/// Errors for savings operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SavingsError {
    /// Amount or date failed the common ledger rules.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Principal and mandatory savings stay in until membership ends.
    #[error("{0} savings cannot be withdrawn")]
    WithdrawalNotAllowed(SavingsType),

    /// Withdrawal exceeds the member's balance for that type.
    #[error("Insufficient savings: available {available}, requested {requested}")]
    InsufficientSavings {
        /// Balance the member holds.
        available: Decimal,
        /// Amount asked for.
        requested: Decimal,
    },

    /// The member is deactivated.
    #[error("Member is inactive")]
    MemberInactive,
}

/// Validates a deposit request.
///
/// # Errors
///
/// Rejects inactive members and amounts/dates outside the ledger rules.
pub fn validate_deposit(
    amount: Decimal,
    date: NaiveDate,
    today: NaiveDate,
    member_active: bool,
) -> Result<(), SavingsError> {
    if !member_active {
        return Err(SavingsError::MemberInactive);
    }
    validate_amount(amount)?;
    validate_entry_date(date, today)?;
    Ok(())
}

/// Validates a withdrawal request against the member's derived balance.
///
/// # Errors
///
/// Additionally rejects non-voluntary types and overdrafts.
pub fn validate_withdrawal(
    savings_type: SavingsType,
    amount: Decimal,
    available: Decimal,
    date: NaiveDate,
    today: NaiveDate,
    member_active: bool,
) -> Result<(), SavingsError> {
    if !member_active {
        return Err(SavingsError::MemberInactive);
    }
    if !savings_type.withdrawable() {
        return Err(SavingsError::WithdrawalNotAllowed(savings_type));
    }
    validate_amount(amount)?;
    validate_entry_date(date, today)?;
    if amount > available {
        return Err(SavingsError::InsufficientSavings {
            available,
            requested: amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_valid_deposit() {
        assert!(validate_deposit(dec!(100_000), today(), today(), true).is_ok());
    }

    #[test]
    fn test_deposit_inactive_member() {
        assert_eq!(
            validate_deposit(dec!(100_000), today(), today(), false),
            Err(SavingsError::MemberInactive)
        );
    }

    #[test]
    fn test_deposit_bad_amount() {
        assert_eq!(
            validate_deposit(Decimal::ZERO, today(), today(), true),
            Err(SavingsError::Ledger(LedgerError::NonPositiveAmount))
        );
    }

    #[test]
    fn test_withdrawal_principal_refused() {
        let result = validate_withdrawal(
            SavingsType::Principal,
            dec!(1_000),
            dec!(100_000),
            today(),
            today(),
            true,
        );
        assert_eq!(
            result,
            Err(SavingsError::WithdrawalNotAllowed(SavingsType::Principal))
        );
    }

    #[test]
    fn test_withdrawal_overdraft_refused() {
        let result = validate_withdrawal(
            SavingsType::Voluntary,
            dec!(60_000),
            dec!(50_000),
            today(),
            today(),
            true,
        );
        assert_eq!(
            result,
            Err(SavingsError::InsufficientSavings {
                available: dec!(50_000),
                requested: dec!(60_000),
            })
        );
    }

    #[test]
    fn test_withdrawal_exact_balance_ok() {
        let result = validate_withdrawal(
            SavingsType::Voluntary,
            dec!(50_000),
            dec!(50_000),
            today(),
            today(),
            true,
        );
        assert!(result.is_ok());
    }
}
