//! Business rule validation for journal entries.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::{LedgerError, MAX_BACKDATE_DAYS, MAX_LINE_AMOUNT};
use super::types::{EntryInput, EntryTotals, LineInput};
use crate::coa::AccountType;

/// Account data needed to validate a posting, as resolved per tenant.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// Account id.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account class.
    pub account_type: AccountType,
    /// Whether the account accepts postings.
    pub active: bool,
}

/// Validates a single monetary amount.
///
/// # Errors
///
/// Rejects non-positive amounts, amounts above [`MAX_LINE_AMOUNT`], and
/// amounts with more than two decimal places.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    if amount > MAX_LINE_AMOUNT {
        return Err(LedgerError::AmountTooLarge {
            max: MAX_LINE_AMOUNT,
        });
    }
    if amount.normalize().scale() > 2 {
        return Err(LedgerError::TooManyDecimalPlaces);
    }
    Ok(())
}

/// Validates an entry date against the allowed window.
///
/// # Errors
///
/// Rejects future dates and dates more than one year in the past.
pub fn validate_entry_date(date: NaiveDate, today: NaiveDate) -> Result<(), LedgerError> {
    if date > today {
        return Err(LedgerError::FutureDate(date));
    }
    if date < today - Duration::days(MAX_BACKDATE_DAYS) {
        return Err(LedgerError::DateTooOld(date));
    }
    Ok(())
}

fn validate_line(line: &LineInput) -> Result<(), LedgerError> {
    let has_debit = line.debit != Decimal::ZERO;
    let has_credit = line.credit != Decimal::ZERO;

    match (has_debit, has_credit) {
        (true, true) => Err(LedgerError::MixedLine),
        (false, false) => Err(LedgerError::EmptyLine),
        (true, false) => validate_amount(line.debit),
        (false, true) => validate_amount(line.credit),
    }
}

/// Validates a journal entry and computes its totals.
///
/// Checks, in order: line count, per-line side shape and amount rules,
/// entry date window, and exact balance.
///
/// # Errors
///
/// Returns the first [`LedgerError`] encountered.
pub fn validate_entry(input: &EntryInput, today: NaiveDate) -> Result<EntryTotals, LedgerError> {
    if input.lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for line in &input.lines {
        validate_line(line)?;
        debits += line.debit;
        credits += line.credit;
    }

    validate_entry_date(input.date, today)?;

    let totals = EntryTotals { debits, credits };
    if !totals.is_balanced() {
        return Err(LedgerError::Unbalanced { debits, credits });
    }

    Ok(totals)
}

/// Resolves and checks every account referenced by the entry lines.
///
/// The lookup closure is expected to be tenant-scoped: an account that
/// exists under another cooperative must come back as
/// [`LedgerError::AccountNotFound`].
///
/// # Errors
///
/// Propagates lookup failures and rejects inactive accounts.
pub fn resolve_accounts<L>(lines: &[LineInput], lookup: L) -> Result<Vec<AccountInfo>, LedgerError>
where
    L: Fn(Uuid) -> Result<AccountInfo, LedgerError>,
{
    let mut resolved = Vec::with_capacity(lines.len());
    for line in lines {
        let account = lookup(line.account_id)?;
        if !account.active {
            return Err(LedgerError::AccountInactive(account.id));
        }
        resolved.push(account);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn debit(amount: Decimal) -> LineInput {
        LineInput {
            account_id: Uuid::new_v4(),
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    fn credit(amount: Decimal) -> LineInput {
        LineInput {
            account_id: Uuid::new_v4(),
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }

    fn entry(lines: Vec<LineInput>) -> EntryInput {
        EntryInput {
            date: today(),
            description: "test entry".to_string(),
            reference: None,
            lines,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_balanced_entry() {
        let input = entry(vec![debit(dec!(100_000)), credit(dec!(100_000))]);
        let totals = validate_entry(&input, today()).unwrap();
        assert!(totals.is_balanced());
        assert_eq!(totals.debits, dec!(100_000));
    }

    #[test]
    fn test_unbalanced_entry() {
        let input = entry(vec![debit(dec!(100_000)), credit(dec!(50_000))]);
        assert_eq!(
            validate_entry(&input, today()),
            Err(LedgerError::Unbalanced {
                debits: dec!(100_000),
                credits: dec!(50_000),
            })
        );
    }

    #[test]
    fn test_single_line_rejected() {
        let input = entry(vec![debit(dec!(100_000))]);
        assert_eq!(
            validate_entry(&input, today()),
            Err(LedgerError::InsufficientLines)
        );
    }

    #[test]
    fn test_mixed_line_rejected() {
        let mut line = debit(dec!(100));
        line.credit = dec!(100);
        let input = entry(vec![line, credit(dec!(100))]);
        assert_eq!(validate_entry(&input, today()), Err(LedgerError::MixedLine));
    }

    #[test]
    fn test_empty_line_rejected() {
        let input = entry(vec![debit(Decimal::ZERO), credit(dec!(100))]);
        assert_eq!(validate_entry(&input, today()), Err(LedgerError::EmptyLine));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = entry(vec![debit(dec!(-50)), credit(dec!(-50))]);
        assert_eq!(
            validate_entry(&input, today()),
            Err(LedgerError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_amount_cap() {
        assert!(validate_amount(dec!(999_999_999)).is_ok());
        assert_eq!(
            validate_amount(dec!(1_000_000_000)),
            Err(LedgerError::AmountTooLarge {
                max: MAX_LINE_AMOUNT
            })
        );
    }

    #[test]
    fn test_two_decimal_places_max() {
        assert!(validate_amount(dec!(10.25)).is_ok());
        assert_eq!(
            validate_amount(dec!(10.255)),
            Err(LedgerError::TooManyDecimalPlaces)
        );
        // Trailing zeros beyond 2dp normalize away
        assert!(validate_amount(dec!(10.2500)).is_ok());
    }

    #[test]
    fn test_future_date_rejected() {
        let mut input = entry(vec![debit(dec!(100)), credit(dec!(100))]);
        input.date = today() + Duration::days(1);
        assert_eq!(
            validate_entry(&input, today()),
            Err(LedgerError::FutureDate(input.date))
        );
    }

    #[test]
    fn test_old_date_rejected() {
        let mut input = entry(vec![debit(dec!(100)), credit(dec!(100))]);
        input.date = today() - Duration::days(MAX_BACKDATE_DAYS + 1);
        assert_eq!(
            validate_entry(&input, today()),
            Err(LedgerError::DateTooOld(input.date))
        );
    }

    #[test]
    fn test_resolve_accounts_inactive() {
        let lines = vec![debit(dec!(100)), credit(dec!(100))];
        let result = resolve_accounts(&lines, |id| {
            Ok(AccountInfo {
                id,
                code: "1101".to_string(),
                account_type: AccountType::Asset,
                active: false,
            })
        });
        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
    }

    #[test]
    fn test_resolve_accounts_missing() {
        let lines = vec![debit(dec!(100))];
        let result = resolve_accounts(&lines, |id| Err(LedgerError::AccountNotFound(id)));
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }
}
