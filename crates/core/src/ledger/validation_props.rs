//! Property-based tests for journal entry validation and reversal.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::reversal::reversing_lines;
use super::types::{EntryInput, LineInput, LineSnapshot};
use super::validation::validate_entry;

/// Strategy for a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn debit_line(amount: Decimal) -> LineInput {
    LineInput {
        account_id: Uuid::new_v4(),
        debit: amount,
        credit: Decimal::ZERO,
        memo: None,
    }
}

fn credit_line(amount: Decimal) -> LineInput {
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
        description: "prop entry".to_string(),
        reference: None,
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Splitting one amount across several debit lines against a single
    /// credit line always validates: balance is about sums, not line counts.
    #[test]
    fn prop_split_debits_still_balance(
        amounts in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let total: Decimal = amounts.iter().sum();
        let mut lines: Vec<LineInput> = amounts.into_iter().map(debit_line).collect();
        lines.push(credit_line(total));

        let input = entry(lines);
        let totals = validate_entry(&input, today()).unwrap();
        prop_assert!(totals.is_balanced());
        prop_assert_eq!(totals.debits, total);
    }

    /// Any non-zero skew between debits and credits is rejected.
    #[test]
    fn prop_skewed_entry_rejected(
        amount in positive_amount(),
        skew_cents in 1i64..1_000_000i64,
    ) {
        let skew = Decimal::new(skew_cents, 2);
        let input = entry(vec![debit_line(amount + skew), credit_line(amount)]);

        let result = validate_entry(&input, today());
        prop_assert!(
            matches!(result, Err(LedgerError::Unbalanced { .. })),
            "expected Unbalanced, got {result:?}"
        );
    }

    /// A reversal negates the original: summed per account, original plus
    /// reversal is zero on both sides.
    #[test]
    fn prop_reversal_negates(
        amounts in prop::collection::vec(positive_amount(), 1..6),
    ) {
        let total: Decimal = amounts.iter().sum();
        let mut original: Vec<LineSnapshot> = amounts
            .iter()
            .map(|&a| LineSnapshot {
                account_id: Uuid::new_v4(),
                debit: a,
                credit: Decimal::ZERO,
                memo: None,
            })
            .collect();
        original.push(LineSnapshot {
            account_id: Uuid::new_v4(),
            debit: Decimal::ZERO,
            credit: total,
            memo: None,
        });

        let reversed = reversing_lines(&original);
        for (orig, rev) in original.iter().zip(&reversed) {
            prop_assert_eq!(orig.account_id, rev.account_id);
            prop_assert_eq!(orig.debit - rev.credit, Decimal::ZERO);
            prop_assert_eq!(orig.credit - rev.debit, Decimal::ZERO);
        }
    }

    /// A reversal of a balanced entry is itself a valid balanced entry.
    #[test]
    fn prop_reversal_is_valid_entry(
        amount in positive_amount(),
    ) {
        let original = vec![
            LineSnapshot {
                account_id: Uuid::new_v4(),
                debit: amount,
                credit: Decimal::ZERO,
                memo: None,
            },
            LineSnapshot {
                account_id: Uuid::new_v4(),
                debit: Decimal::ZERO,
                credit: amount,
                memo: None,
            },
        ];

        let input = entry(reversing_lines(&original));
        prop_assert!(validate_entry(&input, today()).is_ok());
    }
}
