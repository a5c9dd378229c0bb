//! Reversing-entry construction.
//!
//! Correction of a posted entry never mutates it. Instead a new entry is
//! created with every line's debit and credit swapped, which neutralizes
//! the original account by account.

use super::types::{LineInput, LineSnapshot};

/// Builds the lines of a reversing entry by swapping debit and credit.
///
/// Memos are prefixed with `Reversal:` so the line's origin stays visible
/// in the general ledger.
#[must_use]
pub fn reversing_lines(original: &[LineSnapshot]) -> Vec<LineInput> {
    original
        .iter()
        .map(|line| LineInput {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            memo: Some(match &line.memo {
                Some(memo) => format!("Reversal: {memo}"),
                None => "Reversal".to_string(),
            }),
        })
        .collect()
}

/// Builds the description for a reversing entry.
#[must_use]
pub fn reversal_description(original_number: &str, reason: &str) -> String {
    format!("Reversal of {original_number}: {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn snapshot(debit: Decimal, credit: Decimal) -> LineSnapshot {
        LineSnapshot {
            account_id: Uuid::new_v4(),
            debit,
            credit,
            memo: None,
        }
    }

    #[test]
    fn test_sides_swap() {
        let original = vec![
            snapshot(dec!(100_000), Decimal::ZERO),
            snapshot(Decimal::ZERO, dec!(100_000)),
        ];
        let reversed = reversing_lines(&original);

        assert_eq!(reversed[0].debit, Decimal::ZERO);
        assert_eq!(reversed[0].credit, dec!(100_000));
        assert_eq!(reversed[1].debit, dec!(100_000));
        assert_eq!(reversed[1].credit, Decimal::ZERO);
    }

    #[test]
    fn test_accounts_preserved() {
        let original = vec![
            snapshot(dec!(50), Decimal::ZERO),
            snapshot(Decimal::ZERO, dec!(50)),
        ];
        let reversed = reversing_lines(&original);
        for (orig, rev) in original.iter().zip(&reversed) {
            assert_eq!(orig.account_id, rev.account_id);
        }
    }

    #[test]
    fn test_memo_prefixed() {
        let mut line = snapshot(dec!(10), Decimal::ZERO);
        line.memo = Some("cash deposit".to_string());
        let reversed = reversing_lines(&[line]);
        assert_eq!(reversed[0].memo.as_deref(), Some("Reversal: cash deposit"));
    }

    #[test]
    fn test_description() {
        assert_eq!(
            reversal_description("JRN-20260314-0003", "wrong amount"),
            "Reversal of JRN-20260314-0003: wrong amount"
        );
    }
}
