//! Auto-posting templates for savings and sales.
//!
//! These return lines keyed by well-known account codes; the repository
//! resolves codes to the tenant's account ids before inserting.

use rust_decimal::Decimal;

use crate::coa::default_chart::well_known;
use crate::savings::SavingsType;

/// One template line, keyed by account code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingLine {
    /// Well-known account code.
    pub account_code: &'static str,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl PostingLine {
    fn debit(account_code: &'static str, amount: Decimal) -> Self {
        Self {
            account_code,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    fn credit(account_code: &'static str, amount: Decimal) -> Self {
        Self {
            account_code,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// Posting for a savings deposit: debit cash, credit the type's equity.
#[must_use]
pub fn deposit_lines(savings_type: SavingsType, amount: Decimal) -> Vec<PostingLine> {
    vec![
        PostingLine::debit(well_known::CASH, amount),
        PostingLine::credit(savings_type.equity_account_code(), amount),
    ]
}

/// Posting for a savings withdrawal: debit the type's equity, credit cash.
#[must_use]
pub fn withdrawal_lines(savings_type: SavingsType, amount: Decimal) -> Vec<PostingLine> {
    vec![
        PostingLine::debit(savings_type.equity_account_code(), amount),
        PostingLine::credit(well_known::CASH, amount),
    ]
}

/// Posting for a cash sale.
///
/// Always books cash against revenue; adds the COGS leg (expense against
/// inventory) only when the goods sold carried a recorded cost.
#[must_use]
pub fn sale_lines(total: Decimal, cost_of_goods: Decimal) -> Vec<PostingLine> {
    let mut lines = vec![
        PostingLine::debit(well_known::CASH, total),
        PostingLine::credit(well_known::SALES_REVENUE, total),
    ];

    if cost_of_goods > Decimal::ZERO {
        lines.push(PostingLine::debit(well_known::COGS, cost_of_goods));
        lines.push(PostingLine::credit(well_known::INVENTORY, cost_of_goods));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn totals(lines: &[PostingLine]) -> (Decimal, Decimal) {
        lines.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(debits, credits), line| (debits + line.debit, credits + line.credit),
        )
    }

    #[test]
    fn test_principal_deposit_posting() {
        let lines = deposit_lines(SavingsType::Principal, dec!(100_000));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].account_code, "1101");
        assert_eq!(lines[0].debit, dec!(100_000));
        assert_eq!(lines[1].account_code, "3101");
        assert_eq!(lines[1].credit, dec!(100_000));
    }

    #[test]
    fn test_deposit_account_by_type() {
        assert_eq!(
            deposit_lines(SavingsType::Mandatory, dec!(1))[1].account_code,
            "3102"
        );
        assert_eq!(
            deposit_lines(SavingsType::Voluntary, dec!(1))[1].account_code,
            "3103"
        );
    }

    #[test]
    fn test_withdrawal_mirrors_deposit() {
        let lines = withdrawal_lines(SavingsType::Voluntary, dec!(25_000));
        assert_eq!(lines[0].account_code, "3103");
        assert_eq!(lines[0].debit, dec!(25_000));
        assert_eq!(lines[1].account_code, "1101");
        assert_eq!(lines[1].credit, dec!(25_000));
    }

    #[test]
    fn test_sale_with_cogs() {
        let lines = sale_lines(dec!(130_000), dec!(110_000));

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].account_code, "1101");
        assert_eq!(lines[0].debit, dec!(130_000));
        assert_eq!(lines[1].account_code, "4101");
        assert_eq!(lines[1].credit, dec!(130_000));
        assert_eq!(lines[2].account_code, "5201");
        assert_eq!(lines[2].debit, dec!(110_000));
        assert_eq!(lines[3].account_code, "1301");
        assert_eq!(lines[3].credit, dec!(110_000));
    }

    #[test]
    fn test_sale_without_cost_skips_cogs_leg() {
        let lines = sale_lines(dec!(130_000), Decimal::ZERO);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_templates_balance() {
        for lines in [
            deposit_lines(SavingsType::Principal, dec!(100_000)),
            withdrawal_lines(SavingsType::Voluntary, dec!(42.50)),
            sale_lines(dec!(130_000), dec!(110_000)),
            sale_lines(dec!(9.99), Decimal::ZERO),
        ] {
            let (debits, credits) = totals(&lines);
            assert_eq!(debits, credits);
        }
    }
}
