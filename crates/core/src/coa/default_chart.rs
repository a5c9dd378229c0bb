//! The standard chart of accounts seeded for a new cooperative.

use super::types::AccountType;

/// Account codes the auto-posting templates depend on.
pub mod well_known {
    /// Cash on hand.
    pub const CASH: &str = "1101";
    /// Merchandise inventory.
    pub const INVENTORY: &str = "1301";
    /// Principal savings equity.
    pub const PRINCIPAL_SAVINGS: &str = "3101";
    /// Mandatory savings equity.
    pub const MANDATORY_SAVINGS: &str = "3102";
    /// Voluntary savings equity.
    pub const VOLUNTARY_SAVINGS: &str = "3103";
    /// Sales revenue.
    pub const SALES_REVENUE: &str = "4101";
    /// Cost of goods sold.
    pub const COGS: &str = "5201";
}

/// One account in the default chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultAccount {
    /// Account code, unique per cooperative.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Account class.
    pub account_type: AccountType,
}

/// Returns the default cooperative chart of accounts.
///
/// Codes follow the conventional Indonesian cooperative layout:
/// 1xxx assets, 2xxx liabilities, 3xxx equity (including the three
/// savings accounts), 4xxx revenue, 5xxx expenses.
#[must_use]
pub fn default_chart() -> Vec<DefaultAccount> {
    use AccountType::{Asset, Equity, Expense, Liability, Revenue};

    vec![
        // Assets
        DefaultAccount { code: "1000", name: "Assets", account_type: Asset },
        DefaultAccount { code: "1100", name: "Current Assets", account_type: Asset },
        DefaultAccount { code: "1101", name: "Cash", account_type: Asset },
        DefaultAccount { code: "1102", name: "Bank", account_type: Asset },
        DefaultAccount { code: "1200", name: "Receivables", account_type: Asset },
        DefaultAccount { code: "1201", name: "Member Receivables", account_type: Asset },
        DefaultAccount { code: "1300", name: "Inventory", account_type: Asset },
        DefaultAccount { code: "1301", name: "Merchandise Inventory", account_type: Asset },
        // Liabilities
        DefaultAccount { code: "2000", name: "Liabilities", account_type: Liability },
        DefaultAccount { code: "2100", name: "Short-Term Liabilities", account_type: Liability },
        DefaultAccount { code: "2101", name: "Trade Payables", account_type: Liability },
        // Equity
        DefaultAccount { code: "3000", name: "Equity", account_type: Equity },
        DefaultAccount { code: "3100", name: "Cooperative Capital", account_type: Equity },
        DefaultAccount { code: "3101", name: "Principal Savings", account_type: Equity },
        DefaultAccount { code: "3102", name: "Mandatory Savings", account_type: Equity },
        DefaultAccount { code: "3103", name: "Voluntary Savings", account_type: Equity },
        DefaultAccount { code: "3200", name: "Retained Surplus (SHU)", account_type: Equity },
        DefaultAccount { code: "3201", name: "Current Year Surplus", account_type: Equity },
        // Revenue
        DefaultAccount { code: "4000", name: "Revenue", account_type: Revenue },
        DefaultAccount { code: "4100", name: "Operating Revenue", account_type: Revenue },
        DefaultAccount { code: "4101", name: "Sales", account_type: Revenue },
        DefaultAccount { code: "4200", name: "Other Income", account_type: Revenue },
        // Expenses
        DefaultAccount { code: "5000", name: "Expenses", account_type: Expense },
        DefaultAccount { code: "5100", name: "Operating Expenses", account_type: Expense },
        DefaultAccount { code: "5101", name: "Salary Expense", account_type: Expense },
        DefaultAccount { code: "5102", name: "Electricity Expense", account_type: Expense },
        DefaultAccount { code: "5103", name: "Water Expense", account_type: Expense },
        DefaultAccount { code: "5104", name: "Phone & Internet Expense", account_type: Expense },
        DefaultAccount { code: "5200", name: "Cost of Sales", account_type: Expense },
        DefaultAccount { code: "5201", name: "Cost of Goods Sold", account_type: Expense },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let chart = default_chart();
        let codes: HashSet<_> = chart.iter().map(|a| a.code).collect();
        assert_eq!(codes.len(), chart.len());
    }

    #[test]
    fn test_well_known_codes_present() {
        let chart = default_chart();
        for code in [
            well_known::CASH,
            well_known::INVENTORY,
            well_known::PRINCIPAL_SAVINGS,
            well_known::MANDATORY_SAVINGS,
            well_known::VOLUNTARY_SAVINGS,
            well_known::SALES_REVENUE,
            well_known::COGS,
        ] {
            assert!(chart.iter().any(|a| a.code == code), "missing {code}");
        }
    }

    #[test]
    fn test_code_prefix_matches_type() {
        for account in default_chart() {
            let expected = match &account.code[..1] {
                "1" => AccountType::Asset,
                "2" => AccountType::Liability,
                "3" => AccountType::Equity,
                "4" => AccountType::Revenue,
                "5" => AccountType::Expense,
                other => panic!("unexpected code prefix {other}"),
            };
            assert_eq!(account.account_type, expected, "account {}", account.code);
        }
    }
}
