//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::coa::{AccountType, signed_balance};

/// An account's aggregated activity, as fed into the report services.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account class.
    pub account_type: AccountType,
    /// Total debits posted.
    pub total_debit: Decimal,
    /// Total credits posted.
    pub total_credit: Decimal,
}

impl AccountBalance {
    /// Derived balance, signed by the account's normal side.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        signed_balance(
            self.account_type.normal_balance(),
            self.total_debit,
            self.total_credit,
        )
    }
}

/// One row of a trial balance.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Net amount in the debit column.
    pub debit: Decimal,
    /// Net amount in the credit column.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Account rows; zero-balance accounts are omitted.
    pub rows: Vec<TrialBalanceRow>,
    /// Total of the debit column.
    pub total_debit: Decimal,
    /// Total of the credit column.
    pub total_credit: Decimal,
    /// Whether the columns match.
    pub is_balanced: bool,
}

/// A section of the balance sheet or income statement.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceSheetSection {
    /// Accounts in the section with their balances.
    pub accounts: Vec<SectionRow>,
    /// Section total.
    pub total: Decimal,
}

/// One account row within a report section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Derived balance.
    pub balance: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section, excluding the surplus line.
    pub equity: BalanceSheetSection,
    /// Cumulative surplus (revenue minus expense) folded into equity.
    pub net_surplus: Decimal,
    /// Total equity including the surplus.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Income statement section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IncomeStatementSection {
    /// Accounts in the section.
    pub accounts: Vec<SectionRow>,
    /// Section total.
    pub total: Decimal,
}

/// Income statement (SHU) report for a period.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatementReport {
    /// Period start.
    pub period_start: NaiveDate,
    /// Period end.
    pub period_end: NaiveDate,
    /// Revenue section.
    pub revenue: IncomeStatementSection,
    /// Expense section.
    pub expenses: IncomeStatementSection,
    /// Net surplus: revenue minus expenses.
    pub net_surplus: Decimal,
}

/// Statement of changes in equity.
#[derive(Debug, Clone, Serialize)]
pub struct EquityChangesReport {
    /// Period start.
    pub period_start: NaiveDate,
    /// Period end.
    pub period_end: NaiveDate,
    /// Equity at period start, including surplus to date.
    pub opening_equity: Decimal,
    /// Net postings to equity accounts during the period.
    pub contributions: Decimal,
    /// Surplus earned during the period.
    pub period_surplus: Decimal,
    /// Closing equity.
    pub closing_equity: Decimal,
}

/// One movement line in a general ledger report.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralLedgerLine {
    /// Entry date.
    pub date: NaiveDate,
    /// Journal number.
    pub journal_number: String,
    /// Entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after this line.
    pub running_balance: Decimal,
}

/// General ledger report for one account.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralLedgerReport {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Period start.
    pub period_start: NaiveDate,
    /// Period end.
    pub period_end: NaiveDate,
    /// Balance before the period.
    pub opening_balance: Decimal,
    /// Movement lines with running balances.
    pub lines: Vec<GeneralLedgerLine>,
    /// Balance after the period.
    pub closing_balance: Decimal,
}

/// Daily cash and activity summary.
#[derive(Debug, Clone, Serialize)]
pub struct DailyReport {
    /// Report date.
    pub date: NaiveDate,
    /// Cash received (debits to the cash account).
    pub cash_in: Decimal,
    /// Cash paid out (credits to the cash account).
    pub cash_out: Decimal,
    /// Net cash movement.
    pub net_cash: Decimal,
    /// Journal entries posted.
    pub entry_count: u64,
    /// Sales rung up.
    pub sales_count: u64,
    /// Sales total.
    pub sales_total: Decimal,
    /// Savings deposits recorded.
    pub deposit_count: u64,
    /// Deposits total.
    pub deposit_total: Decimal,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Active members.
    pub member_count: u64,
    /// Active products.
    pub product_count: u64,
    /// Today's sales total.
    pub sales_today: Decimal,
    /// Total savings held.
    pub total_savings: Decimal,
    /// Derived cash balance.
    pub cash_balance: Decimal,
    /// Products at or below their low-stock threshold.
    pub low_stock_count: u64,
}
