//! Financial statement calculations.
//!
//! Every report is computed from account balances derived at query time;
//! nothing here reads stored totals, because there are none.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{LedgerMovement, ReportService};
pub use types::{
    AccountBalance, BalanceSheetReport, BalanceSheetSection, DailyReport, DashboardStats,
    EquityChangesReport, GeneralLedgerLine, GeneralLedgerReport, IncomeStatementReport,
    IncomeStatementSection, TrialBalanceReport, TrialBalanceRow,
};
