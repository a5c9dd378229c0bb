//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{
    AccountBalance, BalanceSheetReport, BalanceSheetSection, DailyReport, EquityChangesReport,
    GeneralLedgerLine, GeneralLedgerReport, IncomeStatementReport, IncomeStatementSection,
    SectionRow, TrialBalanceReport, TrialBalanceRow,
};
use crate::coa::{AccountType, NormalBalance};

/// A raw ledger movement for one account, ordered chronologically.
#[derive(Debug, Clone)]
pub struct LedgerMovement {
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
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance from cumulative account balances.
    ///
    /// Each account's net balance goes into its normal-side column; a
    /// contra position flips to the opposite column. Zero-balance
    /// accounts are omitted.
    #[must_use]
    pub fn trial_balance(as_of: NaiveDate, accounts: &[AccountBalance]) -> TrialBalanceReport {
        let mut rows = Vec::new();
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for account in accounts {
            let balance = account.balance();
            if balance == Decimal::ZERO {
                continue;
            }

            let normal = account.account_type.normal_balance();
            let (debit, credit) = match (normal, balance > Decimal::ZERO) {
                (NormalBalance::Debit, true) | (NormalBalance::Credit, false) => {
                    (balance.abs(), Decimal::ZERO)
                }
                (NormalBalance::Credit, true) | (NormalBalance::Debit, false) => {
                    (Decimal::ZERO, balance.abs())
                }
            };

            total_debit += debit;
            total_credit += credit;
            rows.push(TrialBalanceRow {
                code: account.code.clone(),
                name: account.name.clone(),
                debit,
                credit,
            });
        }

        TrialBalanceReport {
            as_of,
            rows,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Generates a balance sheet from cumulative account balances.
    ///
    /// Revenue and expense balances are not listed; their difference since
    /// inception appears in equity as the net surplus, which is what makes
    /// Assets = Liabilities + Equity hold.
    #[must_use]
    pub fn balance_sheet(as_of: NaiveDate, accounts: &[AccountBalance]) -> BalanceSheetReport {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();
        let mut revenue = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;

        for account in accounts {
            let balance = account.balance();
            match account.account_type {
                AccountType::Asset => Self::add_row(&mut assets, account, balance),
                AccountType::Liability => Self::add_row(&mut liabilities, account, balance),
                AccountType::Equity => Self::add_row(&mut equity, account, balance),
                AccountType::Revenue => revenue += balance,
                AccountType::Expense => expenses += balance,
            }
        }

        let net_surplus = revenue - expenses;
        let total_equity = equity.total + net_surplus;
        let liabilities_and_equity = liabilities.total + total_equity;

        BalanceSheetReport {
            as_of,
            is_balanced: assets.total == liabilities_and_equity,
            assets,
            liabilities,
            equity,
            net_surplus,
            total_equity,
            liabilities_and_equity,
        }
    }

    /// Generates an income statement from period-bounded account balances.
    ///
    /// The caller must aggregate only journal lines dated inside the
    /// period; cumulative balances would overstate both sections.
    #[must_use]
    pub fn income_statement(
        period_start: NaiveDate,
        period_end: NaiveDate,
        accounts: &[AccountBalance],
    ) -> IncomeStatementReport {
        let mut revenue = IncomeStatementSection::default();
        let mut expenses = IncomeStatementSection::default();

        for account in accounts {
            let balance = account.balance();
            match account.account_type {
                AccountType::Revenue => Self::add_income_row(&mut revenue, account, balance),
                AccountType::Expense => Self::add_income_row(&mut expenses, account, balance),
                _ => {}
            }
        }

        let net_surplus = revenue.total - expenses.total;

        IncomeStatementReport {
            period_start,
            period_end,
            revenue,
            expenses,
            net_surplus,
        }
    }

    /// Generates the statement of changes in equity.
    #[must_use]
    pub fn equity_changes(
        period_start: NaiveDate,
        period_end: NaiveDate,
        opening_equity: Decimal,
        contributions: Decimal,
        period_surplus: Decimal,
    ) -> EquityChangesReport {
        EquityChangesReport {
            period_start,
            period_end,
            opening_equity,
            contributions,
            period_surplus,
            closing_equity: opening_equity + contributions + period_surplus,
        }
    }

    /// Builds a general ledger report with running balances.
    ///
    /// The running balance moves by the account's normal side: a debit
    /// increases a debit-normal account and decreases a credit-normal one.
    #[must_use]
    pub fn general_ledger(
        code: String,
        name: String,
        account_type: AccountType,
        period_start: NaiveDate,
        period_end: NaiveDate,
        opening_balance: Decimal,
        movements: &[LedgerMovement],
    ) -> GeneralLedgerReport {
        let normal = account_type.normal_balance();
        let mut running = opening_balance;

        let lines = movements
            .iter()
            .map(|m| {
                running += match normal {
                    NormalBalance::Debit => m.debit - m.credit,
                    NormalBalance::Credit => m.credit - m.debit,
                };
                GeneralLedgerLine {
                    date: m.date,
                    journal_number: m.journal_number.clone(),
                    description: m.description.clone(),
                    debit: m.debit,
                    credit: m.credit,
                    running_balance: running,
                }
            })
            .collect();

        GeneralLedgerReport {
            code,
            name,
            period_start,
            period_end,
            opening_balance,
            lines,
            closing_balance: running,
        }
    }

    /// Assembles the daily cash and activity summary.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn daily_report(
        date: NaiveDate,
        cash_in: Decimal,
        cash_out: Decimal,
        entry_count: u64,
        sales_count: u64,
        sales_total: Decimal,
        deposit_count: u64,
        deposit_total: Decimal,
    ) -> DailyReport {
        DailyReport {
            date,
            cash_in,
            cash_out,
            net_cash: cash_in - cash_out,
            entry_count,
            sales_count,
            sales_total,
            deposit_count,
            deposit_total,
        }
    }

    fn add_row(section: &mut BalanceSheetSection, account: &AccountBalance, balance: Decimal) {
        // Headline accounts with no activity stay off the statement
        if balance == Decimal::ZERO {
            return;
        }
        section.total += balance;
        section.accounts.push(SectionRow {
            code: account.code.clone(),
            name: account.name.clone(),
            balance,
        });
    }

    fn add_income_row(
        section: &mut IncomeStatementSection,
        account: &AccountBalance,
        balance: Decimal,
    ) {
        if balance == Decimal::ZERO {
            return;
        }
        section.total += balance;
        section.accounts.push(SectionRow {
            code: account.code.clone(),
            name: account.name.clone(),
            balance,
        });
    }
}
