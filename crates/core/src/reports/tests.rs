//! Report service tests over hand-built balance sets.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::service::{LedgerMovement, ReportService};
use super::types::AccountBalance;
use crate::coa::AccountType;

fn account(
    code: &str,
    name: &str,
    account_type: AccountType,
    total_debit: Decimal,
    total_credit: Decimal,
) -> AccountBalance {
    AccountBalance {
        account_id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        total_debit,
        total_credit,
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

/// Balances produced by: a 100,000 principal deposit, then a sale of
/// 130,000 with 110,000 cost of goods.
fn cooperative_balances() -> Vec<AccountBalance> {
    vec![
        account(
            "1101",
            "Cash",
            AccountType::Asset,
            dec!(230_000),
            Decimal::ZERO,
        ),
        account(
            "1301",
            "Merchandise Inventory",
            AccountType::Asset,
            Decimal::ZERO,
            dec!(110_000),
        ),
        account(
            "3101",
            "Principal Savings",
            AccountType::Equity,
            Decimal::ZERO,
            dec!(100_000),
        ),
        account(
            "4101",
            "Sales",
            AccountType::Revenue,
            Decimal::ZERO,
            dec!(130_000),
        ),
        account(
            "5201",
            "Cost of Goods Sold",
            AccountType::Expense,
            dec!(110_000),
            Decimal::ZERO,
        ),
    ]
}

#[test]
fn test_trial_balance_balances() {
    let report = ReportService::trial_balance(date(), &cooperative_balances());

    assert!(report.is_balanced);
    assert_eq!(report.total_debit, report.total_credit);
    // Cash 230,000 debit + COGS 110,000 debit, inventory contra 110,000 credit
    assert_eq!(report.total_debit, dec!(340_000));
}

#[test]
fn test_trial_balance_skips_zero_accounts() {
    let mut balances = cooperative_balances();
    balances.push(account(
        "2101",
        "Trade Payables",
        AccountType::Liability,
        Decimal::ZERO,
        Decimal::ZERO,
    ));

    let report = ReportService::trial_balance(date(), &balances);
    assert!(!report.rows.iter().any(|r| r.code == "2101"));
}

#[test]
fn test_trial_balance_contra_position_flips_column() {
    // Inventory is debit-normal but sits at -110,000 here
    let report = ReportService::trial_balance(date(), &cooperative_balances());
    let inventory = report.rows.iter().find(|r| r.code == "1301").unwrap();

    assert_eq!(inventory.debit, Decimal::ZERO);
    assert_eq!(inventory.credit, dec!(110_000));
}

#[test]
fn test_balance_sheet_identity() {
    let report = ReportService::balance_sheet(date(), &cooperative_balances());

    // Assets: 230,000 cash - 110,000 inventory = 120,000
    assert_eq!(report.assets.total, dec!(120_000));
    // Equity: 100,000 savings + 20,000 surplus
    assert_eq!(report.net_surplus, dec!(20_000));
    assert_eq!(report.total_equity, dec!(120_000));
    assert!(report.is_balanced);
    assert_eq!(
        report.assets.total - report.liabilities.total - report.total_equity,
        Decimal::ZERO
    );
}

#[test]
fn test_income_statement() {
    let report = ReportService::income_statement(date(), date(), &cooperative_balances());

    assert_eq!(report.revenue.total, dec!(130_000));
    assert_eq!(report.expenses.total, dec!(110_000));
    assert_eq!(report.net_surplus, dec!(20_000));
}

#[test]
fn test_income_statement_ignores_balance_sheet_accounts() {
    let report = ReportService::income_statement(date(), date(), &cooperative_balances());

    assert!(!report.revenue.accounts.iter().any(|r| r.code == "1101"));
    assert!(!report.expenses.accounts.iter().any(|r| r.code == "3101"));
}

#[test]
fn test_equity_changes() {
    let report =
        ReportService::equity_changes(date(), date(), dec!(500_000), dec!(75_000), dec!(20_000));

    assert_eq!(report.closing_equity, dec!(595_000));
}

#[test]
fn test_general_ledger_running_balance_debit_normal() {
    let movements = vec![
        LedgerMovement {
            date: date(),
            journal_number: "JRN-20260314-0001".to_string(),
            description: "deposit".to_string(),
            debit: dec!(100_000),
            credit: Decimal::ZERO,
        },
        LedgerMovement {
            date: date(),
            journal_number: "JRN-20260314-0002".to_string(),
            description: "purchase".to_string(),
            debit: Decimal::ZERO,
            credit: dec!(30_000),
        },
    ];

    let report = ReportService::general_ledger(
        "1101".to_string(),
        "Cash".to_string(),
        AccountType::Asset,
        date(),
        date(),
        dec!(50_000),
        &movements,
    );

    assert_eq!(report.lines[0].running_balance, dec!(150_000));
    assert_eq!(report.lines[1].running_balance, dec!(120_000));
    assert_eq!(report.closing_balance, dec!(120_000));
}

#[test]
fn test_general_ledger_running_balance_credit_normal() {
    let movements = vec![LedgerMovement {
        date: date(),
        journal_number: "JRN-20260314-0001".to_string(),
        description: "deposit".to_string(),
        debit: Decimal::ZERO,
        credit: dec!(100_000),
    }];

    let report = ReportService::general_ledger(
        "3101".to_string(),
        "Principal Savings".to_string(),
        AccountType::Equity,
        date(),
        date(),
        Decimal::ZERO,
        &movements,
    );

    assert_eq!(report.closing_balance, dec!(100_000));
}

#[test]
fn test_daily_report_net_cash() {
    let report = ReportService::daily_report(
        date(),
        dec!(500_000),
        dec!(120_000),
        7,
        3,
        dec!(390_000),
        2,
        dec!(110_000),
    );

    assert_eq!(report.net_cash, dec!(380_000));
    assert_eq!(report.entry_count, 7);
}
