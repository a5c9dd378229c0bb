//! String-backed enums shared by the entities.
//!
//! Each mirrors a pure enum in `kopra-shared`/`kopra-core`; conversions in
//! both directions keep the core crates free of `SeaORM`.

use kopra_core::coa;
use kopra_core::ledger;
use kopra_core::savings;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue account.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<coa::AccountType> for AccountType {
    fn from(value: coa::AccountType) -> Self {
        match value {
            coa::AccountType::Asset => Self::Asset,
            coa::AccountType::Liability => Self::Liability,
            coa::AccountType::Equity => Self::Equity,
            coa::AccountType::Revenue => Self::Revenue,
            coa::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for coa::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Full access.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Bookkeeping access.
    #[sea_orm(string_value = "treasurer")]
    Treasurer,
    /// Store access.
    #[sea_orm(string_value = "cashier")]
    Cashier,
}

impl From<kopra_shared::Role> for StaffRole {
    fn from(value: kopra_shared::Role) -> Self {
        match value {
            kopra_shared::Role::Admin => Self::Admin,
            kopra_shared::Role::Treasurer => Self::Treasurer,
            kopra_shared::Role::Cashier => Self::Cashier,
        }
    }
}

impl From<StaffRole> for kopra_shared::Role {
    fn from(value: StaffRole) -> Self {
        match value {
            StaffRole::Admin => Self::Admin,
            StaffRole::Treasurer => Self::Treasurer,
            StaffRole::Cashier => Self::Cashier,
        }
    }
}

/// Where a journal entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Manual journal entry.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Auto-posted from savings.
    #[sea_orm(string_value = "savings")]
    Savings,
    /// Auto-posted from a sale.
    #[sea_orm(string_value = "pos")]
    Pos,
    /// Reversing entry.
    #[sea_orm(string_value = "reversal")]
    Reversal,
}

impl From<ledger::EntrySource> for EntrySource {
    fn from(value: ledger::EntrySource) -> Self {
        match value {
            ledger::EntrySource::Manual => Self::Manual,
            ledger::EntrySource::Savings => Self::Savings,
            ledger::EntrySource::Pos => Self::Pos,
            ledger::EntrySource::Reversal => Self::Reversal,
        }
    }
}

impl From<EntrySource> for ledger::EntrySource {
    fn from(value: EntrySource) -> Self {
        match value {
            EntrySource::Manual => Self::Manual,
            EntrySource::Savings => Self::Savings,
            EntrySource::Pos => Self::Pos,
            EntrySource::Reversal => Self::Reversal,
        }
    }
}

/// Journal entry lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Live in the ledger.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Neutralized by a reversal.
    #[sea_orm(string_value = "reversed")]
    Reversed,
}

impl From<ledger::EntryStatus> for EntryStatus {
    fn from(value: ledger::EntryStatus) -> Self {
        match value {
            ledger::EntryStatus::Posted => Self::Posted,
            ledger::EntryStatus::Reversed => Self::Reversed,
        }
    }
}

impl From<EntryStatus> for ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Reversed => Self::Reversed,
        }
    }
}

/// Savings type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum SavingsType {
    /// Principal savings.
    #[sea_orm(string_value = "principal")]
    Principal,
    /// Mandatory savings.
    #[sea_orm(string_value = "mandatory")]
    Mandatory,
    /// Voluntary savings.
    #[sea_orm(string_value = "voluntary")]
    Voluntary,
}

impl From<savings::SavingsType> for SavingsType {
    fn from(value: savings::SavingsType) -> Self {
        match value {
            savings::SavingsType::Principal => Self::Principal,
            savings::SavingsType::Mandatory => Self::Mandatory,
            savings::SavingsType::Voluntary => Self::Voluntary,
        }
    }
}

impl From<SavingsType> for savings::SavingsType {
    fn from(value: SavingsType) -> Self {
        match value {
            SavingsType::Principal => Self::Principal,
            SavingsType::Mandatory => Self::Mandatory,
            SavingsType::Voluntary => Self::Voluntary,
        }
    }
}

/// Savings transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum SavingsDirection {
    /// Money in.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Money out.
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<savings::SavingsDirection> for SavingsDirection {
    fn from(value: savings::SavingsDirection) -> Self {
        match value {
            savings::SavingsDirection::Deposit => Self::Deposit,
            savings::SavingsDirection::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<SavingsDirection> for savings::SavingsDirection {
    fn from(value: SavingsDirection) -> Self {
        match value {
            SavingsDirection::Deposit => Self::Deposit,
            SavingsDirection::Withdrawal => Self::Withdrawal,
        }
    }
}
