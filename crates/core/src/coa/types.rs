//! Account classification types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five account classes of the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Resources owned (cash, inventory, receivables).
    Asset,
    /// Obligations owed.
    Liability,
    /// Member equity, including share-capital savings.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

/// Which side increases an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl AccountType {
    /// Normal balance side is a pure function of the account type.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// Derives the signed balance of an account from its debit and credit totals.
///
/// Debit-normal accounts grow with debits; credit-normal accounts grow with
/// credits. A negative result means the account is in a contra position.
#[must_use]
pub fn signed_balance(
    normal: NormalBalance,
    total_debit: Decimal,
    total_credit: Decimal,
) -> Decimal {
    match normal {
        NormalBalance::Debit => total_debit - total_credit,
        NormalBalance::Credit => total_credit - total_debit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance_by_type() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(
            AccountType::Liability.normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_signed_balance_debit_normal() {
        assert_eq!(
            signed_balance(NormalBalance::Debit, dec!(500_000), dec!(120_000)),
            dec!(380_000)
        );
    }

    #[test]
    fn test_signed_balance_credit_normal() {
        assert_eq!(
            signed_balance(NormalBalance::Credit, dec!(0), dec!(100_000)),
            dec!(100_000)
        );
    }

    #[test]
    fn test_contra_position_goes_negative() {
        assert_eq!(
            signed_balance(NormalBalance::Credit, dec!(150), dec!(100)),
            dec!(-50)
        );
    }

    #[test]
    fn test_type_round_trip() {
        for ty in [
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Revenue,
            AccountType::Expense,
        ] {
            assert_eq!(ty.as_str().parse::<AccountType>().unwrap(), ty);
        }
    }
}
