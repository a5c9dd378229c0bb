//! Savings domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::coa::default_chart::well_known;

/// The three kinds of cooperative share-capital savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsType {
    /// One-time deposit on joining; not withdrawable while a member.
    Principal,
    /// Recurring obligatory deposit; not withdrawable while a member.
    Mandatory,
    /// Discretionary; may be withdrawn against the member's balance.
    Voluntary,
}

impl SavingsType {
    /// Equity account this savings type posts against.
    #[must_use]
    pub const fn equity_account_code(self) -> &'static str {
        match self {
            Self::Principal => well_known::PRINCIPAL_SAVINGS,
            Self::Mandatory => well_known::MANDATORY_SAVINGS,
            Self::Voluntary => well_known::VOLUNTARY_SAVINGS,
        }
    }

    /// Whether withdrawals are permitted for this type.
    #[must_use]
    pub const fn withdrawable(self) -> bool {
        matches!(self, Self::Voluntary)
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Principal => "principal",
            Self::Mandatory => "mandatory",
            Self::Voluntary => "voluntary",
        }
    }
}

impl fmt::Display for SavingsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SavingsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "principal" => Ok(Self::Principal),
            "mandatory" => Ok(Self::Mandatory),
            "voluntary" => Ok(Self::Voluntary),
            other => Err(format!("unknown savings type: {other}")),
        }
    }
}

/// Direction of a savings transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsDirection {
    /// Money in.
    Deposit,
    /// Money out (voluntary only).
    Withdrawal,
}

impl SavingsDirection {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for SavingsDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SavingsDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(format!("unknown savings direction: {other}")),
        }
    }
}

/// A member's derived savings position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct MemberSavings {
    /// Principal savings balance.
    pub principal: Decimal,
    /// Mandatory savings balance.
    pub mandatory: Decimal,
    /// Voluntary savings balance.
    pub voluntary: Decimal,
}

impl MemberSavings {
    /// Total across all three types.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.principal + self.mandatory + self.voluntary
    }

    /// Balance for a single type.
    #[must_use]
    pub const fn of_type(&self, savings_type: SavingsType) -> Decimal {
        match savings_type {
            SavingsType::Principal => self.principal,
            SavingsType::Mandatory => self.mandatory,
            SavingsType::Voluntary => self.voluntary,
        }
    }

    /// Applies a signed movement to the given type.
    pub fn apply(&mut self, savings_type: SavingsType, direction: SavingsDirection, amount: Decimal) {
        let signed = match direction {
            SavingsDirection::Deposit => amount,
            SavingsDirection::Withdrawal => -amount,
        };
        match savings_type {
            SavingsType::Principal => self.principal += signed,
            SavingsType::Mandatory => self.mandatory += signed,
            SavingsType::Voluntary => self.voluntary += signed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equity_account_mapping() {
        assert_eq!(SavingsType::Principal.equity_account_code(), "3101");
        assert_eq!(SavingsType::Mandatory.equity_account_code(), "3102");
        assert_eq!(SavingsType::Voluntary.equity_account_code(), "3103");
    }

    #[test]
    fn test_only_voluntary_withdrawable() {
        assert!(!SavingsType::Principal.withdrawable());
        assert!(!SavingsType::Mandatory.withdrawable());
        assert!(SavingsType::Voluntary.withdrawable());
    }

    #[test]
    fn test_member_savings_apply() {
        let mut savings = MemberSavings::default();
        savings.apply(SavingsType::Principal, SavingsDirection::Deposit, dec!(100_000));
        savings.apply(SavingsType::Voluntary, SavingsDirection::Deposit, dec!(50_000));
        savings.apply(SavingsType::Voluntary, SavingsDirection::Withdrawal, dec!(20_000));

        assert_eq!(savings.principal, dec!(100_000));
        assert_eq!(savings.voluntary, dec!(30_000));
        assert_eq!(savings.total(), dec!(130_000));
    }
}
