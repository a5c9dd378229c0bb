//! Domain types for journal entry creation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Where a journal entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Entered by hand through the journal endpoint.
    Manual,
    /// Auto-posted from a savings transaction.
    Savings,
    /// Auto-posted from a POS sale.
    Pos,
    /// Created by reversing another entry.
    Reversal,
}

impl EntrySource {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Savings => "savings",
            Self::Pos => "pos",
            Self::Reversal => "reversal",
        }
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntrySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "savings" => Ok(Self::Savings),
            "pos" => Ok(Self::Pos),
            "reversal" => Ok(Self::Reversal),
            other => Err(format!("unknown entry source: {other}")),
        }
    }
}

/// Lifecycle of a journal entry.
///
/// Entries post at creation; there is no draft state. The only transition
/// is `Posted -> Reversed`, and reversal itself creates a new posted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Live in the ledger.
    Posted,
    /// Neutralized by a reversing entry; still part of history.
    Reversed,
}

impl EntryStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posted => "posted",
            Self::Reversed => "reversed",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posted" => Ok(Self::Posted),
            "reversed" => Ok(Self::Reversed),
            other => Err(format!("unknown entry status: {other}")),
        }
    }
}

/// One line of a journal entry as submitted.
///
/// Exactly one of `debit` / `credit` must be non-zero.
#[derive(Debug, Clone, Deserialize)]
pub struct LineInput {
    /// Account to post to.
    pub account_id: Uuid,
    /// Debit amount (zero when crediting).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero when debiting).
    #[serde(default)]
    pub credit: Decimal,
    /// Optional line memo.
    pub memo: Option<String>,
}

/// A journal entry as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryInput {
    /// Entry date.
    pub date: NaiveDate,
    /// What the entry records.
    pub description: String,
    /// External reference (receipt number, etc).
    pub reference: Option<String>,
    /// The entry lines.
    pub lines: Vec<LineInput>,
}

/// A stored line, as needed for reversal.
#[derive(Debug, Clone)]
pub struct LineSnapshot {
    /// Account the line posted to.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line memo.
    pub memo: Option<String>,
}

/// Totals computed during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Sum of all debit amounts.
    pub debits: Decimal,
    /// Sum of all credit amounts.
    pub credits: Decimal,
}

impl EntryTotals {
    /// Exact equality; no tolerance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debits == self.credits
    }
}
