//! Error types for journal entry operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while validating or mutating journal entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Line Validation ==========
    /// A journal entry needs at least two lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// A line set both its debit and credit side.
    #[error("Journal line must set either debit or credit, not both")]
    MixedLine,

    /// A line set neither side.
    #[error("Journal line must set a debit or credit amount")]
    EmptyLine,

    /// A line amount is zero or negative.
    #[error("Line amount must be positive")]
    NonPositiveAmount,

    /// A line amount exceeds the allowed maximum.
    #[error("Line amount exceeds the maximum of {max}")]
    AmountTooLarge {
        /// Largest permitted amount.
        max: Decimal,
    },

    /// A line amount has more than two decimal places.
    #[error("Line amount must have at most 2 decimal places")]
    TooManyDecimalPlaces,

    /// Debits and credits do not match.
    #[error("Journal entry is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    // ========== Date Validation ==========
    /// Entry date lies in the future.
    #[error("Entry date {0} is in the future")]
    FutureDate(NaiveDate),

    /// Entry date is more than one year in the past.
    #[error("Entry date {0} is more than one year in the past")]
    DateTooOld(NaiveDate),

    // ========== Account Resolution ==========
    /// Account missing, or belonging to another cooperative. The two cases
    /// are deliberately indistinguishable.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),

    // ========== Entry State ==========
    /// Posted entries are immutable.
    #[error("Journal entry is posted and cannot be modified")]
    AlreadyPosted,

    /// The entry was already reversed once.
    #[error("Journal entry has already been reversed")]
    AlreadyReversed,
}

/// Largest amount a single line may carry.
pub const MAX_LINE_AMOUNT: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);

/// Oldest permitted entry date, relative to today.
pub const MAX_BACKDATE_DAYS: i64 = 365;
