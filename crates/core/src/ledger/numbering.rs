//! Document number generation.
//!
//! Journal entries, savings transactions, and sales all carry a
//! `PREFIX-YYYYMMDD-NNNN` number, sequenced per cooperative per day.
//! The sequence restarts at 0001 each day; uniqueness is enforced by the
//! database, with generation done under the inserting transaction's lock.

use chrono::NaiveDate;

/// The document families that carry generated numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Journal entry: `JRN-`.
    Journal,
    /// Savings transaction: `SMP-`.
    Savings,
    /// POS sale: `POS-`.
    Sale,
}

impl DocumentKind {
    /// Returns the number prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Journal => "JRN",
            Self::Savings => "SMP",
            Self::Sale => "POS",
        }
    }
}

/// Formats a document number: `JRN-20260314-0001`.
#[must_use]
pub fn document_number(kind: DocumentKind, date: NaiveDate, sequence: u32) -> String {
    format!(
        "{}-{}-{:04}",
        kind.prefix(),
        date.format("%Y%m%d"),
        sequence
    )
}

/// Computes the next sequence from the day's current maximum number.
///
/// `last` is the highest existing number for the (cooperative, day) pair,
/// or `None` when the day has no documents yet. Unparseable trailing
/// segments restart the sequence rather than failing the posting.
#[must_use]
pub fn next_sequence(last: Option<&str>) -> u32 {
    last.and_then(|number| number.rsplit('-').next())
        .and_then(|tail| tail.parse::<u32>().ok())
        .map_or(1, |seq| seq + 1)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_document_number_format() {
        assert_eq!(
            document_number(DocumentKind::Journal, date(), 1),
            "JRN-20260314-0001"
        );
        assert_eq!(
            document_number(DocumentKind::Savings, date(), 42),
            "SMP-20260314-0042"
        );
        assert_eq!(
            document_number(DocumentKind::Sale, date(), 12345),
            "POS-20260314-12345"
        );
    }

    #[test]
    fn test_next_sequence_from_empty_day() {
        assert_eq!(next_sequence(None), 1);
    }

    #[rstest]
    #[case("JRN-20260314-0007", 8)]
    #[case("POS-20260314-0999", 1000)]
    #[case("SMP-20260314-9999", 10000)]
    fn test_next_sequence_increments(#[case] last: &str, #[case] expected: u32) {
        assert_eq!(next_sequence(Some(last)), expected);
    }

    #[rstest]
    #[case("JRN-20260314-XXXX")]
    #[case("")]
    #[case("no-dashes-here-at-all")]
    fn test_next_sequence_garbage_restarts(#[case] last: &str) {
        assert_eq!(next_sequence(Some(last)), 1);
    }
}
