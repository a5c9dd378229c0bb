//! Double-entry journal logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entry input types and totals
//! - Business rule validation (line shape, balance, amounts, dates)
//! - Document number generation (`JRN-`/`SMP-`/`POS-YYYYMMDD-NNNN`)
//! - Reversing-entry construction
//! - Auto-posting templates for savings and sales

pub mod error;
pub mod numbering;
pub mod posting;
pub mod reversal;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use numbering::{DocumentKind, document_number, next_sequence};
pub use posting::{PostingLine, deposit_lines, sale_lines, withdrawal_lines};
pub use reversal::{reversal_description, reversing_lines};
pub use types::{EntryInput, EntryStatus, EntrySource, EntryTotals, LineInput, LineSnapshot};
pub use validation::{AccountInfo, resolve_accounts, validate_entry};
