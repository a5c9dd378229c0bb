//! Core business logic for Kopra.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry journal validation, numbering, reversal, posting templates
//! - `coa` - Chart of accounts types and the default cooperative chart
//! - `savings` - Share-capital savings rules
//! - `pos` - Point-of-sale math and validation
//! - `reports` - Financial statement calculations over derived balances
//! - `auth` - Password/PIN hashing and the role policy table

pub mod auth;
pub mod coa;
pub mod ledger;
pub mod pos;
pub mod reports;
pub mod savings;
