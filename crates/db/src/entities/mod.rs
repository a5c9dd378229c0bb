//! `SeaORM` entity definitions.
//!
//! One module per table. Enum columns are stored as short strings and
//! mapped through [`sea_orm_active_enums`].

pub mod accounts;
pub mod cooperatives;
pub mod journal_entries;
pub mod journal_lines;
pub mod members;
pub mod products;
pub mod sale_items;
pub mod sales;
pub mod savings_transactions;
pub mod sea_orm_active_enums;
pub mod users;
