//! Repository layer for data access.
//!
//! One repository per aggregate. Every query is tenant-scoped by
//! cooperative id; anything that must hold as a unit (posting, a sale,
//! a savings movement) runs inside a single database transaction.

pub mod account;
pub mod cooperative;
pub mod journal;
pub mod member;
pub mod product;
pub mod report;
pub mod sale;
pub mod savings;
pub mod user;

pub use account::AccountRepository;
pub use cooperative::CooperativeRepository;
pub use journal::JournalRepository;
pub use member::MemberRepository;
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use sale::SaleRepository;
pub use savings::SavingsRepository;
pub use user::UserRepository;
