//! Ledger entities and their CSV persistence

mod data;
pub mod loader;

pub use data::{Account, AccountEntry, InvestmentProject, RecordKind, TransactionRecord};
