//! Invest Ledger - personal finance and investment tracking with
//! money-weighted return analytics
//!
//! This library provides:
//! - Bank accounts, categorized income/expense entries, and investment
//!   projects with buy/sell/dividend transaction records
//! - Cash-flow table construction and an annualized IRR solver, in both
//!   project-currency and home-currency variants
//! - Explicit transaction application: account-balance adjustment and
//!   project aggregate recompute as one unit
//! - Quote driver registry for refreshing prices and exchange rates
//! - Balance-sheet and income/outgoing reports over stored aggregates

pub mod analysis;
pub mod errors;
pub mod ledger;
pub mod quotes;
pub mod refdata;
pub mod reports;
pub mod service;

// Re-export commonly used types
pub use analysis::{build_cashflow, solve_irr, CashFlowEntry, Conversion, RecomputeEngine};
pub use errors::LedgerError;
pub use ledger::{Account, AccountEntry, InvestmentProject, RecordKind, TransactionRecord};
pub use quotes::{CsvQuoteSource, DriverRegistry, QuoteSource};
pub use refdata::{Currency, CurrencyTable, RefData};
pub use service::{Ledger, LedgerService};
