//! Error types shared by the loaders, the application service, and the
//! quote driver registry

use thiserror::Error;

/// Faults surfaced while loading, mutating, or updating ledger data
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown record kind: {0}")]
    UnknownRecordKind(String),

    #[error("unknown category kind: {0}")]
    UnknownCategoryKind(String),

    #[error("unknown flow kind: {0}")]
    UnknownFlowKind(String),

    #[error("no currency named {0}")]
    UnknownCurrency(String),

    #[error("no account with id {0}")]
    UnknownAccount(u32),

    #[error("no project with id {0}")]
    UnknownProject(u32),

    #[error("no transaction record with id {0}")]
    UnknownRecord(u32),

    #[error("category {category} references unregistered quote driver {driver}")]
    UnknownDriver { category: String, driver: String },

    #[error("record {0} is missing two of price/value/commission")]
    IncompleteRecord(u32),
}
