//! Reporting reducers over the core's per-project output
//!
//! These consume stored aggregates and currency rates; nothing here feeds
//! back into the ledger.

mod balance;
mod income;

pub use balance::{balance_sheet, BalanceRow, BalanceSection, BalanceSheet};
pub use income::{
    income_details, income_outgoing_sheet, outgoing_details, FlowRow, IncomeStatement,
    MonthlyPivot,
};
