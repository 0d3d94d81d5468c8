//! Cash-flow construction, IRR solving, and project aggregate recompute

mod cashflow;
mod engine;
mod irr;

pub use cashflow::{build_cashflow, irr_reference_date, CashFlowEntry, Conversion};
pub use engine::RecomputeEngine;
pub use irr::solve_irr;
