//! Aggregate recompute for investment projects
//!
//! Re-derives a project's summary fields (position, cost, dividends, start
//! and end dates, both IRR variants) from its full record set. Runs after
//! every record mutation; see `LedgerService`.

use chrono::NaiveDate;
use log::debug;

use super::cashflow::{build_cashflow, irr_reference_date, Conversion};
use super::irr::solve_irr;
use crate::ledger::{InvestmentProject, RecordKind, TransactionRecord};
use crate::refdata::CurrencyTable;

/// Recomputes project aggregates against a currency table
#[derive(Debug, Clone)]
pub struct RecomputeEngine {
    currencies: CurrencyTable,
}

impl RecomputeEngine {
    pub fn new(currencies: CurrencyTable) -> Self {
        Self { currencies }
    }

    /// Recompute every derived field of `project` from `records`
    ///
    /// `records` must be exactly the project's record set. The whole record
    /// set is re-read on every call, so repeated calls with unchanged input
    /// produce identical fields. With a non-empty record set the two IRR
    /// variants are solved independently; an unavailable solve (degenerate
    /// or non-convergent table) stores None rather than a garbage rate.
    pub fn recompute(
        &self,
        project: &mut InvestmentProject,
        records: &[TransactionRecord],
        as_of: NaiveDate,
    ) {
        debug_assert!(records.iter().all(|r| r.project_id == project.id));

        project.buy_amount = 0.0;
        project.sell_amount = 0.0;
        project.buy_value = 0.0;
        project.sell_value = 0.0;
        project.dividends = 0.0;

        for record in records {
            let value = record.value.unwrap_or(0.0);
            match record.kind {
                RecordKind::Buy => {
                    project.buy_amount += record.amount;
                    project.buy_value += value;
                }
                RecordKind::Sell => {
                    project.sell_amount += record.amount;
                    project.sell_value += value;
                }
                RecordKind::Dividend => {
                    project.dividends += value;
                }
            }
        }

        project.amount = project.buy_amount - project.sell_amount;
        project.value = project.buy_value - project.sell_value - project.dividends;

        if records.is_empty() {
            return;
        }

        project.start = records.iter().map(|r| r.date).min();
        if !project.is_open {
            project.end = records.iter().map(|r| r.date).max();
        }

        if let Some(reference) = irr_reference_date(project, records, as_of) {
            let table = build_cashflow(project, records, reference, Conversion::None);
            project.irr = solve_irr(&table);

            let project_rate = self.currencies.rate_of(&project.currency).unwrap_or(1.0);
            let local_table = build_cashflow(
                project,
                records,
                reference,
                Conversion::Home { project_rate },
            );
            project.local_irr = solve_irr(&local_table);

            debug!(
                "project {} recomputed: amount={:.4} value={:.2} irr={:?} local_irr={:?}",
                project.id, project.amount, project.value, project.irr, project.local_irr
            );
        }
    }
}
