//! Cash-flow table construction for money-weighted return analysis
//!
//! Turns a project's transaction history (plus, for open projects, an
//! implied liquidation at the current market price) into the signed
//! (day-offset, value) table the IRR solver consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{InvestmentProject, RecordKind, TransactionRecord};

/// One signed cash flow, `days` before the reference date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    /// Day offset of the flow relative to the reference date
    pub days: i64,

    /// Signed flow: buys positive, sells and dividends negative
    pub value: f64,
}

/// Currency basis for a cash-flow table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// Keep flows in the project currency
    None,

    /// Convert flows to the home currency. A record carrying a
    /// per-transaction rate is scaled by it; a record without one passes
    /// through unconverted (a documented limitation of the stored data, not
    /// an error). `project_rate` scales the synthetic terminal valuation.
    Home { project_rate: f64 },
}

/// Reference date against which a project's day offsets are measured
///
/// An open project with a market price is valued as of `as_of`; anything
/// else is measured from its latest record date. None when the project has
/// no records at all.
pub fn irr_reference_date(
    project: &InvestmentProject,
    records: &[TransactionRecord],
    as_of: NaiveDate,
) -> Option<NaiveDate> {
    if project.is_open && project.current_price.is_some() {
        return Some(as_of);
    }
    records.iter().map(|r| r.date).max()
}

/// Build the signed cash-flow table for one project
///
/// `records` must be the project's own record set; `project.amount` must be
/// current, since the synthetic terminal entry liquidates it. Records whose
/// `value` is still unset contribute nothing (they are rejected upstream by
/// the application service). Output order follows input order, but the
/// solver only sums the table, so order carries no meaning.
pub fn build_cashflow(
    project: &InvestmentProject,
    records: &[TransactionRecord],
    reference_date: NaiveDate,
    conversion: Conversion,
) -> Vec<CashFlowEntry> {
    let mut table = Vec::with_capacity(records.len() + 1);

    for record in records {
        let Some(value) = record.value else {
            continue;
        };
        let mut signed = match record.kind {
            RecordKind::Buy => value,
            RecordKind::Sell | RecordKind::Dividend => -value,
        };
        if let Conversion::Home { .. } = conversion {
            if let Some(rate) = record.rate {
                signed *= rate;
            }
        }
        table.push(CashFlowEntry {
            days: (reference_date - record.date).num_days(),
            value: signed,
        });
    }

    // Implied liquidation of the open holding at today's price
    if project.is_open {
        if let Some(price) = project.current_price {
            let mut value = project.amount * price;
            if let Conversion::Home { project_rate } = conversion {
                value *= project_rate;
            }
            table.push(CashFlowEntry { days: 0, value: -value });
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_project() -> InvestmentProject {
        let mut p = InvestmentProject::new(1, "fund", 1, "USD", "Funds", "low", true);
        p.amount = 100.0;
        p.current_price = Some(12.0);
        p
    }

    fn buy(id: u32, on: NaiveDate, value: f64) -> TransactionRecord {
        let mut r = TransactionRecord::new(id, 1, on, RecordKind::Buy, 100.0);
        r.value = Some(value);
        r
    }

    #[test]
    fn test_terminal_entry_for_open_priced_project() {
        let project = open_project();
        let records = vec![buy(1, date(2021, 1, 1), 1000.0)];
        let table = build_cashflow(&project, &records, date(2021, 12, 31), Conversion::None);

        assert_eq!(table.len(), 2);
        assert_eq!(table[0], CashFlowEntry { days: 364, value: 1000.0 });
        assert_eq!(table[1], CashFlowEntry { days: 0, value: -1200.0 });
    }

    #[test]
    fn test_no_terminal_entry_when_closed() {
        let mut project = open_project();
        project.is_open = false;

        let mut sell = TransactionRecord::new(2, 1, date(2021, 6, 1), RecordKind::Sell, 100.0);
        sell.value = Some(1300.0);
        let records = vec![buy(1, date(2021, 1, 1), 1000.0), sell];

        let table = build_cashflow(&project, &records, date(2021, 6, 1), Conversion::None);
        assert_eq!(table.len(), 2);
        assert_eq!(table[1], CashFlowEntry { days: 0, value: -1300.0 });
    }

    #[test]
    fn test_no_terminal_entry_without_price() {
        let mut project = open_project();
        project.current_price = None;
        let records = vec![buy(1, date(2021, 1, 1), 1000.0)];
        let table = build_cashflow(&project, &records, date(2021, 12, 31), Conversion::None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_dividends_count_as_outflows() {
        let project = open_project();
        let mut dividend = TransactionRecord::new(2, 1, date(2021, 7, 1), RecordKind::Dividend, 0.0);
        dividend.value = Some(30.0);
        let records = vec![buy(1, date(2021, 1, 1), 1000.0), dividend];

        let table = build_cashflow(&project, &records, date(2021, 12, 31), Conversion::None);
        assert_eq!(table[1].value, -30.0);
    }

    #[test]
    fn test_home_conversion_uses_record_rate_or_passes_through() {
        let project = open_project();
        let mut converted = buy(1, date(2021, 1, 1), 1000.0);
        converted.rate = Some(6.5);
        let unconverted = buy(2, date(2021, 3, 1), 500.0);
        let records = vec![converted, unconverted];

        let table = build_cashflow(
            &project,
            &records,
            date(2021, 12, 31),
            Conversion::Home { project_rate: 7.0 },
        );
        assert_eq!(table[0].value, 6500.0);
        assert_eq!(table[1].value, 500.0); // no per-record rate: unconverted
        assert_eq!(table[2].value, -(100.0 * 12.0 * 7.0)); // terminal at project rate
    }

    #[test]
    fn test_records_without_value_are_skipped() {
        let project = open_project();
        let incomplete = TransactionRecord::new(1, 1, date(2021, 1, 1), RecordKind::Buy, 100.0);
        let records = vec![incomplete, buy(2, date(2021, 2, 1), 800.0)];
        let table = build_cashflow(&project, &records, date(2021, 12, 31), Conversion::None);
        assert_eq!(table.len(), 2); // one record + terminal
        assert_eq!(table[0].value, 800.0);
    }

    #[test]
    fn test_reference_date_selection() {
        let project = open_project();
        let records = vec![buy(1, date(2021, 1, 1), 1000.0)];
        let as_of = date(2021, 12, 31);
        assert_eq!(irr_reference_date(&project, &records, as_of), Some(as_of));

        let mut closed = open_project();
        closed.is_open = false;
        assert_eq!(
            irr_reference_date(&closed, &records, as_of),
            Some(date(2021, 1, 1))
        );

        assert_eq!(irr_reference_date(&closed, &[], as_of), None);
    }
}
