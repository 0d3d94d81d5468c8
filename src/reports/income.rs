//! Income/outgoing statement and monthly detail pivots
//!
//! The statement covers the trailing 365 days: account entries grouped by
//! flow category, plus realized results of investment projects closed in
//! the window. The pivots spread the same data over first-of-month rows.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::analysis::{build_cashflow, solve_irr, CashFlowEntry, Conversion};
use crate::refdata::{CategoryKind, FlowKind};
use crate::service::Ledger;

#[derive(Debug, Clone, Serialize)]
pub struct FlowRow {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatement {
    pub income: Vec<FlowRow>,
    pub income_total: f64,
    pub outgoing: Vec<FlowRow>,
    pub outgoing_total: f64,

    /// Realized home-currency results of projects closed in the window,
    /// per investment category
    pub investments: Vec<FlowRow>,
    pub investments_total: f64,

    pub total_income: f64,
    pub net_income: f64,
    pub saving_rate: Option<f64>,
    pub invest_income_rate: Option<f64>,
    pub invest_outgoing_rate: Option<f64>,

    /// Annualized money-weighted return across the window's closed
    /// projects, in the home currency
    pub invest_rate: Option<f64>,
}

/// Month-by-category value matrix
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPivot {
    pub columns: Vec<String>,
    /// First-of-month dates, ascending
    pub months: Vec<NaiveDate>,
    /// cells[m][c] is the value of column c in month m
    pub cells: Vec<Vec<f64>>,
    /// Per-month totals across all columns
    pub totals: Vec<f64>,
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn guarded_rate(numerator: f64, divisor: f64) -> Option<f64> {
    if divisor != 0.0 {
        Some(100.0 * numerator / divisor)
    } else {
        None
    }
}

/// Build the trailing-365-day income/outgoing statement
pub fn income_outgoing_sheet(ledger: &Ledger, as_of: NaiveDate) -> IncomeStatement {
    let window_start = as_of - Duration::days(365);

    let flow_rows = |kind: FlowKind| -> Vec<FlowRow> {
        ledger
            .refdata
            .flow_categories
            .iter()
            .filter(|c| c.kind == kind)
            .filter_map(|category| {
                let sum: f64 = ledger
                    .entries
                    .iter()
                    .filter(|e| e.flow_category == category.name && e.date >= window_start)
                    .map(|e| e.value)
                    .sum();
                (sum != 0.0).then(|| FlowRow {
                    name: category.name.clone(),
                    value: sum,
                })
            })
            .collect()
    };

    let income = flow_rows(FlowKind::Income);
    let outgoing = flow_rows(FlowKind::Expense);

    let mut investments = Vec::new();
    let mut iotab: Vec<CashFlowEntry> = Vec::new();
    for category in ledger
        .refdata
        .categories
        .iter()
        .filter(|c| c.kind == CategoryKind::Investment)
    {
        let mut sum = 0.0;
        for project in ledger.projects.iter().filter(|p| {
            !p.is_open
                && p.category == category.name
                && p.end.map_or(false, |end| end >= window_start)
        }) {
            let rate = ledger
                .refdata
                .currencies
                .rate_of(&project.currency)
                .unwrap_or(1.0);
            // Closed projects carry realized profit as negative net cost
            sum -= project.value * rate;
            iotab.extend(build_cashflow(
                project,
                &ledger.records_of(project.id),
                as_of,
                Conversion::Home { project_rate: rate },
            ));
        }
        if sum != 0.0 {
            investments.push(FlowRow {
                name: category.name.clone(),
                value: sum,
            });
        }
    }

    let income_total: f64 = income.iter().map(|r| r.value).sum();
    let outgoing_total: f64 = outgoing.iter().map(|r| r.value).sum();
    let investments_total: f64 = investments.iter().map(|r| r.value).sum();
    let total_income = income_total + investments_total;
    let net_income = total_income - outgoing_total;

    IncomeStatement {
        income,
        income_total,
        outgoing,
        outgoing_total,
        investments,
        investments_total,
        total_income,
        net_income,
        saving_rate: guarded_rate(net_income, total_income),
        invest_income_rate: guarded_rate(investments_total, total_income),
        invest_outgoing_rate: guarded_rate(investments_total, outgoing_total),
        invest_rate: solve_irr(&iotab),
    }
}

fn assemble(series: Vec<(String, BTreeMap<NaiveDate, f64>)>) -> MonthlyPivot {
    let months: Vec<NaiveDate> = series
        .iter()
        .flat_map(|(_, s)| s.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns: Vec<String> = series.iter().map(|(name, _)| name.clone()).collect();
    let cells: Vec<Vec<f64>> = months
        .iter()
        .map(|month| {
            series
                .iter()
                .map(|(_, s)| s.get(month).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();
    let totals: Vec<f64> = cells.iter().map(|row| row.iter().sum()).collect();

    MonthlyPivot {
        columns,
        months,
        cells,
        totals,
    }
}

fn entry_series(ledger: &Ledger, kind: FlowKind) -> Vec<(String, BTreeMap<NaiveDate, f64>)> {
    ledger
        .refdata
        .flow_categories
        .iter()
        .filter(|c| c.kind == kind)
        .filter_map(|category| {
            let mut series = BTreeMap::new();
            for entry in ledger
                .entries
                .iter()
                .filter(|e| e.flow_category == category.name)
            {
                *series.entry(first_of_month(entry.date)).or_insert(0.0) += entry.value;
            }
            (!series.is_empty()).then(|| (category.name.clone(), series))
        })
        .collect()
}

/// Monthly income pivot: income flow categories plus realized results of
/// closed investment projects, booked in their closing month
pub fn income_details(ledger: &Ledger) -> MonthlyPivot {
    let mut series = entry_series(ledger, FlowKind::Income);

    for category in ledger
        .refdata
        .categories
        .iter()
        .filter(|c| c.kind == CategoryKind::Investment)
    {
        let mut s = BTreeMap::new();
        for project in ledger
            .projects
            .iter()
            .filter(|p| !p.is_open && p.category == category.name)
        {
            let Some(end) = project.end else {
                continue;
            };
            let rate = ledger
                .refdata
                .currencies
                .rate_of(&project.currency)
                .unwrap_or(1.0);
            *s.entry(first_of_month(end)).or_insert(0.0) += -(project.value * rate);
        }
        if !s.is_empty() {
            series.push((category.name.clone(), s));
        }
    }

    assemble(series)
}

/// Monthly outgoing pivot over expense flow categories
pub fn outgoing_details(ledger: &Ledger) -> MonthlyPivot {
    assemble(entry_series(ledger, FlowKind::Expense))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Account, AccountEntry, InvestmentProject, RecordKind, TransactionRecord};
    use crate::refdata::{Category, Currency, CurrencyTable, FlowCategory, RefData};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: u32, on: NaiveDate, category: &str, value: f64) -> AccountEntry {
        AccountEntry {
            id,
            account_id: 1,
            date: on,
            flow_category: category.to_string(),
            value,
            comment: None,
        }
    }

    fn test_ledger() -> Ledger {
        let refdata = RefData {
            currencies: CurrencyTable::new(
                "CNY",
                vec![Currency { name: "CNY".into(), rate: 1.0 }],
            ),
            categories: vec![Category {
                name: "Funds".into(),
                kind: CategoryKind::Investment,
                driver: None,
            }],
            flow_categories: vec![
                FlowCategory { name: "Salary".into(), kind: FlowKind::Income },
                FlowCategory { name: "Bonus".into(), kind: FlowKind::Income },
                FlowCategory { name: "Rent".into(), kind: FlowKind::Expense },
            ],
            banks: Vec::new(),
            risks: Vec::new(),
        };

        let mut closed = InvestmentProject::new(1, "done", 1, "CNY", "Funds", "low", false);
        closed.value = -150.0; // realized profit of 150
        closed.end = Some(date(2021, 4, 1));

        let mut buy = TransactionRecord::new(1, 1, date(2021, 1, 4), RecordKind::Buy, 100.0);
        buy.value = Some(1000.0);
        let mut sell = TransactionRecord::new(2, 1, date(2021, 4, 1), RecordKind::Sell, 100.0);
        sell.value = Some(1150.0);

        Ledger {
            refdata,
            accounts: vec![Account {
                id: 1,
                bank: "ICBC".into(),
                name: "checking".into(),
                currency: "CNY".into(),
                category: "Cash".into(),
                value: 0.0,
            }],
            entries: vec![
                entry(1, date(2021, 2, 1), "Salary", 9000.0),
                entry(2, date(2021, 2, 15), "Salary", 1000.0),
                entry(3, date(2021, 3, 1), "Rent", 3000.0),
                // Outside the trailing year as of 2021-12-31
                entry(4, date(2019, 6, 1), "Bonus", 5000.0),
            ],
            projects: vec![closed],
            records: vec![buy, sell],
        }
    }

    #[test]
    fn test_statement_totals() {
        let statement = income_outgoing_sheet(&test_ledger(), date(2021, 12, 31));

        assert_eq!(statement.income.len(), 1); // Bonus out of window, skipped
        assert_eq!(statement.income[0].name, "Salary");
        assert_eq!(statement.income_total, 10_000.0);
        assert_eq!(statement.outgoing_total, 3_000.0);
        assert_eq!(statement.investments_total, 150.0);
        assert_eq!(statement.total_income, 10_150.0);
        assert_eq!(statement.net_income, 7_150.0);
    }

    #[test]
    fn test_statement_rates() {
        let statement = income_outgoing_sheet(&test_ledger(), date(2021, 12, 31));

        let saving = statement.saving_rate.unwrap();
        assert!((saving - 100.0 * 7_150.0 / 10_150.0).abs() < 1e-9);
        assert!(statement.invest_income_rate.is_some());
        assert!(statement.invest_outgoing_rate.is_some());
        // Buy then profitable sell: the aggregate return resolves
        let rate = statement.invest_rate.unwrap();
        assert!(rate > 0.0);
    }

    #[test]
    fn test_empty_ledger_rates_unavailable() {
        let mut ledger = test_ledger();
        ledger.entries.clear();
        ledger.projects.clear();
        ledger.records.clear();

        let statement = income_outgoing_sheet(&ledger, date(2021, 12, 31));
        assert_eq!(statement.total_income, 0.0);
        assert_eq!(statement.saving_rate, None);
        assert_eq!(statement.invest_outgoing_rate, None);
        assert_eq!(statement.invest_rate, None);
    }

    #[test]
    fn test_income_pivot_buckets_by_month() {
        let pivot = income_details(&test_ledger());

        assert_eq!(pivot.columns, vec!["Salary", "Bonus", "Funds"]);
        assert_eq!(
            pivot.months,
            vec![date(2019, 6, 1), date(2021, 2, 1), date(2021, 4, 1)]
        );

        // Both February salary entries land in one cell
        let feb = &pivot.cells[1];
        assert_eq!(feb[0], 10_000.0);
        // The closed project books its realized profit in April
        let apr = &pivot.cells[2];
        assert_eq!(apr[2], 150.0);

        for (row, total) in pivot.cells.iter().zip(&pivot.totals) {
            assert_eq!(row.iter().sum::<f64>(), *total);
        }
    }

    #[test]
    fn test_outgoing_pivot() {
        let pivot = outgoing_details(&test_ledger());
        assert_eq!(pivot.columns, vec!["Rent"]);
        assert_eq!(pivot.months, vec![date(2021, 3, 1)]);
        assert_eq!(pivot.cells[0][0], 3_000.0);
    }
}
