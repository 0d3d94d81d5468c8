//! Balance sheet: category values by currency with home-currency totals
//!
//! Account balances and open projects' net cost values are grouped per
//! category and currency; the last column of every value vector is the
//! consolidated home-currency total.

use serde::Serialize;

use crate::refdata::CategoryKind;
use crate::service::Ledger;

/// One category's values: one entry per report currency, then the
/// home-currency total
#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    pub category: String,
    pub values: Vec<f64>,
}

/// All categories of one balance-sheet kind plus their elementwise subtotal
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSection {
    pub kind: CategoryKind,
    pub rows: Vec<BalanceRow>,
    pub subtotal: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    /// Report currencies in table order; every value vector has one entry
    /// per currency plus the trailing total column
    pub currencies: Vec<String>,
    pub sections: Vec<BalanceSection>,
    pub assets: Vec<f64>,
    pub liabilities: Vec<f64>,
    pub equity: Vec<f64>,

    /// Worst-case current-assets over current-liabilities across the
    /// columns; None when no column has current liabilities
    pub liquidity_ratio: Option<f64>,

    /// Highest liabilities-over-assets percentage across the columns
    pub debt_asset_ratio: Option<f64>,
}

fn add_into(acc: &mut [f64], values: &[f64]) {
    for (a, v) in acc.iter_mut().zip(values) {
        *a += v;
    }
}

/// Minimum of elementwise a/b, skipping zero divisors
fn min_ratio(a: &[f64], b: &[f64]) -> Option<f64> {
    a.iter()
        .zip(b)
        .filter(|(_, d)| **d != 0.0)
        .map(|(n, d)| n / d)
        .fold(None, |acc, r| Some(acc.map_or(r, |m: f64| m.min(r))))
}

/// Maximum of elementwise a/b, skipping zero divisors
fn max_ratio(a: &[f64], b: &[f64]) -> Option<f64> {
    a.iter()
        .zip(b)
        .filter(|(_, d)| **d != 0.0)
        .map(|(n, d)| n / d)
        .fold(None, |acc, r| Some(acc.map_or(r, |m: f64| m.max(r))))
}

/// Build the balance sheet for a loaded ledger
pub fn balance_sheet(ledger: &Ledger) -> BalanceSheet {
    let table = &ledger.refdata.currencies;
    let currencies: Vec<String> = table.currencies().iter().map(|c| c.name.clone()).collect();
    let columns = currencies.len() + 1;

    let mut sections: Vec<BalanceSection> = CategoryKind::ALL
        .iter()
        .map(|kind| BalanceSection {
            kind: *kind,
            rows: Vec::new(),
            subtotal: vec![0.0; columns],
        })
        .collect();

    for category in &ledger.refdata.categories {
        let mut values = vec![0.0; columns];

        for account in ledger.accounts.iter().filter(|a| a.category == category.name) {
            if let Some(pos) = currencies.iter().position(|c| *c == account.currency) {
                values[pos] += account.value;
            }
        }
        for project in ledger
            .projects
            .iter()
            .filter(|p| p.is_open && p.category == category.name)
        {
            if let Some(pos) = currencies.iter().position(|c| *c == project.currency) {
                values[pos] += project.value;
            }
        }

        // Consolidated total in the home currency
        values[columns - 1] = currencies
            .iter()
            .enumerate()
            .map(|(i, name)| values[i] * table.rate_of(name).unwrap_or(1.0))
            .sum();

        if let Some(section) = sections.iter_mut().find(|s| s.kind == category.kind) {
            add_into(&mut section.subtotal, &values);
            section.rows.push(BalanceRow {
                category: category.name.clone(),
                values,
            });
        }
    }

    let mut assets = vec![0.0; columns];
    let mut liabilities = vec![0.0; columns];
    let mut current_assets = vec![0.0; columns];
    let mut current_liabilities = vec![0.0; columns];

    for section in &sections {
        if section.kind.is_asset() {
            add_into(&mut assets, &section.subtotal);
        } else {
            add_into(&mut liabilities, &section.subtotal);
        }
        match section.kind {
            CategoryKind::CurrentAsset => add_into(&mut current_assets, &section.subtotal),
            CategoryKind::CurrentLiability => {
                add_into(&mut current_liabilities, &section.subtotal)
            }
            _ => {}
        }
    }

    let equity: Vec<f64> = assets
        .iter()
        .zip(&liabilities)
        .map(|(a, l)| a - l)
        .collect();

    let liquidity_ratio = min_ratio(&current_assets, &current_liabilities);
    let debt_asset_ratio = max_ratio(&liabilities, &assets).map(|r| 100.0 * r);

    BalanceSheet {
        currencies,
        sections,
        assets,
        liabilities,
        equity,
        liquidity_ratio,
        debt_asset_ratio,
    }
}
