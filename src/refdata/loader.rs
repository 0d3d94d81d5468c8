//! CSV loaders for the reference tables
//!
//! Reads reference data from a directory containing currencies.csv,
//! categories.csv, flow_categories.csv, banks.csv, and risks.csv.

use std::io::Read;
use std::path::Path;

use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

use super::{Bank, Category, CategoryKind, Currency, FlowCategory, FlowKind, Risk};
use crate::errors::LedgerError;

#[derive(Debug, Deserialize, Serialize)]
struct CurrencyRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

#[derive(Debug, Deserialize, Serialize)]
struct CategoryRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Driver")]
    driver: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct FlowCategoryRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Kind")]
    kind: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct NameRow {
    #[serde(rename = "Name")]
    name: String,
}

fn parse_category_kind(s: &str) -> Result<CategoryKind, LedgerError> {
    match s {
        "CurrentAsset" => Ok(CategoryKind::CurrentAsset),
        "CurrentLiability" => Ok(CategoryKind::CurrentLiability),
        "FixedAsset" => Ok(CategoryKind::FixedAsset),
        "LongTermLiability" => Ok(CategoryKind::LongTermLiability),
        "Investment" => Ok(CategoryKind::Investment),
        other => Err(LedgerError::UnknownCategoryKind(other.to_string())),
    }
}

fn parse_flow_kind(s: &str) -> Result<FlowKind, LedgerError> {
    match s {
        "Income" => Ok(FlowKind::Income),
        "Expense" => Ok(FlowKind::Expense),
        other => Err(LedgerError::UnknownFlowKind(other.to_string())),
    }
}

/// Load currencies from `<dir>/currencies.csv`
pub fn load_currencies(dir: &Path) -> Result<Vec<Currency>, LedgerError> {
    load_currencies_from_reader(std::fs::File::open(dir.join("currencies.csv"))?)
}

pub fn load_currencies_from_reader<R: Read>(reader: R) -> Result<Vec<Currency>, LedgerError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut currencies = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CurrencyRow = result?;
        currencies.push(Currency {
            name: row.name,
            rate: row.rate,
        });
    }
    Ok(currencies)
}

/// Load categories from `<dir>/categories.csv`
pub fn load_categories(dir: &Path) -> Result<Vec<Category>, LedgerError> {
    load_categories_from_reader(std::fs::File::open(dir.join("categories.csv"))?)
}

pub fn load_categories_from_reader<R: Read>(reader: R) -> Result<Vec<Category>, LedgerError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut categories = Vec::new();
    for result in csv_reader.deserialize() {
        let row: CategoryRow = result?;
        categories.push(Category {
            name: row.name,
            kind: parse_category_kind(&row.kind)?,
            driver: row.driver.filter(|d| !d.is_empty()),
        });
    }
    Ok(categories)
}

/// Load income/expense categories from `<dir>/flow_categories.csv`
pub fn load_flow_categories(dir: &Path) -> Result<Vec<FlowCategory>, LedgerError> {
    load_flow_categories_from_reader(std::fs::File::open(dir.join("flow_categories.csv"))?)
}

pub fn load_flow_categories_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<FlowCategory>, LedgerError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut categories = Vec::new();
    for result in csv_reader.deserialize() {
        let row: FlowCategoryRow = result?;
        categories.push(FlowCategory {
            name: row.name,
            kind: parse_flow_kind(&row.kind)?,
        });
    }
    Ok(categories)
}

/// Load banks from `<dir>/banks.csv`
pub fn load_banks(dir: &Path) -> Result<Vec<Bank>, LedgerError> {
    let mut reader = Reader::from_path(dir.join("banks.csv"))?;
    let mut banks = Vec::new();
    for result in reader.deserialize() {
        let row: NameRow = result?;
        banks.push(Bank { name: row.name });
    }
    Ok(banks)
}

/// Load risk grades from `<dir>/risks.csv`
pub fn load_risks(dir: &Path) -> Result<Vec<Risk>, LedgerError> {
    let mut reader = Reader::from_path(dir.join("risks.csv"))?;
    let mut risks = Vec::new();
    for result in reader.deserialize() {
        let row: NameRow = result?;
        risks.push(Risk { name: row.name });
    }
    Ok(risks)
}

/// Write currencies back to `<dir>/currencies.csv`
///
/// Used after a rate update pass so refreshed rates survive the process.
pub fn save_currencies(dir: &Path, currencies: &[Currency]) -> Result<(), LedgerError> {
    let mut writer = Writer::from_path(dir.join("currencies.csv"))?;
    for c in currencies {
        writer.serialize(CurrencyRow {
            name: c.name.clone(),
            rate: c.rate,
        })?;
    }
    writer.flush()?;
    Ok(())
}
