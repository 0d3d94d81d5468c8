//! CSV load/save for the ledger entity files
//!
//! A ledger directory holds accounts.csv, entries.csv, projects.csv, and
//! records.csv next to the reference tables.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

use super::{Account, AccountEntry, InvestmentProject, RecordKind, TransactionRecord};
use crate::errors::LedgerError;

/// Default path to a ledger data directory
pub const DEFAULT_LEDGER_PATH: &str = "data/ledger";

#[derive(Debug, Deserialize, Serialize)]
struct AccountRow {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Bank")]
    bank: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Value")]
    value: f64,
}

#[derive(Debug, Deserialize, Serialize)]
struct EntryRow {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "AccountId")]
    account_id: u32,
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "FlowCategory")]
    flow_category: String,
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "Comment")]
    comment: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct ProjectRow {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Url")]
    url: Option<String>,
    #[serde(rename = "AccountId")]
    account_id: u32,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Risk")]
    risk: String,
    #[serde(rename = "IsOpen")]
    is_open: bool,
    #[serde(rename = "Start")]
    start: Option<NaiveDate>,
    #[serde(rename = "End")]
    end: Option<NaiveDate>,
    #[serde(rename = "QuoteId")]
    quote_id: Option<String>,
    #[serde(rename = "CurrentPrice")]
    current_price: Option<f64>,
    #[serde(rename = "BuyAmount", default)]
    buy_amount: f64,
    #[serde(rename = "SellAmount", default)]
    sell_amount: f64,
    #[serde(rename = "Amount", default)]
    amount: f64,
    #[serde(rename = "BuyValue", default)]
    buy_value: f64,
    #[serde(rename = "SellValue", default)]
    sell_value: f64,
    #[serde(rename = "Value", default)]
    value: f64,
    #[serde(rename = "Dividends", default)]
    dividends: f64,
    #[serde(rename = "Irr")]
    irr: Option<f64>,
    #[serde(rename = "LocalIrr")]
    local_irr: Option<f64>,
    #[serde(rename = "Comment")]
    comment: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
struct RecordRow {
    #[serde(rename = "Id")]
    id: u32,
    #[serde(rename = "ProjectId")]
    project_id: u32,
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Price")]
    price: Option<f64>,
    #[serde(rename = "Value")]
    value: Option<f64>,
    #[serde(rename = "Commission")]
    commission: Option<f64>,
    #[serde(rename = "Rate")]
    rate: Option<f64>,
}

impl RecordRow {
    fn to_record(self) -> Result<TransactionRecord, LedgerError> {
        let kind = match self.kind.as_str() {
            "Buy" => RecordKind::Buy,
            "Sell" => RecordKind::Sell,
            "Dividend" => RecordKind::Dividend,
            other => return Err(LedgerError::UnknownRecordKind(other.to_string())),
        };

        Ok(TransactionRecord {
            id: self.id,
            project_id: self.project_id,
            date: self.date,
            kind,
            amount: self.amount,
            price: self.price,
            value: self.value,
            commission: self.commission,
            rate: self.rate,
        })
    }

    fn from_record(record: &TransactionRecord) -> Self {
        Self {
            id: record.id,
            project_id: record.project_id,
            date: record.date,
            kind: record.kind.as_str().to_string(),
            amount: record.amount,
            price: record.price,
            value: record.value,
            commission: record.commission,
            rate: record.rate,
        }
    }
}

impl ProjectRow {
    fn to_project(self) -> InvestmentProject {
        InvestmentProject {
            id: self.id,
            name: self.name,
            code: self.code,
            url: self.url,
            account_id: self.account_id,
            currency: self.currency,
            category: self.category,
            risk: self.risk,
            is_open: self.is_open,
            start: self.start,
            end: self.end,
            quote_id: self.quote_id,
            current_price: self.current_price,
            buy_amount: self.buy_amount,
            sell_amount: self.sell_amount,
            amount: self.amount,
            buy_value: self.buy_value,
            sell_value: self.sell_value,
            value: self.value,
            dividends: self.dividends,
            irr: self.irr,
            local_irr: self.local_irr,
            comment: self.comment,
        }
    }

    fn from_project(project: &InvestmentProject) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            code: project.code.clone(),
            url: project.url.clone(),
            account_id: project.account_id,
            currency: project.currency.clone(),
            category: project.category.clone(),
            risk: project.risk.clone(),
            is_open: project.is_open,
            start: project.start,
            end: project.end,
            quote_id: project.quote_id.clone(),
            current_price: project.current_price,
            buy_amount: project.buy_amount,
            sell_amount: project.sell_amount,
            amount: project.amount,
            buy_value: project.buy_value,
            sell_value: project.sell_value,
            value: project.value,
            dividends: project.dividends,
            irr: project.irr,
            local_irr: project.local_irr,
            comment: project.comment.clone(),
        }
    }
}

/// Load accounts from `<dir>/accounts.csv`
pub fn load_accounts(dir: &Path) -> Result<Vec<Account>, LedgerError> {
    load_accounts_from_reader(std::fs::File::open(dir.join("accounts.csv"))?)
}

pub fn load_accounts_from_reader<R: Read>(reader: R) -> Result<Vec<Account>, LedgerError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut accounts = Vec::new();
    for result in csv_reader.deserialize() {
        let row: AccountRow = result?;
        accounts.push(Account {
            id: row.id,
            bank: row.bank,
            name: row.name,
            currency: row.currency,
            category: row.category,
            value: row.value,
        });
    }
    Ok(accounts)
}

/// Load account entries from `<dir>/entries.csv`
pub fn load_entries(dir: &Path) -> Result<Vec<AccountEntry>, LedgerError> {
    load_entries_from_reader(std::fs::File::open(dir.join("entries.csv"))?)
}

pub fn load_entries_from_reader<R: Read>(reader: R) -> Result<Vec<AccountEntry>, LedgerError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();
    for result in csv_reader.deserialize() {
        let row: EntryRow = result?;
        entries.push(AccountEntry {
            id: row.id,
            account_id: row.account_id,
            date: row.date,
            flow_category: row.flow_category,
            value: row.value,
            comment: row.comment,
        });
    }
    Ok(entries)
}

/// Load investment projects from `<dir>/projects.csv`
pub fn load_projects(dir: &Path) -> Result<Vec<InvestmentProject>, LedgerError> {
    load_projects_from_reader(std::fs::File::open(dir.join("projects.csv"))?)
}

pub fn load_projects_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<InvestmentProject>, LedgerError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut projects = Vec::new();
    for result in csv_reader.deserialize() {
        let row: ProjectRow = result?;
        projects.push(row.to_project());
    }
    Ok(projects)
}

/// Load transaction records from `<dir>/records.csv`
pub fn load_records(dir: &Path) -> Result<Vec<TransactionRecord>, LedgerError> {
    load_records_from_reader(std::fs::File::open(dir.join("records.csv"))?)
}

pub fn load_records_from_reader<R: Read>(
    reader: R,
) -> Result<Vec<TransactionRecord>, LedgerError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let row: RecordRow = result?;
        records.push(row.to_record()?);
    }
    Ok(records)
}

/// Write accounts back to `<dir>/accounts.csv`
pub fn save_accounts(dir: &Path, accounts: &[Account]) -> Result<(), LedgerError> {
    let mut writer = Writer::from_path(dir.join("accounts.csv"))?;
    for account in accounts {
        writer.serialize(AccountRow {
            id: account.id,
            bank: account.bank.clone(),
            name: account.name.clone(),
            currency: account.currency.clone(),
            category: account.category.clone(),
            value: account.value,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Write projects (with their recomputed aggregates) back to
/// `<dir>/projects.csv`
pub fn save_projects(dir: &Path, projects: &[InvestmentProject]) -> Result<(), LedgerError> {
    let mut writer = Writer::from_path(dir.join("projects.csv"))?;
    for project in projects {
        writer.serialize(ProjectRow::from_project(project))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write transaction records back to `<dir>/records.csv`
pub fn save_records(dir: &Path, records: &[TransactionRecord]) -> Result<(), LedgerError> {
    let mut writer = Writer::from_path(dir.join("records.csv"))?;
    for record in records {
        writer.serialize(RecordRow::from_record(record))?;
    }
    writer.flush()?;
    Ok(())
}
