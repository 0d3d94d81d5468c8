//! Ledger aggregate and the application service
//!
//! `Ledger` is the whole data set held in memory; `LedgerService` exposes
//! record mutations as explicit operations. Applying or retracting a
//! transaction adjusts the owning account's balance and recomputes the
//! owning project's aggregates as one unit, so derived fields never drift
//! from the record set.

use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::RecomputeEngine;
use crate::errors::LedgerError;
use crate::ledger::{loader, Account, AccountEntry, InvestmentProject, TransactionRecord};
use crate::quotes::{DriverRegistry, QuoteSource};
use crate::refdata::{self, RefData};

/// The full data set: reference tables plus all entities
#[derive(Debug, Clone)]
pub struct Ledger {
    pub refdata: RefData,
    pub accounts: Vec<Account>,
    pub entries: Vec<AccountEntry>,
    pub projects: Vec<InvestmentProject>,
    pub records: Vec<TransactionRecord>,
}

impl Ledger {
    /// Load reference tables and entities from one CSV directory
    pub fn from_csv_path(dir: &Path) -> Result<Self, LedgerError> {
        Ok(Self {
            refdata: RefData::from_csv_path(dir)?,
            accounts: loader::load_accounts(dir)?,
            entries: loader::load_entries(dir)?,
            projects: loader::load_projects(dir)?,
            records: loader::load_records(dir)?,
        })
    }

    /// Write the mutable parts (accounts, projects, records, currency
    /// rates) back to the CSV directory
    pub fn save_csv_path(&self, dir: &Path) -> Result<(), LedgerError> {
        loader::save_accounts(dir, &self.accounts)?;
        loader::save_projects(dir, &self.projects)?;
        loader::save_records(dir, &self.records)?;
        refdata::loader::save_currencies(dir, self.refdata.currencies.currencies())?;
        Ok(())
    }

    pub fn project(&self, id: u32) -> Option<&InvestmentProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn account(&self, id: u32) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// The record set of one project, cloned out so the project itself can
    /// be mutated while recomputing
    pub fn records_of(&self, project_id: u32) -> Vec<TransactionRecord> {
        self.records
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect()
    }

    fn next_record_id(&self) -> u32 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }
}

/// Application service over a loaded ledger
pub struct LedgerService {
    ledger: Ledger,
}

impl LedgerService {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    fn engine(&self) -> RecomputeEngine {
        RecomputeEngine::new(self.ledger.refdata.currencies.clone())
    }

    /// Record a transaction: auto-complete it, move the money on the owning
    /// account, store it, and recompute the owning project
    ///
    /// The record id is assigned here; the caller's id field is ignored.
    /// A record still missing two of {price, value, commission} after
    /// auto-completion is rejected before anything is mutated.
    pub fn apply_transaction(
        &mut self,
        mut record: TransactionRecord,
        as_of: NaiveDate,
    ) -> Result<u32, LedgerError> {
        record.auto_complete();
        if record.value.is_none() {
            return Err(LedgerError::IncompleteRecord(record.id));
        }

        let account_id = self
            .ledger
            .project(record.project_id)
            .ok_or(LedgerError::UnknownProject(record.project_id))?
            .account_id;
        let account = self
            .ledger
            .accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or(LedgerError::UnknownAccount(account_id))?;

        account.value += record.account_effect();

        record.id = self.ledger.next_record_id();
        let record_id = record.id;
        let project_id = record.project_id;
        self.ledger.records.push(record);
        self.recompute_project(project_id, as_of)?;

        info!("applied transaction {record_id} to project {project_id}");
        Ok(record_id)
    }

    /// Remove a transaction, reversing its account-balance effect, and
    /// recompute the owning project
    pub fn retract_transaction(
        &mut self,
        record_id: u32,
        as_of: NaiveDate,
    ) -> Result<TransactionRecord, LedgerError> {
        let index = self
            .ledger
            .records
            .iter()
            .position(|r| r.id == record_id)
            .ok_or(LedgerError::UnknownRecord(record_id))?;
        let record = self.ledger.records.remove(index);

        let account_id = self
            .ledger
            .project(record.project_id)
            .ok_or(LedgerError::UnknownProject(record.project_id))?
            .account_id;
        if let Some(account) = self.ledger.accounts.iter_mut().find(|a| a.id == account_id) {
            account.value -= record.account_effect();
        }

        self.recompute_project(record.project_id, as_of)?;

        info!("retracted transaction {record_id} from project {}", record.project_id);
        Ok(record)
    }

    fn recompute_project(&mut self, project_id: u32, as_of: NaiveDate) -> Result<(), LedgerError> {
        let engine = self.engine();
        let records = self.ledger.records_of(project_id);
        let project = self
            .ledger
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or(LedgerError::UnknownProject(project_id))?;
        engine.recompute(project, &records, as_of);
        Ok(())
    }

    /// Recompute every project's aggregates from scratch
    ///
    /// Record sets of distinct projects are disjoint, so projects are
    /// processed in parallel.
    pub fn recompute_all(&mut self, as_of: NaiveDate) {
        let engine = self.engine();
        let records = std::mem::take(&mut self.ledger.records);
        let projects = std::mem::take(&mut self.ledger.projects);

        self.ledger.projects = projects
            .into_par_iter()
            .map(|mut project| {
                let project_records: Vec<TransactionRecord> = records
                    .iter()
                    .filter(|r| r.project_id == project.id)
                    .cloned()
                    .collect();
                engine.recompute(&mut project, &project_records, as_of);
                project
            })
            .collect();

        self.ledger.records = records;
    }

    /// Refresh stored exchange rates from a quote source, keyed by currency
    /// name; a fetch miss leaves the old rate in place
    pub fn update_currency_rates(&mut self, source: &dyn QuoteSource) -> usize {
        let names: Vec<String> = self
            .ledger
            .refdata
            .currencies
            .currencies()
            .iter()
            .map(|c| c.name.clone())
            .filter(|name| !self.ledger.refdata.currencies.is_home(name))
            .collect();

        let mut updated = 0;
        for name in names {
            match source.fetch(&name) {
                Some(rate) => {
                    self.ledger.refdata.currencies.set_rate(&name, rate);
                    updated += 1;
                }
                None => debug!("no rate quote for {name}, keeping stored rate"),
            }
        }
        updated
    }

    /// Refresh current prices of quoted projects through the registry and
    /// recompute those that changed; a fetch miss retains the prior price
    pub fn update_project_prices(&mut self, registry: &DriverRegistry, as_of: NaiveDate) -> usize {
        let mut updated = 0;

        for index in 0..self.ledger.projects.len() {
            let (project_id, quote_id, driver) = {
                let project = &self.ledger.projects[index];
                let Some(quote_id) = project.quote_id.clone() else {
                    continue;
                };
                let Some(category) = self.ledger.refdata.category(&project.category) else {
                    continue;
                };
                let Some(driver) = category.driver.clone() else {
                    continue;
                };
                (project.id, quote_id, driver)
            };

            let Some(source) = registry.get(&driver) else {
                // validate() makes this unreachable for checked registries
                warn!("quote driver {driver} not registered, skipping project {project_id}");
                continue;
            };

            match source.fetch(&quote_id) {
                Some(price) => {
                    self.ledger.projects[index].current_price = Some(price);
                    // Project is known to exist at this index
                    let _ = self.recompute_project(project_id, as_of);
                    updated += 1;
                }
                None => debug!("no quote for {quote_id}, price retained"),
            }
        }
        updated
    }
}
