//! Reference tables: currencies, categories, banks, and risk grades

mod category;
mod currency;
pub mod loader;

pub use category::{Bank, Category, CategoryKind, FlowCategory, FlowKind, Risk};
pub use currency::{Currency, CurrencyTable};

use std::path::Path;

use crate::errors::LedgerError;

/// Container for all reference tables
#[derive(Debug, Clone)]
pub struct RefData {
    pub currencies: CurrencyTable,
    pub categories: Vec<Category>,
    pub flow_categories: Vec<FlowCategory>,
    pub banks: Vec<Bank>,
    pub risks: Vec<Risk>,
}

impl RefData {
    /// Minimal in-memory tables: the home currency and nothing else
    pub fn default_home() -> Self {
        Self {
            currencies: CurrencyTable::home_only(CurrencyTable::DEFAULT_HOME),
            categories: Vec::new(),
            flow_categories: Vec::new(),
            banks: Vec::new(),
            risks: Vec::new(),
        }
    }

    /// Load all reference tables from CSV files in a directory
    pub fn from_csv_path(dir: &Path) -> Result<Self, LedgerError> {
        Ok(Self {
            currencies: CurrencyTable::new(CurrencyTable::DEFAULT_HOME, loader::load_currencies(dir)?),
            categories: loader::load_categories(dir)?,
            flow_categories: loader::load_flow_categories(dir)?,
            banks: loader::load_banks(dir)?,
            risks: loader::load_risks(dir)?,
        })
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn flow_category(&self, name: &str) -> Option<&FlowCategory> {
        self.flow_categories.iter().find(|c| c.name == name)
    }
}
