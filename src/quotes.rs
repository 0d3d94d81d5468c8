//! Quote sources and the driver registry
//!
//! A quote source resolves an instrument's quote id to a current price.
//! Categories name the driver that prices their projects; the registry maps
//! driver ids to sources and is validated when the ledger is configured,
//! not at call time. Network scrapers live outside this crate; any
//! `QuoteSource` implementation (or a plain closure, via `register_fn`)
//! can be plugged in.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use crate::errors::LedgerError;
use crate::refdata::Category;

/// A possibly-failing external price lookup
pub trait QuoteSource: Send + Sync {
    /// Current price for a quote id; None when the source has no answer
    /// (unreachable, unknown id, stale feed)
    fn fetch(&self, quote_id: &str) -> Option<f64>;
}

/// Adapter turning a bare function into a quote source
struct FnSource<F>(F);

impl<F> QuoteSource for FnSource<F>
where
    F: Fn(&str) -> Option<f64> + Send + Sync,
{
    fn fetch(&self, quote_id: &str) -> Option<f64> {
        (self.0)(quote_id)
    }
}

/// Driver-id to quote-source mapping
#[derive(Default)]
pub struct DriverRegistry {
    sources: HashMap<String, Box<dyn QuoteSource>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, source: Box<dyn QuoteSource>) {
        self.sources.insert(id.into(), source);
    }

    /// Register a capability-typed lookup function as a driver
    pub fn register_fn<F>(&mut self, id: impl Into<String>, fetch: F)
    where
        F: Fn(&str) -> Option<f64> + Send + Sync + 'static,
    {
        self.register(id, Box::new(FnSource(fetch)));
    }

    pub fn get(&self, id: &str) -> Option<&dyn QuoteSource> {
        self.sources.get(id).map(|s| s.as_ref())
    }

    /// Check that every driver referenced by a category is registered
    ///
    /// Run at configuration time so a typo in a category's driver id fails
    /// the setup instead of silently skipping price updates later.
    pub fn validate(&self, categories: &[Category]) -> Result<(), LedgerError> {
        for category in categories {
            if let Some(driver) = &category.driver {
                if !self.sources.contains_key(driver) {
                    return Err(LedgerError::UnknownDriver {
                        category: category.name.clone(),
                        driver: driver.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// File-backed quote source: quote_id,price rows
///
/// Stands in for the out-of-scope network drivers so the update workflow
/// can run from manually maintained or separately fetched quote files.
#[derive(Debug, Clone)]
pub struct CsvQuoteSource {
    prices: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct QuoteRow {
    #[serde(rename = "QuoteId")]
    quote_id: String,
    #[serde(rename = "Price")]
    price: f64,
}

impl CsvQuoteSource {
    pub fn from_path(path: &Path) -> Result<Self, LedgerError> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LedgerError> {
        let mut csv_reader = Reader::from_reader(reader);
        let mut prices = HashMap::new();
        for result in csv_reader.deserialize() {
            let row: QuoteRow = result?;
            prices.insert(row.quote_id, row.price);
        }
        Ok(Self { prices })
    }
}

impl QuoteSource for CsvQuoteSource {
    fn fetch(&self, quote_id: &str) -> Option<f64> {
        self.prices.get(quote_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata::CategoryKind;

    fn category(name: &str, driver: Option<&str>) -> Category {
        Category {
            name: name.to_string(),
            kind: CategoryKind::Investment,
            driver: driver.map(str::to_string),
        }
    }

    #[test]
    fn test_function_source() {
        let mut registry = DriverRegistry::new();
        registry.register_fn("fixed", |id| if id == "known" { Some(42.0) } else { None });

        let source = registry.get("fixed").unwrap();
        assert_eq!(source.fetch("known"), Some(42.0));
        assert_eq!(source.fetch("other"), None);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_validate_accepts_registered_and_driverless() {
        let mut registry = DriverRegistry::new();
        registry.register_fn("sina", |_| None);

        let categories = vec![category("Stocks", Some("sina")), category("Cash", None)];
        assert!(registry.validate(&categories).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_driver() {
        let registry = DriverRegistry::new();
        let categories = vec![category("Stocks", Some("sina"))];

        let err = registry.validate(&categories).unwrap_err();
        match err {
            LedgerError::UnknownDriver { category, driver } => {
                assert_eq!(category, "Stocks");
                assert_eq!(driver, "sina");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_csv_source() {
        let data = "QuoteId,Price\nsh510300,4.12\nXAU,391.5\n";
        let source = CsvQuoteSource::from_reader(data.as_bytes()).unwrap();
        assert_eq!(source.fetch("sh510300"), Some(4.12));
        assert_eq!(source.fetch("missing"), None);
    }
}
