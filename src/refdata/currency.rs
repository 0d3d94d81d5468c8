//! Currencies and home-currency conversion

use serde::{Deserialize, Serialize};

/// A currency and its exchange rate into the home currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// Currency name, e.g. "USD"
    pub name: String,

    /// Home-currency units per unit of this currency
    pub rate: f64,
}

/// Currency lookup table with a designated home (reporting) currency
///
/// All consolidated totals are expressed in the home currency. The home
/// currency always converts at 1, whether or not it appears in the table.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    home: String,
    currencies: Vec<Currency>,
}

impl CurrencyTable {
    /// Default home currency name
    pub const DEFAULT_HOME: &'static str = "CNY";

    pub fn new(home: impl Into<String>, currencies: Vec<Currency>) -> Self {
        Self {
            home: home.into(),
            currencies,
        }
    }

    /// Table containing only the home currency at rate 1
    pub fn home_only(home: impl Into<String>) -> Self {
        let home = home.into();
        let currencies = vec![Currency {
            name: home.clone(),
            rate: 1.0,
        }];
        Self { home, currencies }
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn is_home(&self, name: &str) -> bool {
        self.home == name
    }

    pub fn get(&self, name: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.name == name)
    }

    /// Home-currency units per unit of `name`
    ///
    /// The home currency itself is always 1. Unknown currencies return None;
    /// callers decide whether to skip or fall back to unconverted values.
    pub fn rate_of(&self, name: &str) -> Option<f64> {
        if self.is_home(name) {
            return Some(1.0);
        }
        self.get(name).map(|c| c.rate)
    }

    /// Update the stored rate for a currency, returning false when the
    /// currency is not in the table
    pub fn set_rate(&mut self, name: &str, rate: f64) -> bool {
        match self.currencies.iter_mut().find(|c| c.name == name) {
            Some(c) => {
                c.rate = rate;
                true
            }
            None => false,
        }
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CurrencyTable {
        CurrencyTable::new(
            "CNY",
            vec![
                Currency { name: "CNY".into(), rate: 1.0 },
                Currency { name: "USD".into(), rate: 6.5 },
            ],
        )
    }

    #[test]
    fn test_rate_lookup() {
        let t = table();
        assert_eq!(t.rate_of("USD"), Some(6.5));
        assert_eq!(t.rate_of("CNY"), Some(1.0));
        assert_eq!(t.rate_of("EUR"), None);
    }

    #[test]
    fn test_home_rate_is_one_even_when_unlisted() {
        let t = CurrencyTable::new("CNY", vec![Currency { name: "USD".into(), rate: 6.5 }]);
        assert_eq!(t.rate_of("CNY"), Some(1.0));
    }

    #[test]
    fn test_set_rate() {
        let mut t = table();
        assert!(t.set_rate("USD", 7.2));
        assert_eq!(t.rate_of("USD"), Some(7.2));
        assert!(!t.set_rate("EUR", 8.0));
    }
}
