//! Ledger entities: accounts, account entries, investment projects, and
//! transaction records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of an investment transaction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Buy,
    Sell,
    Dividend,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Buy => "Buy",
            RecordKind::Sell => "Sell",
            RecordKind::Dividend => "Dividend",
        }
    }
}

/// A bank account in a single currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u32,
    pub bank: String,
    pub name: String,
    pub currency: String,
    pub category: String,

    /// Current balance in the account currency
    pub value: f64,
}

/// A dated income or expense posting against an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub id: u32,
    pub account_id: u32,
    pub date: NaiveDate,

    /// Name of the owning FlowCategory
    pub flow_category: String,

    pub value: f64,
    pub comment: Option<String>,
}

/// An investment project: a position in one instrument, held in one
/// currency, with its full transaction history
///
/// The `buy_*`/`sell_*`/`amount`/`value`/`dividends` fields and the two IRR
/// fields are derived aggregates. They are recomputed from the record set by
/// `RecomputeEngine::recompute` and must never be hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProject {
    pub id: u32,
    pub name: String,
    pub code: Option<String>,
    pub url: Option<String>,
    pub account_id: u32,
    pub currency: String,
    pub category: String,
    pub risk: String,

    /// Open = still held; Closed = fully liquidated
    pub is_open: bool,

    /// Earliest record date; set by recompute
    #[serde(default)]
    pub start: Option<NaiveDate>,

    /// Latest record date, only meaningful once closed; set by recompute
    #[serde(default)]
    pub end: Option<NaiveDate>,

    /// Identifier passed to the quote driver for this project's category
    pub quote_id: Option<String>,

    /// Latest known market price per unit, if any
    pub current_price: Option<f64>,

    #[serde(default)]
    pub buy_amount: f64,
    #[serde(default)]
    pub sell_amount: f64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub buy_value: f64,
    #[serde(default)]
    pub sell_value: f64,

    /// Net cost value: buy_value - sell_value - dividends
    #[serde(default)]
    pub value: f64,

    #[serde(default)]
    pub dividends: f64,

    /// Annualized money-weighted return in the project currency, percent
    #[serde(default)]
    pub irr: Option<f64>,

    /// Annualized money-weighted return in the home currency, percent
    #[serde(default)]
    pub local_irr: Option<f64>,

    pub comment: Option<String>,
}

impl InvestmentProject {
    /// Create a project with empty history and zeroed aggregates
    pub fn new(
        id: u32,
        name: impl Into<String>,
        account_id: u32,
        currency: impl Into<String>,
        category: impl Into<String>,
        risk: impl Into<String>,
        is_open: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            code: None,
            url: None,
            account_id,
            currency: currency.into(),
            category: category.into(),
            risk: risk.into(),
            is_open,
            start: None,
            end: None,
            quote_id: None,
            current_price: None,
            buy_amount: 0.0,
            sell_amount: 0.0,
            amount: 0.0,
            buy_value: 0.0,
            sell_value: 0.0,
            value: 0.0,
            dividends: 0.0,
            irr: None,
            local_irr: None,
            comment: None,
        }
    }

    /// Market value of the held amount, for open projects with a price
    pub fn market_value(&self) -> Option<f64> {
        if !self.is_open {
            return None;
        }
        self.current_price.map(|price| self.amount * price)
    }

    /// Unrealized-plus-realized net worth of the project: market value of
    /// the holding minus its net cost
    pub fn net_value(&self) -> f64 {
        -self.value + self.market_value().unwrap_or(0.0)
    }

    /// Average unit price paid across all buys
    pub fn buy_price(&self) -> Option<f64> {
        if self.buy_amount != 0.0 {
            Some(self.buy_value / self.buy_amount)
        } else {
            None
        }
    }

    /// Average unit price received across all sells
    pub fn sell_price(&self) -> Option<f64> {
        if self.sell_amount != 0.0 {
            Some(self.sell_value / self.sell_amount)
        } else {
            None
        }
    }

    /// Net cost per unit still held
    pub fn avg_price(&self) -> Option<f64> {
        if self.amount != 0.0 {
            Some(self.value / self.amount)
        } else {
            None
        }
    }

    /// Percent gain of the current market value over the net cost
    pub fn net_value_rate(&self) -> Option<f64> {
        let market = self.market_value()?;
        if self.value != 0.0 {
            Some(100.0 * market / self.value - 100.0)
        } else {
            None
        }
    }

    /// Percent return of everything received (sells, dividends, market
    /// value) over everything paid for buys
    pub fn buy_sell_rate(&self) -> Option<f64> {
        if self.buy_value == 0.0 {
            return None;
        }
        let income = self.sell_value + self.dividends + self.market_value().unwrap_or(0.0);
        Some(100.0 * income / self.buy_value - 100.0)
    }

    /// Days the project has been held, up to `as_of` while open
    pub fn duration(&self, as_of: NaiveDate) -> i64 {
        match self.start {
            Some(start) => (self.end.unwrap_or(as_of) - start).num_days(),
            None => 0,
        }
    }
}

/// One transaction against an investment project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: u32,
    pub project_id: u32,
    pub date: NaiveDate,
    pub kind: RecordKind,

    /// Units transacted (shares, grams, ...)
    pub amount: f64,

    /// Unit price, excluding commission
    pub price: Option<f64>,

    /// Total money moved: amount * price + commission
    pub value: Option<f64>,

    pub commission: Option<f64>,

    /// Home-currency units per project-currency unit at transaction time;
    /// used only for the home-currency IRR variant
    pub rate: Option<f64>,
}

impl TransactionRecord {
    pub fn new(id: u32, project_id: u32, date: NaiveDate, kind: RecordKind, amount: f64) -> Self {
        Self {
            id,
            project_id,
            date,
            kind,
            amount,
            price: None,
            value: None,
            commission: None,
            rate: None,
        }
    }

    /// Back-fill the one missing member of {price, value, commission} from
    /// the other two via `value = amount * price + commission`
    ///
    /// Dividend records are left untouched. Fields already present are never
    /// overwritten, so a second call is a no-op.
    pub fn auto_complete(&mut self) {
        if self.kind == RecordKind::Dividend {
            return;
        }
        match (self.price, self.value, self.commission) {
            (Some(price), Some(value), None) => {
                self.commission = Some(value - self.amount * price);
            }
            (Some(price), None, Some(commission)) => {
                self.value = Some(commission + self.amount * price);
            }
            (None, Some(value), Some(commission)) if self.amount != 0.0 => {
                self.price = Some((value - commission) / self.amount);
            }
            _ => {}
        }
    }

    /// Effect of this record on the owning account's balance: buys draw
    /// money out, sells and dividends pay money in
    pub fn account_effect(&self) -> f64 {
        let value = self.value.unwrap_or(0.0);
        match self.kind {
            RecordKind::Buy => -value,
            RecordKind::Sell | RecordKind::Dividend => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RecordKind) -> TransactionRecord {
        TransactionRecord::new(
            1,
            1,
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            kind,
            100.0,
        )
    }

    #[test]
    fn test_auto_complete_value() {
        let mut r = record(RecordKind::Buy);
        r.price = Some(10.0);
        r.commission = Some(0.0);
        r.auto_complete();
        assert_eq!(r.value, Some(1000.0));
    }

    #[test]
    fn test_auto_complete_commission() {
        let mut r = record(RecordKind::Buy);
        r.price = Some(10.0);
        r.value = Some(1050.0);
        r.auto_complete();
        assert_eq!(r.commission, Some(50.0));
    }

    #[test]
    fn test_auto_complete_price() {
        let mut r = record(RecordKind::Sell);
        r.value = Some(1050.0);
        r.commission = Some(50.0);
        r.auto_complete();
        assert_eq!(r.price, Some(10.0));
    }

    #[test]
    fn test_auto_complete_is_idempotent_and_preserving() {
        let mut r = record(RecordKind::Buy);
        r.price = Some(10.0);
        r.value = Some(1050.0);
        r.commission = Some(7.0); // all three present: nothing to fill
        let before = r.clone();
        r.auto_complete();
        r.auto_complete();
        assert_eq!(r, before);
    }

    #[test]
    fn test_auto_complete_skips_dividends() {
        let mut r = record(RecordKind::Dividend);
        r.price = Some(10.0);
        r.commission = Some(0.0);
        r.auto_complete();
        assert_eq!(r.value, None);
    }

    #[test]
    fn test_auto_complete_leaves_underspecified_records() {
        let mut r = record(RecordKind::Buy);
        r.price = Some(10.0); // value and commission both missing
        r.auto_complete();
        assert_eq!(r.value, None);
        assert_eq!(r.commission, None);
    }

    #[test]
    fn test_account_effect_signs() {
        let mut buy = record(RecordKind::Buy);
        buy.value = Some(1000.0);
        assert_eq!(buy.account_effect(), -1000.0);

        let mut sell = record(RecordKind::Sell);
        sell.value = Some(400.0);
        assert_eq!(sell.account_effect(), 400.0);

        let mut dividend = record(RecordKind::Dividend);
        dividend.value = Some(30.0);
        assert_eq!(dividend.account_effect(), 30.0);
    }

    #[test]
    fn test_net_value_open_project() {
        let mut p = InvestmentProject::new(1, "fund", 1, "CNY", "Funds", "low", true);
        p.amount = 100.0;
        p.value = 1000.0;
        p.current_price = Some(12.0);
        assert_eq!(p.market_value(), Some(1200.0));
        assert_eq!(p.net_value(), 200.0);
    }

    #[test]
    fn test_price_metrics_guard_zero_divisors() {
        let p = InvestmentProject::new(1, "fund", 1, "CNY", "Funds", "low", true);
        assert_eq!(p.avg_price(), None);
        assert_eq!(p.buy_price(), None);
        assert_eq!(p.sell_price(), None);
        assert_eq!(p.buy_sell_rate(), None);
        assert_eq!(p.net_value_rate(), None);
    }

    #[test]
    fn test_avg_price() {
        let mut p = InvestmentProject::new(1, "fund", 1, "CNY", "Funds", "low", true);
        p.amount = 100.0;
        p.value = 1050.0;
        assert_eq!(p.avg_price(), Some(10.5));
    }

    #[test]
    fn test_duration() {
        let mut p = InvestmentProject::new(1, "fund", 1, "CNY", "Funds", "low", true);
        let as_of = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        assert_eq!(p.duration(as_of), 0);

        p.start = Some(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(p.duration(as_of), 364);

        p.end = Some(NaiveDate::from_ymd_opt(2021, 7, 1).unwrap());
        assert_eq!(p.duration(as_of), 181);
    }
}
