//! Refresh exchange rates and project prices from a quotes file, then
//! recompute and save the ledger
//!
//! The quotes file is a QuoteId,Price CSV maintained by hand or by an
//! external fetcher. Every driver id referenced by the categories is bound
//! to it, and currency rates are looked up by currency name.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::info;

use invest_ledger::ledger::loader::DEFAULT_LEDGER_PATH;
use invest_ledger::{CsvQuoteSource, DriverRegistry, Ledger, LedgerService};

#[derive(Parser)]
#[command(name = "update_quotes", about = "Refresh prices and exchange rates")]
struct Args {
    /// Ledger data directory
    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    data_dir: PathBuf,

    /// Quotes file (QuoteId,Price); defaults to quotes.csv in the data dir
    #[arg(long)]
    quotes: Option<PathBuf>,

    /// Valuation date; defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Update in memory but do not write anything back
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let quotes_path = args
        .quotes
        .clone()
        .unwrap_or_else(|| args.data_dir.join("quotes.csv"));

    let ledger = Ledger::from_csv_path(&args.data_dir)
        .with_context(|| format!("loading ledger from {}", args.data_dir.display()))?;
    let source = CsvQuoteSource::from_path(&quotes_path)
        .with_context(|| format!("loading quotes from {}", quotes_path.display()))?;

    // Bind every driver id the categories reference to the quotes file,
    // then validate so a typo in a category fails here rather than being
    // skipped silently during the update
    let driver_ids: BTreeSet<String> = ledger
        .refdata
        .categories
        .iter()
        .filter_map(|c| c.driver.clone())
        .collect();
    let mut registry = DriverRegistry::new();
    for id in &driver_ids {
        registry.register(id.clone(), Box::new(source.clone()));
    }
    registry.validate(&ledger.refdata.categories)?;
    info!("registered {} quote drivers", driver_ids.len());

    let mut service = LedgerService::new(ledger);

    let rates = service.update_currency_rates(&source);
    let prices = service.update_project_prices(&registry, as_of);
    println!("Updated {rates} currency rates and {prices} project prices");

    if args.dry_run {
        println!("Dry run: nothing written");
        return Ok(());
    }

    service.ledger().save_csv_path(&args.data_dir)?;
    println!("Ledger saved to {}", args.data_dir.display());

    Ok(())
}
