//! Print the balance sheet: category values by currency with consolidated
//! home-currency totals and the liquidity/debt ratios
//!
//! Supports JSON output for downstream tooling via --json

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;

use invest_ledger::ledger::loader::DEFAULT_LEDGER_PATH;
use invest_ledger::reports::balance_sheet;
use invest_ledger::{Ledger, LedgerService};

#[derive(Parser)]
#[command(name = "balance_sheet", about = "Print the balance sheet")]
struct Args {
    /// Ledger data directory
    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    data_dir: PathBuf,

    /// Valuation date for the recompute pass; defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let ledger = Ledger::from_csv_path(&args.data_dir)
        .with_context(|| format!("loading ledger from {}", args.data_dir.display()))?;

    // Refresh aggregates so open-project values reflect the record sets
    let mut service = LedgerService::new(ledger);
    service.recompute_all(as_of);

    let sheet = balance_sheet(service.ledger());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sheet)?);
        return Ok(());
    }

    print!("{:<20}", "Category");
    for currency in &sheet.currencies {
        print!(" {:>14}", currency);
    }
    println!(" {:>14}", "Total");
    println!("{}", "-".repeat(21 + 15 * (sheet.currencies.len() + 1)));

    for section in &sheet.sections {
        if section.rows.is_empty() {
            continue;
        }
        println!("[{}]", section.kind.as_str());
        for row in &section.rows {
            print!("{:<20}", row.category);
            for value in &row.values {
                print!(" {:>14.2}", value);
            }
            println!();
        }
        print!("{:<20}", "  subtotal");
        for value in &section.subtotal {
            print!(" {:>14.2}", value);
        }
        println!();
    }

    println!("{}", "-".repeat(21 + 15 * (sheet.currencies.len() + 1)));
    for (label, values) in [
        ("Assets", &sheet.assets),
        ("Liabilities", &sheet.liabilities),
        ("Equity", &sheet.equity),
    ] {
        print!("{:<20}", label);
        for value in values {
            print!(" {:>14.2}", value);
        }
        println!();
    }

    println!();
    match sheet.liquidity_ratio {
        Some(ratio) => println!("Liquidity ratio: {:.2}", ratio),
        None => println!("Liquidity ratio: n/a (no current liabilities)"),
    }
    match sheet.debt_asset_ratio {
        Some(ratio) => println!("Debt/asset ratio: {:.2}%", ratio),
        None => println!("Debt/asset ratio: n/a"),
    }

    Ok(())
}
