//! Print the trailing-year income/outgoing statement and the monthly
//! income and outgoing detail pivots

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;

use invest_ledger::ledger::loader::DEFAULT_LEDGER_PATH;
use invest_ledger::reports::{income_details, income_outgoing_sheet, outgoing_details, MonthlyPivot};
use invest_ledger::{Ledger, LedgerService};

#[derive(Parser)]
#[command(name = "income_sheet", about = "Print income/outgoing reports")]
struct Args {
    /// Ledger data directory
    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    data_dir: PathBuf,

    /// End of the trailing-year window; defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Skip the monthly detail pivots
    #[arg(long)]
    summary_only: bool,
}

fn fmt_opt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "n/a".to_string(),
    }
}

fn print_pivot(title: &str, pivot: &MonthlyPivot) {
    println!("\n{title}:");
    if pivot.months.is_empty() {
        println!("  (no data)");
        return;
    }

    print!("{:<10}", "Month");
    for column in &pivot.columns {
        print!(" {:>12}", column);
    }
    println!(" {:>12}", "Total");

    for (month, (row, total)) in pivot
        .months
        .iter()
        .zip(pivot.cells.iter().zip(&pivot.totals))
    {
        print!("{:<10}", month.format("%Y-%m").to_string());
        for value in row {
            print!(" {:>12.2}", value);
        }
        println!(" {:>12.2}", total);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let ledger = Ledger::from_csv_path(&args.data_dir)
        .with_context(|| format!("loading ledger from {}", args.data_dir.display()))?;

    let mut service = LedgerService::new(ledger);
    service.recompute_all(as_of);
    let ledger = service.ledger();

    let statement = income_outgoing_sheet(ledger, as_of);

    println!("Income and outgoing, year to {as_of}:\n");
    println!("Income:");
    for row in &statement.income {
        println!("  {:<20} {:>12.2}", row.name, row.value);
    }
    println!("  {:<20} {:>12.2}", "subtotal", statement.income_total);

    println!("Investments (closed in window):");
    for row in &statement.investments {
        println!("  {:<20} {:>12.2}", row.name, row.value);
    }
    println!("  {:<20} {:>12.2}", "subtotal", statement.investments_total);

    println!("Outgoing:");
    for row in &statement.outgoing {
        println!("  {:<20} {:>12.2}", row.name, row.value);
    }
    println!("  {:<20} {:>12.2}", "subtotal", statement.outgoing_total);

    println!();
    println!("Total income:        {:>12.2}", statement.total_income);
    println!("Total outgoing:      {:>12.2}", statement.outgoing_total);
    println!("Net income:          {:>12.2}", statement.net_income);
    println!("Saving rate:         {:>12}", fmt_opt_pct(statement.saving_rate));
    println!("Invest/income rate:  {:>12}", fmt_opt_pct(statement.invest_income_rate));
    println!("Invest/outgoing:     {:>12}", fmt_opt_pct(statement.invest_outgoing_rate));
    println!("Invest annual rate:  {:>12}", fmt_opt_pct(statement.invest_rate));

    if !args.summary_only {
        print_pivot("Income details by month", &income_details(ledger));
        print_pivot("Outgoing details by month", &outgoing_details(ledger));
    }

    Ok(())
}
