//! Invest Ledger CLI
//!
//! Loads a ledger directory, recomputes every project's aggregates and
//! returns, and prints the project table

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;

use invest_ledger::ledger::loader::DEFAULT_LEDGER_PATH;
use invest_ledger::{Ledger, LedgerService};

#[derive(Parser)]
#[command(name = "invest_ledger", about = "Recompute and list investment projects")]
struct Args {
    /// Ledger data directory
    #[arg(long, default_value = DEFAULT_LEDGER_PATH)]
    data_dir: PathBuf,

    /// Valuation date for open positions; defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Write recomputed aggregates back to the data directory
    #[arg(long)]
    save: bool,

    /// Also write the project table to this CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let start = Instant::now();
    let ledger = Ledger::from_csv_path(&args.data_dir)
        .with_context(|| format!("loading ledger from {}", args.data_dir.display()))?;
    println!(
        "Loaded {} projects, {} records, {} accounts in {:?}",
        ledger.projects.len(),
        ledger.records.len(),
        ledger.accounts.len(),
        start.elapsed()
    );

    let mut service = LedgerService::new(ledger);
    let recompute_start = Instant::now();
    service.recompute_all(as_of);
    println!("Recomputed all projects in {:?}\n", recompute_start.elapsed());

    println!(
        "{:<24} {:>4} {:>6} {:>12} {:>12} {:>12} {:>10} {:>9} {:>9} {:>6}",
        "Project", "Cur", "Open", "Amount", "Value", "NetValue", "AvgPrice", "IRR%", "LocIRR%", "Days"
    );
    println!("{}", "-".repeat(112));

    for project in &service.ledger().projects {
        println!(
            "{:<24} {:>4} {:>6} {:>12.4} {:>12.2} {:>12.2} {:>10} {:>9} {:>9} {:>6}",
            project.name,
            project.currency,
            if project.is_open { "open" } else { "closed" },
            project.amount,
            project.value,
            project.net_value(),
            fmt_opt(project.avg_price(), 4),
            fmt_opt(project.irr, 2),
            fmt_opt(project.local_irr, 2),
            project.duration(as_of),
        );
    }

    // Consolidated totals in the home currency
    let ledger = service.ledger();
    let currencies = &ledger.refdata.currencies;
    let total_net: f64 = ledger
        .projects
        .iter()
        .filter(|p| p.is_open)
        .map(|p| p.net_value() * currencies.rate_of(&p.currency).unwrap_or(1.0))
        .sum();
    let total_dividends: f64 = ledger.projects.iter().map(|p| p.dividends).sum();

    println!("\nSummary:");
    println!("  Open projects: {}", ledger.projects.iter().filter(|p| p.is_open).count());
    println!("  Net value of open positions ({}): {:.2}", currencies.home(), total_net);
    println!("  Dividends received (all projects, mixed currencies): {:.2}", total_dividends);

    if let Some(path) = &args.csv_out {
        let mut file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        writeln!(
            file,
            "Project,Currency,IsOpen,Amount,Value,NetValue,AvgPrice,Irr,LocalIrr,Days"
        )?;
        for project in &ledger.projects {
            writeln!(
                file,
                "{},{},{},{:.4},{:.2},{:.2},{},{},{},{}",
                project.name,
                project.currency,
                project.is_open,
                project.amount,
                project.value,
                project.net_value(),
                fmt_opt(project.avg_price(), 4),
                fmt_opt(project.irr, 4),
                fmt_opt(project.local_irr, 4),
                project.duration(as_of),
            )?;
        }
        println!("\nProject table written to: {}", path.display());
    }

    if args.save {
        ledger.save_csv_path(&args.data_dir)?;
        println!("Recomputed aggregates saved to {}", args.data_dir.display());
    }

    Ok(())
}
