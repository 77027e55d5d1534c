//! Project balances for a bill file
//!
//! Loads bills and settings, warns about stale projected bills, runs the
//! simulation and writes the day-by-day series for charting.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use bill_projection::bill::{load_bills, DEFAULT_BILLS_PATH};
use bill_projection::report::{
    depletion_windows, irrelevant_notice, summary_title, write_series_csv, write_series_json,
};
use bill_projection::settings::DEFAULT_SETTINGS_PATH;
use bill_projection::{irrelevant_bills, ProjectionEngine, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "project_bills",
    version,
    about = "Project living, emergency and discretionary balances from a bill file"
)]
struct Args {
    /// Bill file
    #[arg(short, long, default_value = DEFAULT_BILLS_PATH)]
    bills: PathBuf,

    /// Settings file (JSON); defaults are used if it does not exist
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Override the simulation start (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Override the simulation end (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Override the present date (YYYY-MM-DD)
    #[arg(long)]
    present: Option<NaiveDate>,

    /// Write the series here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let mut settings = Settings::load_or_default(&args.settings)
        .with_context(|| format!("Failed to load settings from {}", args.settings.display()))?;
    if let Some(date) = args.start {
        settings.simulation_start = date;
    }
    if let Some(date) = args.end {
        settings.simulation_end = date;
    }
    if args.present.is_some() {
        settings.present_date = args.present;
    }
    settings.validate()?;

    let bills = load_bills(&args.bills, settings.projected_by_default)
        .with_context(|| format!("Failed to load bills from {}", args.bills.display()))?;

    let today = Local::now().date_naive();
    let irrelevant = irrelevant_bills(&bills, today);
    for &name in &irrelevant {
        log::warn!("Bill '{}' has no dates on or after {}", name, today);
        eprintln!("{}", irrelevant_notice(name));
    }

    let engine = ProjectionEngine::new(settings.projection_config(today))?;
    let result = engine.simulate(&bills);

    eprintln!("{}", summary_title(&result));
    for window in depletion_windows(&result) {
        eprintln!(
            "  {} from {} to {} ({} days)",
            window.balance,
            window.start,
            window.end,
            window.num_days()
        );
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_output(BufWriter::new(file), &result, &irrelevant, &settings, args.json)?;
            eprintln!("Output written to {}", path.display());
        }
        None => {
            write_output(io::stdout().lock(), &result, &irrelevant, &settings, args.json)?
        }
    }

    log::info!("Total time: {:?}", start.elapsed());
    Ok(())
}

fn write_output<W: io::Write>(
    writer: W,
    result: &bill_projection::ProjectionResult,
    irrelevant: &[&str],
    settings: &Settings,
    json: bool,
) -> Result<()> {
    if json {
        write_series_json(writer, result, irrelevant)?;
    } else {
        write_series_csv(writer, result, settings.plot_total)?;
    }
    Ok(())
}
