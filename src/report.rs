//! Text output for a finished projection
//!
//! Writes the balance series as CSV or JSON for an external chart renderer
//! and summarises the periods where balances run dry.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::error::Result;
use crate::projection::{BalanceRow, ProjectionResult};

const TITLE_DATE_FORMAT: &str = "%Y %B %d";

/// Category whose balance ran out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepletedBalance {
    Living,
    Discretionary,
}

impl fmt::Display for DepletedBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepletedBalance::Living => write!(f, "Living balance depleted"),
            DepletedBalance::Discretionary => write!(f, "Discretionary balance depleted"),
        }
    }
}

/// Consecutive days (inclusive) on which a balance was zero or negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepletionWindow {
    pub balance: DepletedBalance,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DepletionWindow {
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Windows on or after the present date where living or discretionary is <= 0.
///
/// Each flagged day covers the span up to the next row, so the final row
/// never opens a window. Days before the present are history and are not
/// flagged. Living windows are listed before discretionary ones, each in
/// date order.
pub fn depletion_windows(result: &ProjectionResult) -> Vec<DepletionWindow> {
    let spans = result.rows.len().saturating_sub(1);
    let upcoming: Vec<&BalanceRow> = result.rows[..spans]
        .iter()
        .filter(|r| r.date >= result.present_date)
        .collect();

    let mut windows = runs(&upcoming, DepletedBalance::Living, |r| r.living <= 0.0);
    windows.extend(runs(&upcoming, DepletedBalance::Discretionary, |r| {
        r.discretionary <= 0.0
    }));
    windows
}

fn runs(
    rows: &[&BalanceRow],
    balance: DepletedBalance,
    depleted: impl Fn(&BalanceRow) -> bool,
) -> Vec<DepletionWindow> {
    let mut windows = Vec::new();
    let mut current: Option<DepletionWindow> = None;

    for &row in rows {
        if depleted(row) {
            match current.as_mut() {
                Some(window) => window.end = row.date,
                None => {
                    current = Some(DepletionWindow {
                        balance,
                        start: row.date,
                        end: row.date,
                    })
                }
            }
        } else if let Some(window) = current.take() {
            windows.push(window);
        }
    }
    windows.extend(current);
    windows
}

/// Two-line chart title: the simulated range and the present balance
pub fn summary_title(result: &ProjectionResult) -> String {
    let (start, end) = match (result.simulated().first(), result.simulated().last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => (result.present_date, result.present_date),
    };
    let balance = match result.present_balance {
        Some(balance) => format!("${balance:.2}"),
        None => "n/a".to_string(),
    };
    format!(
        "Projected budget from {} to {}\nCurrent balance {} as of {}",
        start.format(TITLE_DATE_FORMAT),
        end.format(TITLE_DATE_FORMAT),
        balance,
        result.present_date.format(TITLE_DATE_FORMAT)
    )
}

/// Notice printed for each irrelevant projected bill
pub fn irrelevant_notice(name: &str) -> String {
    format!("/!\\ NOTICE: Bill '{name}' is irrelevant, as all of its dates are in the past.")
}

/// Write the series as CSV, one row per day including the seed row
pub fn write_series_csv<W: Write>(
    writer: W,
    result: &ProjectionResult,
    include_total: bool,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date", "living", "emergency", "discretionary"];
    if include_total {
        header.push("total");
    }
    wtr.write_record(&header)?;

    for row in &result.rows {
        let mut record = vec![
            row.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", row.living),
            format!("{:.2}", row.emergency),
            format!("{:.2}", row.discretionary),
        ];
        if include_total {
            record.push(format!("{:.2}", row.total()));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Everything the chart renderer needs from one run
#[derive(Debug, Serialize)]
struct SeriesOutput<'a> {
    #[serde(flatten)]
    result: &'a ProjectionResult,
    irrelevant_bills: &'a [&'a str],
}

/// Write the full result as pretty JSON, with the names of irrelevant
/// projected bills alongside the series
pub fn write_series_json<W: Write>(
    writer: W,
    result: &ProjectionResult,
    irrelevant_bills: &[&str],
) -> Result<()> {
    let output = SeriesOutput {
        result,
        irrelevant_bills,
    };
    serde_json::to_writer_pretty(writer, &output)?;
    Ok(())
}
