//! Bill file loading
//!
//! One bill per line: `name, amount, YYYY-MM-DD[, rule]*`. Lines starting with
//! `#` and blank lines are skipped. Rules:
//!
//! - `every N days` / `every N months`
//! - `until YYYY-MM-DD`
//! - `occurs N` (at most N dates) / `repeat N`, `repeats N` (at most N + 1)
//! - `distribution D E L` (percentages for discretionary, emergency, living)
//! - `actual` / `projected`
//!
//! Loading is all-or-nothing: the first bad line fails the whole file.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{Bill, BillSpec, Recurrence, Split};
use crate::error::{ProjectionError, Result};

/// Default bill file, relative to the working directory
pub const DEFAULT_BILLS_PATH: &str = "sample_bills.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load bills from a file
///
/// `projected_by_default` decides the mode of bills that state neither
/// `actual` nor `projected`.
pub fn load_bills<P: AsRef<Path>>(path: P, projected_by_default: bool) -> Result<Vec<Bill>> {
    let file = File::open(path.as_ref())?;
    let bills = load_bills_from_reader(file, projected_by_default)?;
    log::info!("Loaded {} bills from {}", bills.len(), path.as_ref().display());
    Ok(bills)
}

/// Load bills from any reader
pub fn load_bills_from_reader<R: Read>(reader: R, projected_by_default: bool) -> Result<Vec<Bill>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(reader);

    let mut bills = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let spec = parse_record(&record, line, projected_by_default)?;
        bills.push(Bill::new(spec)?);
    }

    Ok(bills)
}

/// Parse a single bill line into a spec
pub fn parse_bill_line(text: &str, projected_by_default: bool) -> Result<BillSpec> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    match rdr.records().next() {
        Some(record) => parse_record(&record?, 1, projected_by_default),
        None => Err(ProjectionError::invalid_argument(
            text,
            "at least name, value, and date must be given",
        )),
    }
}

fn parse_record(record: &StringRecord, line: u64, projected_by_default: bool) -> Result<BillSpec> {
    let label = format!("{} (line {})", record.iter().collect::<Vec<_>>().join(", "), line);
    let invalid = |reason: String| ProjectionError::invalid_argument(label.clone(), reason);

    if record.len() < 3 {
        return Err(invalid("at least name, value, and date must be given".to_string()));
    }

    let name = &record[0];
    let amount: f64 = record[1]
        .parse()
        .map_err(|_| invalid(format!("value '{}' is not a number", &record[1])))?;
    let first_date = parse_date(&record[2])
        .ok_or_else(|| invalid(format!("date '{}' is not valid", &record[2])))?;

    let mut spec = BillSpec::new(name, amount, first_date).actual(!projected_by_default);

    for rule in record.iter().skip(3) {
        let words: Vec<&str> = rule.split_whitespace().collect();
        let Some((&keyword, args)) = words.split_first() else {
            continue;
        };

        match keyword {
            "every" => {
                // Anything past the count and unit is ignored
                let recurrence = args
                    .iter()
                    .take(2)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .parse::<Recurrence>()
                    .map_err(|e| e.for_record(name))?;
                spec.recurrence = Some(recurrence);
            }
            "until" => {
                let date = args
                    .first()
                    .and_then(|s| parse_date(s))
                    .ok_or_else(|| invalid(format!("invalid date in '{rule}'")))?;
                spec.not_after = Some(date);
            }
            "occurs" | "repeat" | "repeats" => {
                let count: u32 = args
                    .first()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| invalid(format!("invalid number in '{rule}'")))?;
                spec.max_occurrences = if keyword == "occurs" {
                    count
                } else {
                    count.saturating_add(1)
                };
            }
            "distribution" => {
                if args.len() < 3 {
                    return Err(invalid(format!("distribution must have three values in '{rule}'")));
                }
                let mut pct = [0.0; 3];
                for (slot, value) in pct.iter_mut().zip(args) {
                    *slot = value
                        .parse::<f64>()
                        .map_err(|_| invalid(format!("invalid number in '{rule}'")))?
                        / 100.0;
                }
                spec.split = Split::new(pct[0], pct[1], pct[2]);
            }
            "actual" => spec.actual = true,
            "projected" => spec.actual = false,
            _ => return Err(invalid(format!("invalid rule type in '{rule}'"))),
        }
    }

    Ok(spec)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}
