//! Recurrence rules and occurrence-date expansion
//!
//! A bill's first date is expanded into the ordered list of dates it occurs on.
//! Day periods add a fixed number of days; month periods advance the month
//! component and carry into the year while keeping the day-of-month as is.
//! A month step that lands on a nonexistent day (Jan 31 + 1 month) is an
//! error rather than being clamped to the end of the month.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProjectionError, Result};

/// Unit of a recurrence period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Day,
    Month,
}

impl FromStr for PeriodUnit {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(PeriodUnit::Day),
            "month" | "months" => Ok(PeriodUnit::Month),
            other => Err(ProjectionError::InvalidRecurrence(format!(
                "period unit must be days or months, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodUnit::Day => write!(f, "days"),
            PeriodUnit::Month => write!(f, "months"),
        }
    }
}

/// "Every `count` `unit`"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub count: u32,
    pub unit: PeriodUnit,
}

impl Recurrence {
    /// Create a recurrence, rejecting a zero period
    pub fn new(count: u32, unit: PeriodUnit) -> Result<Self> {
        let rule = Self { count, unit };
        rule.validate()?;
        Ok(rule)
    }

    pub fn days(count: u32) -> Result<Self> {
        Self::new(count, PeriodUnit::Day)
    }

    pub fn months(count: u32) -> Result<Self> {
        Self::new(count, PeriodUnit::Month)
    }

    fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(ProjectionError::InvalidRecurrence(
                "recurrence period must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Date of the occurrence following `from`
    pub fn next_date(&self, from: NaiveDate) -> Result<NaiveDate> {
        match self.unit {
            PeriodUnit::Day => from
                .checked_add_days(Days::new(u64::from(self.count)))
                .ok_or_else(|| {
                    ProjectionError::InvalidDate(format!(
                        "{from} + {} days is out of range",
                        self.count
                    ))
                }),
            PeriodUnit::Month => {
                // Zero-based month index so that month 12 + 1 carries into January
                let months = i64::from(from.month0()) + i64::from(self.count);
                let year = i64::from(from.year()) + months / 12;
                let month = (months % 12) as u32 + 1;
                i32::try_from(year)
                    .ok()
                    .and_then(|year| NaiveDate::from_ymd_opt(year, month, from.day()))
                    .ok_or_else(|| {
                        ProjectionError::InvalidDate(format!(
                            "{from} + {} months has no day {} in {year}-{month:02}",
                            self.count,
                            from.day()
                        ))
                    })
            }
        }
    }
}

impl FromStr for Recurrence {
    type Err = ProjectionError;

    /// Parse "N days" / "N months"
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(count), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ProjectionError::InvalidRecurrence(format!(
                "expected '<count> <days|months>', got '{s}'"
            )));
        };
        let count: i64 = count.parse().map_err(|_| {
            ProjectionError::InvalidRecurrence(format!("invalid period count '{count}'"))
        })?;
        let count = u32::try_from(count).map_err(|_| {
            ProjectionError::InvalidRecurrence(format!("period count {count} must be positive"))
        })?;
        Recurrence::new(count, unit.parse()?)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} {}", self.count, self.unit)
    }
}

/// Expand a first date into every date the bill occurs on.
///
/// The result always starts with `first_date`. Generation stops at the first
/// date past `not_after` (that date is dropped) or once `max_occurrences`
/// dates have been produced, whichever comes first.
pub fn expand(
    first_date: NaiveDate,
    recurrence: Option<&Recurrence>,
    max_occurrences: u32,
    not_after: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    if max_occurrences == 0 {
        return Err(ProjectionError::invalid_argument(
            format!("starting {first_date}"),
            "occurrence cap must be at least 1",
        ));
    }

    let mut dates = vec![first_date];
    let Some(rule) = recurrence else {
        return Ok(dates);
    };
    rule.validate()?;

    let cap = max_occurrences as usize;
    let mut last = first_date;
    while dates.len() < cap {
        let next = rule.next_date(last)?;
        if next > not_after {
            break;
        }
        dates.push(next);
        last = next;
    }

    Ok(dates)
}
