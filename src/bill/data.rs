use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::recurrence::{expand, Recurrence};
use crate::error::{ProjectionError, Result};

/// Occurrence cap used when a bill does not state one
const UNBOUNDED_OCCURRENCES: u32 = 1_000_000_000;

/// Months between a bill's first date and its default not-after date
const DEFAULT_HORIZON_MONTHS: u32 = 60;

/// Multipliers that derive the three category amounts from a bill's amount.
///
/// The fractions are independent and are not required to sum to one, so a
/// bill may count against two categories or only part of one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub discretionary: f64,
    pub emergency: f64,
    pub living: f64,
}

impl Split {
    pub fn new(discretionary: f64, emergency: f64, living: f64) -> Self {
        Self {
            discretionary,
            emergency,
            living,
        }
    }
}

impl Default for Split {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Unexpanded bill as parsed from a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSpec {
    pub name: String,
    /// Negative for debit, positive for credit
    pub amount: f64,
    pub first_date: NaiveDate,
    pub recurrence: Option<Recurrence>,
    pub max_occurrences: u32,
    /// Defaults to five years after `first_date`
    pub not_after: Option<NaiveDate>,
    pub split: Split,
    pub actual: bool,
}

impl BillSpec {
    /// One-off projected bill charged entirely to living
    pub fn new(name: impl Into<String>, amount: f64, first_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            first_date,
            recurrence: None,
            max_occurrences: UNBOUNDED_OCCURRENCES,
            not_after: None,
            split: Split::default(),
            actual: false,
        }
    }

    pub fn every(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn at_most(mut self, max_occurrences: u32) -> Self {
        self.max_occurrences = max_occurrences;
        self
    }

    pub fn until(mut self, not_after: NaiveDate) -> Self {
        self.not_after = Some(not_after);
        self
    }

    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    pub fn actual(mut self, actual: bool) -> Self {
        self.actual = actual;
        self
    }
}

/// A bill with its occurrence dates expanded.
///
/// Immutable once built; the dates are strictly increasing and start at the
/// first date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    name: String,
    amount: f64,
    not_after: NaiveDate,
    split: Split,
    actual: bool,
    dates: Vec<NaiveDate>,
}

impl Bill {
    /// Validate a spec and expand its occurrence dates
    pub fn new(spec: BillSpec) -> Result<Self> {
        let BillSpec {
            name,
            amount,
            first_date,
            recurrence,
            max_occurrences,
            not_after,
            split,
            actual,
        } = spec;

        if max_occurrences == 0 {
            return Err(ProjectionError::invalid_argument(
                name,
                "occurrence cap must be at least 1",
            ));
        }
        if !amount.is_finite() {
            return Err(ProjectionError::invalid_argument(name, "amount is not a number"));
        }

        let not_after = match not_after {
            Some(date) => date,
            None => default_not_after(first_date).ok_or_else(|| {
                ProjectionError::InvalidDate(format!(
                    "bill '{name}': {first_date} + five years is out of range"
                ))
            })?,
        };

        let dates = expand(first_date, recurrence.as_ref(), max_occurrences, not_after)
            .map_err(|e| e.for_record(&name))?;

        log::debug!("Bill '{}' expanded to {} occurrence(s)", name, dates.len());

        Ok(Self {
            name,
            amount,
            not_after,
            split,
            actual,
            dates,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn not_after(&self) -> NaiveDate {
        self.not_after
    }

    /// Confirmed transaction (always applied) rather than a projection
    pub fn is_actual(&self) -> bool {
        self.actual
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Amount charged against the discretionary balance per occurrence
    pub fn discretionary(&self) -> f64 {
        self.amount * self.split.discretionary
    }

    /// Amount charged against the emergency balance per occurrence
    pub fn emergency(&self) -> f64 {
        self.amount * self.split.emergency
    }

    /// Amount charged against the living balance per occurrence
    pub fn living(&self) -> f64 {
        self.amount * self.split.living
    }

    /// Whether the bill occurs on `date`
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// All of the bill's dates are strictly before `today`
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.last_date() < today
    }

    /// A projected bill whose dates are all in the past never affects a projection
    pub fn is_irrelevant(&self, today: NaiveDate) -> bool {
        !self.actual && self.is_past(today)
    }
}

fn default_not_after(first_date: NaiveDate) -> Option<NaiveDate> {
    first_date.checked_add_months(Months::new(DEFAULT_HORIZON_MONTHS))
}
