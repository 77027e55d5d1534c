use chrono::NaiveDate;
use serde::Serialize;

use super::state::BalanceState;

/// Balances at the end of one simulated day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceRow {
    pub date: NaiveDate,
    pub living: f64,
    pub emergency: f64,
    pub discretionary: f64,
}

impl BalanceRow {
    pub fn new(date: NaiveDate, state: BalanceState) -> Self {
        Self {
            date,
            living: state.living,
            emergency: state.emergency,
            discretionary: state.discretionary,
        }
    }

    pub fn total(&self) -> f64 {
        self.living + self.emergency + self.discretionary
    }
}

/// Output of one simulation run.
///
/// `rows` is day-indexed and contiguous: the first row is the all-zero seed
/// on the day before the simulation start, the last row is the end date.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionResult {
    pub rows: Vec<BalanceRow>,
    pub present_date: NaiveDate,
    /// Total balance on the present date; `None` when that date was not simulated
    pub present_balance: Option<f64>,
}

impl ProjectionResult {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn living(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.living).collect()
    }

    pub fn emergency(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.emergency).collect()
    }

    pub fn discretionary(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.discretionary).collect()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.rows.iter().map(BalanceRow::total).collect()
    }

    /// Rows for the simulated range, without the seed
    pub fn simulated(&self) -> &[BalanceRow] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Row for `date`, if it lies in the series
    pub fn row_on(&self, date: NaiveDate) -> Option<&BalanceRow> {
        let first = self.rows.first()?.date;
        let offset = usize::try_from((date - first).num_days()).ok()?;
        self.rows.get(offset)
    }

    pub fn final_row(&self) -> Option<&BalanceRow> {
        self.rows.last()
    }
}
