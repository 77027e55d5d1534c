//! Day-by-day balance simulation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::{BalanceRow, ProjectionResult};
use super::state::{BalanceState, DepletionRules};
use crate::bill::Bill;
use crate::error::{ProjectionError, Result};

/// Inputs that bound and steer one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// First simulated day
    pub start: NaiveDate,
    /// Last simulated day (inclusive)
    pub end: NaiveDate,
    /// Projected bills dated before this day are treated as already accounted for
    pub present_date: NaiveDate,
    pub depletion: DepletionRules,
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(ProjectionError::InvalidSettings(format!(
                "simulation end {} is before simulation start {}",
                self.end, self.start
            )));
        }
        if self.start.pred_opt().is_none() {
            return Err(ProjectionError::InvalidSettings(format!(
                "simulation start {} has no preceding day",
                self.start
            )));
        }
        Ok(())
    }

    /// Number of days walked after the seed
    pub fn num_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }
}

/// Walks the configured date range applying bills to the running balances
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Whether `bill` is applied when it occurs on `date`.
    ///
    /// Actual bills always apply. Projected bills apply only from the
    /// present date onwards.
    pub fn applies(&self, bill: &Bill, date: NaiveDate) -> bool {
        bill.occurs_on(date) && (bill.is_actual() || date >= self.config.present_date)
    }

    /// Run the simulation over `bills`, applied in slice order each day
    pub fn simulate(&self, bills: &[Bill]) -> ProjectionResult {
        let ProjectionConfig {
            start,
            end,
            present_date,
            depletion,
        } = self.config;

        let mut state = BalanceState::default();
        let mut rows = Vec::with_capacity(self.config.num_days() + 1);
        let mut present_balance = None;

        // validate() guarantees the seed day exists
        if let Some(seed) = start.pred_opt() {
            rows.push(BalanceRow::new(seed, state));
        }

        let mut applied = 0usize;
        for date in start.iter_days().take_while(|d| *d <= end) {
            for bill in bills {
                if self.applies(bill, date) {
                    state.apply(bill, depletion);
                    applied += 1;
                }
            }

            if date == present_date {
                present_balance = Some(state.total());
            }

            rows.push(BalanceRow::new(date, state));
        }

        log::info!(
            "Simulated {} days from {} to {} ({} bill occurrences applied)",
            rows.len().saturating_sub(1),
            start,
            end,
            applied
        );
        if present_balance.is_none() {
            log::warn!(
                "Present date {} is outside the simulated range {} to {}",
                present_date,
                start,
                end
            );
        }

        ProjectionResult {
            rows,
            present_date,
            present_balance,
        }
    }
}

/// Names of projected bills whose dates are all before `today`
pub fn irrelevant_bills(bills: &[Bill], today: NaiveDate) -> Vec<&str> {
    bills
        .iter()
        .filter(|b| b.is_irrelevant(today))
        .map(Bill::name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::{BillSpec, Recurrence, Split};
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config(start: NaiveDate, end: NaiveDate, present: NaiveDate) -> ProjectionConfig {
        ProjectionConfig {
            start,
            end,
            present_date: present,
            depletion: DepletionRules::both(),
        }
    }

    fn engine(start: NaiveDate, end: NaiveDate, present: NaiveDate) -> ProjectionEngine {
        ProjectionEngine::new(config(start, end, present)).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = ProjectionEngine::new(config(d(2020, 2, 1), d(2020, 1, 1), d(2020, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidSettings(_)));
    }

    #[test]
    fn test_no_bills_all_zero() {
        let result = engine(d(2020, 1, 1), d(2020, 12, 31), d(2020, 6, 1)).simulate(&[]);

        // Seed plus 366 days of a leap year
        assert_eq!(result.rows.len(), 367);
        assert_eq!(result.rows[0].date, d(2019, 12, 31));
        assert_eq!(result.final_row().unwrap().date, d(2020, 12, 31));
        assert!(result.rows.iter().all(|r| r.total() == 0.0));
        assert_eq!(result.present_balance, Some(0.0));
    }

    #[test]
    fn test_single_actual_bill() {
        let bill = Bill::new(BillSpec::new("Bonus", 500.0, d(2020, 3, 10)).actual(true)).unwrap();
        let result = engine(d(2020, 1, 1), d(2020, 12, 31), d(2020, 6, 1)).simulate(&[bill]);

        for row in &result.rows {
            let expected = if row.date < d(2020, 3, 10) { 0.0 } else { 500.0 };
            assert_eq!(row.living, expected, "living on {}", row.date);
            assert_eq!(row.emergency, 0.0);
            assert_eq!(row.discretionary, 0.0);
        }
        assert_eq!(result.present_balance, Some(500.0));
    }

    #[test]
    fn test_projected_bill_before_present_never_applies() {
        let bill = Bill::new(BillSpec::new("Old", -80.0, d(2020, 1, 1))).unwrap();
        let result = engine(d(2020, 1, 1), d(2020, 12, 31), d(2020, 6, 1)).simulate(&[bill]);

        assert!(result.rows.iter().all(|r| r.total() == 0.0));
        assert_eq!(result.present_balance, Some(0.0));
    }

    #[test]
    fn test_projected_recurring_bill_applies_from_present() {
        let spec = BillSpec::new("Rent", -1000.0, d(2020, 1, 1))
            .every(Recurrence::months(1).unwrap())
            .split(Split::new(1.0, 0.0, 0.0));
        let bill = Bill::new(spec).unwrap();
        let result = engine(d(2020, 1, 1), d(2020, 12, 31), d(2020, 6, 1)).simulate(&[bill]);

        assert_eq!(result.row_on(d(2020, 5, 31)).unwrap().discretionary, 0.0);
        assert_eq!(result.row_on(d(2020, 6, 1)).unwrap().discretionary, -1000.0);
        assert_eq!(result.row_on(d(2020, 12, 31)).unwrap().discretionary, -7000.0);
        assert_eq!(result.present_balance, Some(-1000.0));
    }

    #[test]
    fn test_cascade_is_per_bill() {
        let day = d(2020, 3, 1);
        let income = Bill::new(
            BillSpec::new("Income", 100.0, day)
                .split(Split::new(1.0, 0.0, 0.0))
                .actual(true),
        )
        .unwrap();
        let groceries = Bill::new(BillSpec::new("Groceries", -150.0, day).actual(true)).unwrap();
        let refund = Bill::new(BillSpec::new("Refund", 100.0, day).actual(true)).unwrap();

        let eng = engine(d(2020, 3, 1), d(2020, 3, 1), d(2020, 3, 1));

        // Groceries overdraw living, which is folded into discretionary before
        // the refund lands, so the refund stays in living
        let result = eng.simulate(&[income.clone(), groceries.clone(), refund.clone()]);
        let row = result.row_on(day).unwrap();
        assert_relative_eq!(row.living, 100.0);
        assert_relative_eq!(row.discretionary, -50.0);

        // Refund first: living absorbs the grocery bill on its own
        let result = eng.simulate(&[income, refund, groceries]);
        let row = result.row_on(day).unwrap();
        assert_eq!(row.living, 0.0);
        assert_relative_eq!(row.discretionary, 50.0);
    }

    #[test]
    fn test_depletion_example() {
        let day = d(2020, 4, 1);
        let seed = Bill::new(
            BillSpec::new("Savings", 100.0, d(2020, 3, 31))
                .split(Split::new(1.0, 0.0, 0.0))
                .actual(true),
        )
        .unwrap();
        let bill = Bill::new(BillSpec::new("Repair", -50.0, day).actual(true)).unwrap();

        let result = engine(d(2020, 3, 1), d(2020, 4, 30), d(2020, 4, 15)).simulate(&[seed, bill]);
        let row = result.row_on(day).unwrap();
        assert_eq!(row.living, 0.0);
        assert_relative_eq!(row.discretionary, 50.0);
    }

    #[test]
    fn test_present_balance_matches_series() {
        let spec = BillSpec::new("Paycheck", 1200.0, d(2020, 1, 3))
            .every(Recurrence::days(14).unwrap())
            .split(Split::new(0.2, 0.1, 0.7))
            .actual(true);
        let rent =
            BillSpec::new("Rent", -900.0, d(2020, 1, 1)).every(Recurrence::months(1).unwrap());
        let bills = vec![Bill::new(spec).unwrap(), Bill::new(rent).unwrap()];

        let present = d(2020, 3, 20);
        let result = engine(d(2020, 1, 1), d(2020, 6, 30), present).simulate(&bills);
        let row = result.row_on(present).unwrap();
        assert_relative_eq!(result.present_balance.unwrap(), row.total());
    }

    #[test]
    fn test_present_outside_range() {
        let result = engine(d(2020, 1, 1), d(2020, 1, 31), d(2021, 1, 1)).simulate(&[]);
        assert_eq!(result.present_balance, None);
    }

    #[test]
    fn test_bill_on_seed_day_ignored() {
        let bill = Bill::new(BillSpec::new("Early", 10.0, d(2019, 12, 31)).actual(true)).unwrap();
        let result = engine(d(2020, 1, 1), d(2020, 1, 10), d(2020, 1, 5)).simulate(&[bill]);
        assert!(result.rows.iter().all(|r| r.total() == 0.0));
    }

    #[test]
    fn test_series_arrays_are_aligned() {
        let paycheck = BillSpec::new("Paycheck", 1000.0, d(2020, 1, 3))
            .every(Recurrence::days(7).unwrap())
            .split(Split::new(0.2, 0.3, 0.5))
            .actual(true);
        let bills = vec![Bill::new(paycheck).unwrap()];
        let result = engine(d(2020, 1, 1), d(2020, 1, 31), d(2020, 1, 1)).simulate(&bills);

        let dates = result.dates();
        let living = result.living();
        let emergency = result.emergency();
        let discretionary = result.discretionary();
        let totals = result.totals();
        let n = result.rows.len();
        assert_eq!(n, 32);
        assert_eq!(dates.len(), n);
        assert_eq!(living.len(), n);
        assert_eq!(emergency.len(), n);
        assert_eq!(discretionary.len(), n);
        assert_eq!(totals.len(), n);

        // Third paycheck lands on the 17th
        let idx = dates.iter().position(|&date| date == d(2020, 1, 17)).unwrap();
        let row = result.row_on(d(2020, 1, 17)).unwrap();
        assert_eq!(living[idx], row.living);
        assert_eq!(emergency[idx], row.emergency);
        assert_eq!(discretionary[idx], row.discretionary);
        assert_relative_eq!(living[idx], 1500.0);
        assert_relative_eq!(emergency[idx], 900.0);
        assert_relative_eq!(discretionary[idx], 600.0);
        assert_relative_eq!(totals[idx], 3000.0);
        assert_relative_eq!(living[idx - 1], 1000.0);
    }

    #[test]
    fn test_irrelevant_bills() {
        let old = Bill::new(BillSpec::new("Old", -1.0, d(2020, 1, 1))).unwrap();
        let old_actual =
            Bill::new(BillSpec::new("Receipt", -1.0, d(2020, 1, 1)).actual(true)).unwrap();
        let future = Bill::new(BillSpec::new("Future", -1.0, d(2020, 3, 1))).unwrap();

        let bills = [old, old_actual, future];
        let names = irrelevant_bills(&bills, d(2020, 2, 1));
        assert_eq!(names, vec!["Old"]);
    }
}
