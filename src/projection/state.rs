//! Running balances carried from one simulated day to the next

use serde::{Deserialize, Serialize};

use crate::bill::Bill;

/// Which categories may overdraw into discretionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepletionRules {
    pub living_depletes_discretionary: bool,
    pub emergency_depletes_discretionary: bool,
}

impl DepletionRules {
    pub fn both() -> Self {
        Self {
            living_depletes_discretionary: true,
            emergency_depletes_discretionary: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// The three category balances
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BalanceState {
    pub living: f64,
    pub emergency: f64,
    pub discretionary: f64,
}

impl BalanceState {
    pub fn total(&self) -> f64 {
        self.living + self.emergency + self.discretionary
    }

    /// Apply one occurrence of `bill`, then run the enabled depletion cascades.
    ///
    /// Cascades run after every bill rather than once per day, so the order
    /// of bills within a day is significant.
    pub fn apply(&mut self, bill: &Bill, rules: DepletionRules) {
        self.living += bill.living();
        self.emergency += bill.emergency();
        self.discretionary += bill.discretionary();

        if rules.living_depletes_discretionary && self.living < 0.0 {
            self.discretionary += self.living;
            self.living = 0.0;
        }

        if rules.emergency_depletes_discretionary && self.emergency < 0.0 {
            self.discretionary += self.emergency;
            self.emergency = 0.0;
        }
    }
}
