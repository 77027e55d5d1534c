//! Personal cash balance projection
//!
//! Bills (recurring or one-off) are expanded into occurrence dates and then
//! applied day by day to three balances: living, emergency and discretionary.

pub mod bill;
pub mod error;
pub mod projection;
pub mod report;
pub mod settings;

pub use bill::{Bill, BillSpec, PeriodUnit, Recurrence, Split};
pub use error::{ProjectionError, Result};
pub use projection::{
    irrelevant_bills, BalanceRow, DepletionRules, ProjectionConfig, ProjectionEngine,
    ProjectionResult,
};
pub use settings::Settings;
