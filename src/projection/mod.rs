//! Balance projection over a bounded date range

mod engine;
mod series;
mod state;

pub use engine::{irrelevant_bills, ProjectionConfig, ProjectionEngine};
pub use series::{BalanceRow, ProjectionResult};
pub use state::{BalanceState, DepletionRules};
