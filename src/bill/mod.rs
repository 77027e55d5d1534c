//! Bill data structures, recurrence expansion and bill file loading

mod data;
pub mod loader;
pub mod recurrence;

pub use data::{Bill, BillSpec, Split};
pub use loader::{load_bills, load_bills_from_reader, parse_bill_line, DEFAULT_BILLS_PATH};
pub use recurrence::{expand, PeriodUnit, Recurrence};
