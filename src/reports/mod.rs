//! Per-account dataset reports
//!
//! [`ReportAggregator`] runs one catalog walk per configured [`Account`] and returns an
//! [`AccountReport`] for each. Reports are exported as CSV with [`generate_csv`], one
//! file per account; the file name depends on the [`ReportScope`].

mod aggregator;
mod csv;

pub use aggregator::{Account, AccountReport, ReportAggregator, ReportScope};
pub use csv::generate as generate_csv;
