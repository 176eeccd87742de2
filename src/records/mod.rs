//! Flat, column-keyed dataset records
//!
//! A [`FlatRecord`] is the tabular form of one dataset: the dataset's own attributes,
//! one column per metadata field (flattened with [`crate::metadata::flatten`]) and the
//! enrichment columns [`DOWNLOAD_COUNT_COLUMN`], [`CONTENT_SIZE_COLUMN`] and
//! [`DATAVERSE_COLUMN`]. Records are built by [`RecordEnricher`] and never change
//! afterwards.

mod cell;
mod enricher;
mod flat_record;

pub use cell::Cell;
pub use enricher::{CONTENT_SIZE_COLUMN, DATAVERSE_COLUMN, DOWNLOAD_COUNT_COLUMN, RecordEnricher, file_sizes};
pub use flat_record::FlatRecord;
