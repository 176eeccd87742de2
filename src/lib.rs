#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Dataset reports for Dataverse installations
//!
//! This library walks the dataverse tree of an institution, flattens the metadata of
//! every dataset it finds into a single tabular record, and exports the records as CSV.
//!
//! # Module Organization
//!
//! - [`metadata`]: Decoding and flattening of typed metadata fields
//! - [`records`]: Flat dataset records and their enrichment
//! - [`catalog`]: The Dataverse API and download statistics
//! - [`walk`]: Depth-first traversal of dataverse trees
//! - [`reports`]: Per-account aggregation and CSV export
//! - [`diagnostics`]: Events reported while walking
//! - [`commands`]: Command-line interface

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod catalog;
pub mod commands;
pub mod diagnostics;
pub mod metadata;
pub mod records;
pub mod reports;
pub mod walk;

pub use crate::commands::{Host, run};
