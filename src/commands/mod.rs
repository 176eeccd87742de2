//! Command-line interface for dataverse-reports
//!
//! # Commands
//!
//! - **datasets**: walk the dataverse tree of every configured account and write one CSV
//!   report per account into the work directory
//! - **init**: generate a default configuration file
//! - **validate**: check a configuration file
//!
//! The `run` function parses the command line and routes to the matching handler. Output
//! meant for the user goes through a [`Host`]; diagnostics go through the `log` facade,
//! which the `datasets` command installs according to `--log-level`.

mod common;
mod config;
mod datasets;
mod host;
mod init;
mod run;
mod validate;

pub use common::LogLevel;
pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use datasets::{DatasetsArgs, process_datasets};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
