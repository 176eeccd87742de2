use super::Host;
use super::common::{LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::catalog::{DataverseClient, PostgresDownloadStats};
use crate::diagnostics::LogObserver;
use crate::reports::{AccountReport, ReportAggregator, ReportScope};
use crate::walk::Walker;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{app_err, bail};
use std::io::Write;
use std::sync::Arc;

#[derive(Parser, Debug)]
pub struct DatasetsArgs {
    /// Which family of reports to produce
    #[arg(long, value_name = "SCOPE", default_value = "all")]
    pub scope: ReportScope,

    /// Path to configuration file (default is `dataverse-reports.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Directory where reports are written [default: `work_dir` from the configuration]
    #[arg(long, value_name = "PATH")]
    pub work_dir: Option<Utf8PathBuf>,

    /// Dataverse API token
    #[arg(long, value_name = "KEY", env = "DATAVERSE_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Connection string of the Dataverse database [default: `database.url` from the configuration]
    #[arg(long, value_name = "URL", env = "DATAVERSE_DB_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

/// Walk every configured account and write one CSV report per account
pub async fn process_datasets<H: Host>(host: &mut H, args: &DatasetsArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(&Utf8PathBuf::from("."), args.config.as_ref())?;
    if config.accounts.is_empty() {
        bail!("no accounts are configured, add an [accounts.<name>] table to the configuration file");
    }

    let database_url = args
        .database_url
        .as_deref()
        .or(config.database.url.as_deref())
        .ok_or_else(|| app_err!("a database connection string is required to count downloads, use --database-url"))?;

    let catalog = DataverseClient::new(&config.api.base_url, args.api_key.as_deref())?;
    let stats = PostgresDownloadStats::connect(database_url).await?;
    let walker = Walker::new(catalog, stats, Arc::new(LogObserver)).with_traversal(config.traversal);
    let aggregator = ReportAggregator::new(walker, config.accounts());

    let reports = aggregator.generate(args.scope).await?;
    let work_dir = args.work_dir.as_ref().unwrap_or(&config.work_dir);
    let _ = write_reports(host, &reports, work_dir)?;

    Ok(())
}

/// Write the non-empty reports and tell the host what happened
fn write_reports<H: Host>(host: &mut H, reports: &[AccountReport], work_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut written = Vec::new();
    for report in reports {
        let _ = writeln!(host.output(), "{} ({}): {}", report.account.name, report.account.identifier, report.summary);
        if let Some(path) = report.write_csv(work_dir)? {
            written.push(path);
        }
    }

    if written.is_empty() {
        let _ = writeln!(host.output(), "No reports written");
    } else {
        let _ = writeln!(host.output(), "Reports written:");
        for path in &written {
            let _ = writeln!(host.output(), "  {path}");
        }
    }

    Ok(written)
}
