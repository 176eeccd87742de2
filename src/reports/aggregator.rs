use crate::Result;
use crate::catalog::{Catalog, DownloadStats};
use crate::records::FlatRecord;
use crate::walk::{WalkSummary, Walker};
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufWriter;
use strum::Display;

const LOG_TARGET: &str = "   reports";

/// An institution whose dataverse tree is reported on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Account {
    /// Human-readable name of the institution
    pub name: String,

    /// Alias or database id of the institution's top-level dataverse
    pub identifier: String,
}

/// Which family of dataset reports to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum ReportScope {
    /// Every dataset of every account, for the installation's administrators
    #[default]
    All,

    /// One report per institution, for the institution's own contacts
    Institutions,
}

impl ReportScope {
    const fn file_suffix(self) -> &'static str {
        match self {
            Self::All => "datasets.csv",
            Self::Institutions => "institution-datasets.csv",
        }
    }
}

/// The records collected for one account.
#[derive(Debug, Clone)]
pub struct AccountReport {
    pub account: Account,
    pub scope: ReportScope,
    pub records: Vec<FlatRecord>,
    pub summary: WalkSummary,
}

impl AccountReport {
    /// Name of the CSV file this report is written to.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}-{}", self.account.identifier, self.scope.file_suffix())
    }

    /// Write the report as CSV into `dir`, creating the directory if needed.
    ///
    /// Returns `None` without touching the file system when the report has no records.
    pub fn write_csv(&self, dir: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
        if self.records.is_empty() {
            log::info!(target: LOG_TARGET, "No datasets found for '{}', no report written", self.account.name);
            return Ok(None);
        }

        fs::create_dir_all(dir).into_app_err_with(|| format!("creating report directory '{dir}'"))?;

        let path = dir.join(self.file_name());
        let file = fs::File::create(&path).into_app_err_with(|| format!("creating report file '{path}'"))?;
        super::generate_csv(&self.records, BufWriter::new(file))?;

        log::info!(target: LOG_TARGET, "Wrote {} dataset(s) for '{}' to '{path}'", self.records.len(), self.account.name);
        Ok(Some(path))
    }
}

/// Runs one walk per account and gathers the results.
#[derive(Debug)]
pub struct ReportAggregator<C, S> {
    walker: Walker<C, S>,
    accounts: Vec<Account>,
}

impl<C: Catalog, S: DownloadStats> ReportAggregator<C, S> {
    #[must_use]
    pub const fn new(walker: Walker<C, S>, accounts: Vec<Account>) -> Self {
        Self { walker, accounts }
    }

    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Walk the dataverse of every account, in configuration order.
    ///
    /// Each account starts from an empty record collection.
    ///
    /// # Errors
    ///
    /// Fails when an account has no dataverse identifier.
    pub async fn generate(&self, scope: ReportScope) -> Result<Vec<AccountReport>> {
        let mut reports = Vec::with_capacity(self.accounts.len());

        for account in &self.accounts {
            log::info!(target: LOG_TARGET, "Collecting {scope} datasets for '{}' ({})", account.name, account.identifier);

            let mut records = Vec::new();
            let summary = self
                .walker
                .walk(&mut records, &account.identifier)
                .await
                .into_app_err_with(|| format!("collecting datasets for '{}'", account.name))?;

            log::info!(target: LOG_TARGET, "'{}': {summary}", account.name);
            reports.push(AccountReport {
                account: account.clone(),
                scope,
                records,
                summary,
            });
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Cell;

    fn report(identifier: &str, scope: ReportScope, records: Vec<FlatRecord>) -> AccountReport {
        AccountReport {
            account: Account {
                name: "Texas A&M University".into(),
                identifier: identifier.into(),
            },
            scope,
            records,
            summary: WalkSummary::default(),
        }
    }

    #[test]
    fn test_file_names_follow_scope() {
        assert_eq!(report("tamu", ReportScope::All, Vec::new()).file_name(), "tamu-datasets.csv");
        assert_eq!(
            report("tamu", ReportScope::Institutions, Vec::new()).file_name(),
            "tamu-institution-datasets.csv"
        );
    }

    #[test]
    fn test_scope_names() {
        assert_eq!(ReportScope::All.to_string(), "all");
        assert_eq!(ReportScope::from_str("institutions", true).unwrap(), ReportScope::Institutions);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_write_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().join("out")).unwrap();

        let empty = report("empty", ReportScope::All, Vec::new());
        assert_eq!(empty.write_csv(&dir).unwrap(), None);
        assert!(!dir.exists());

        let full = report("tamu", ReportScope::All, vec![[("title", Cell::from("T"))].into_iter().collect()]);
        let path = full.write_csv(&dir).unwrap().unwrap();
        assert_eq!(path, dir.join("tamu-datasets.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "title\nT\n");
    }
}
