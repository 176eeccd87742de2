use crate::Result;
use crate::reports::Account;
use crate::walk::Traversal;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "dataverse-reports.toml";

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory where CSV reports are written
    #[serde(default = "default_work_dir")]
    pub work_dir: Utf8PathBuf,

    /// How dataverse trees are traversed
    #[serde(default)]
    pub traversal: Traversal,

    pub api: ApiConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    /// Institutions to report on, in report order
    #[serde(default)]
    pub accounts: IndexMap<String, Account>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Root URL of the Dataverse installation
    pub base_url: Url,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string of the Dataverse database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn default_work_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("reports")
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or does not validate
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The configured accounts, in file order
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.values().cloned().collect()
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is not http(s) or account identifiers are empty or repeated
    pub fn validate(&self) -> Result<()> {
        let scheme = self.api.base_url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(app_err!("api.base_url must be an http or https URL, got '{}'", self.api.base_url));
        }

        let mut seen = HashSet::new();
        for (key, account) in &self.accounts {
            if account.identifier.trim().is_empty() {
                return Err(app_err!("account '{key}' has an empty identifier"));
            }

            if !seen.insert(account.identifier.as_str()) {
                return Err(app_err!(
                    "account '{key}' uses identifier '{}' which is already used by another account",
                    account.identifier
                ));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(identifier: &str) -> Account {
        // name is irrelevant to validation
        Account {
            name: format!("{identifier} university"),
            identifier: identifier.into(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.work_dir, "reports");
        assert_eq!(config.traversal, Traversal::Recursive);
        assert!(config.accounts.is_empty());
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = Config {
            api: ApiConfig {
                base_url: Url::parse("ftp://dataverse.example.edu").unwrap(),
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_identifier() {
        let mut config = Config::default();
        let _ = config.accounts.insert("blank".into(), account(" "));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_identifier() {
        let mut config = Config::default();
        let _ = config.accounts.insert("a".into(), account("tamu"));
        let _ = config.accounts.insert("b".into(), account("tamu"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accounts_keep_file_order() {
        let config: Config = toml::from_str(
            r#"
traversal = "iterative"

[api]
base_url = "https://dataverse.example.edu"

[accounts.zeta]
name = "Zeta College"
identifier = "zeta"

[accounts.alpha]
name = "Alpha University"
identifier = "alpha"
"#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.traversal, Traversal::Iterative);

        let accounts = config.accounts();
        assert_eq!(accounts.iter().map(|a| a.identifier.as_str()).collect::<Vec<_>>(), ["zeta", "alpha"]);
        assert_eq!(accounts[1].name, "Alpha University");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let output_path = Utf8PathBuf::try_from(tmp.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        Config::save_default(&output_path).unwrap();
        let loaded = Config::load(&Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap(), None).unwrap();
        loaded.validate().unwrap();
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = Config::load(&base_dir, None).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://demo.dataverse.org/");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_explicit_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let missing = base_dir.join("missing.toml");
        let _ = Config::load(&base_dir, Some(&missing)).unwrap_err();
    }
}
