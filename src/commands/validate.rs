use super::Host;
use super::config::Config;
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `dataverse-reports.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let base_dir = Utf8PathBuf::from(".");
    let config_path = args.config.as_ref();

    match Config::load(&base_dir, config_path) {
        Ok(config) => {
            let _ = writeln!(host.output(), "Configuration file is valid");
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file given)");
            }
            let _ = writeln!(host.output(), "Dataverse: {}", config.api.base_url);
            let _ = writeln!(host.output(), "Accounts: {}", config.accounts.len());
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Configuration validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use crate::commands::init::{InitArgs, init_config};

    fn write_config(dir: &tempfile::TempDir, name: &str, text: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(name)).unwrap();
        std::fs::write(&path, text).expect("Failed to write test config");
        path
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_default_config_is_valid() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = Utf8PathBuf::try_from(temp_dir.path().join("dataverse-reports.toml")).unwrap();

        let mut init_host = TestHost::default();
        let init_args = InitArgs {
            output: Some(config_path.clone()),
        };
        init_config(&mut init_host, &init_args).expect("init_config should succeed");
        assert!(init_host.output_text().contains("Generated default configuration file"));

        let mut host = TestHost::default();
        let args = ValidateArgs { config: Some(config_path) };
        validate_config(&mut host, &args).unwrap();

        assert!(host.output_text().starts_with("Configuration file is valid"));
        assert_eq!(host.exit_code, None);
    }

    #[test]
    fn test_default_config_matches_embedded() {
        let default_config = Config::default();
        let parsed_config: Config =
            toml::from_str(super::super::config::DEFAULT_CONFIG_TOML).expect("DEFAULT_CONFIG_TOML should parse successfully");

        let default_toml = toml::to_string(&default_config).expect("default config should serialize");
        let parsed_toml = toml::to_string(&parsed_config).expect("parsed config should serialize");

        assert_eq!(default_toml, parsed_toml);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_unknown_field() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = write_config(
            &temp_dir,
            "unknown_field.toml",
            r#"
[api]
base_url = "https://dataverse.example.edu"
api_key = "secret"
"#,
        );

        let mut host = TestHost::default();
        let args = ValidateArgs { config: Some(config_path) };
        let e = validate_config(&mut host, &args).unwrap_err();

        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_text().contains("Configuration validation failed"));
        assert!(e.to_string().contains("unknown field `api_key`"), "{e}");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_invalid_traversal() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = write_config(
            &temp_dir,
            "invalid_traversal.toml",
            r#"
traversal = "breadth-first"

[api]
base_url = "https://dataverse.example.edu"
"#,
        );

        let mut host = TestHost::default();
        let args = ValidateArgs { config: Some(config_path) };
        let e = validate_config(&mut host, &args).unwrap_err();
        assert!(e.to_string().contains("unknown variant `breadth-first`"), "{e}");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_missing_api_section() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = write_config(&temp_dir, "empty.toml", "# Empty config file\n");

        let mut host = TestHost::default();
        let args = ValidateArgs { config: Some(config_path) };
        let e = validate_config(&mut host, &args).unwrap_err();
        assert!(e.to_string().contains("missing field `api`"), "{e}");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_duplicate_identifiers() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = write_config(
            &temp_dir,
            "duplicates.toml",
            r#"
[api]
base_url = "https://dataverse.example.edu"

[accounts.first]
name = "First"
identifier = "shared"

[accounts.second]
name = "Second"
identifier = "shared"
"#,
        );

        let mut host = TestHost::default();
        let args = ValidateArgs { config: Some(config_path) };
        let e = validate_config(&mut host, &args).unwrap_err();

        assert!(
            e.to_string().contains("account 'second' uses identifier 'shared' which is already used by another account"),
            "{e}"
        );
    }
}
