//! Layered configuration loading.
//!
//! Sources, lowest precedence first: built-in defaults, a YAML file
//! (`--config`, else `<vault>/.linkvault.yaml` when it exists), `LINKVAULT_*`
//! environment variables with `__` between nested keys, then CLI flags.

use crate::cli::Cli;
use config::{Config, Environment, File, FileFormat};
use linkvault_core::{Error, LinkvaultConfig, Result};
use std::path::PathBuf;

/// File name looked up in the vault root when `--config` is not given
pub const CONFIG_FILE_NAME: &str = ".linkvault.yaml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "LINKVAULT";

/// Load configuration from the process environment.
pub fn load(cli: &Cli) -> Result<LinkvaultConfig> {
    load_with_env(cli, None)
}

/// Load configuration, reading environment variables from `env` when given.
pub fn load_with_env(
    cli: &Cli,
    env: Option<config::Map<String, String>>,
) -> Result<LinkvaultConfig> {
    let defaults = Config::try_from(&LinkvaultConfig::default()).map_err(config_error)?;
    let mut builder = Config::builder().add_source(defaults);

    builder = match &cli.config {
        Some(path) => {
            builder.add_source(File::from(path.as_path()).format(FileFormat::Yaml).required(true))
        }
        None => {
            let vault = cli.vault.clone().unwrap_or_else(|| PathBuf::from("."));
            let path = vault.join(CONFIG_FILE_NAME);
            builder.add_source(File::from(path.as_path()).format(FileFormat::Yaml).required(false))
        }
    };

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    let mut settings: LinkvaultConfig = builder
        .build()
        .and_then(|built| built.try_deserialize())
        .map_err(config_error)?;

    if let Some(vault) = &cli.vault {
        settings.vault = Some(vault.clone());
    }
    if let Some(engine) = cli.engine {
        settings.search.engine = engine;
    }

    settings.validate()?;
    log::debug!(
        "Loaded configuration: vault={:?} engine={}",
        settings.vault,
        settings.search.engine
    );
    Ok(settings)
}

fn config_error(err: config::ConfigError) -> Error {
    Error::config_error(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use linkvault_core::EngineMode;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["linkvault"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["index", "build"]);
        Cli::try_parse_from(argv).unwrap()
    }

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let vault = temp_dir.path().to_str().unwrap();
        let settings = load_with_env(&cli(&["--vault", vault]), env(&[])).unwrap();
        assert_eq!(settings.search.engine, EngineMode::Auto);
        assert_eq!(settings.search.default_limit, 20);
        assert_eq!(settings.graph.node_limit, 200);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_vault_file_then_env_then_flags() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "search:\n  engine: native\n  default_limit: 7\ngraph:\n  depth: 3\n",
        )
        .unwrap();
        let vault = temp_dir.path().to_str().unwrap();

        let settings = load_with_env(&cli(&["--vault", vault]), env(&[])).unwrap();
        assert_eq!(settings.search.engine, EngineMode::Native);
        assert_eq!(settings.search.default_limit, 7);
        assert_eq!(settings.graph.depth, 3);

        let overridden = env(&[("LINKVAULT_GRAPH__DEPTH", "5"), ("LINKVAULT_LOG_LEVEL", "debug")]);
        let settings = load_with_env(&cli(&["--vault", vault]), overridden).unwrap();
        assert_eq!(settings.graph.depth, 5);
        assert_eq!(settings.log_level, "debug");

        let settings =
            load_with_env(&cli(&["--vault", vault, "--engine", "ripgrep"]), env(&[])).unwrap();
        assert_eq!(settings.search.engine, EngineMode::Ripgrep);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let vault = temp_dir.path().to_str().unwrap();
        let missing = temp_dir.path().join("nope.yaml");
        let err = load_with_env(
            &cli(&["--vault", vault, "--config", missing.to_str().unwrap()]),
            env(&[]),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), linkvault_core::error::exit::CONFIG);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let vault = temp_dir.path().to_str().unwrap();
        let err = load_with_env(
            &cli(&["--vault", vault]),
            env(&[("LINKVAULT_GRAPH__NODE_LIMIT", "0")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("graph.node_limit"));
    }
}
