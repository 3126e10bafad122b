//! Configuration types for linkvault.
//!
//! Layered loading (file, environment, flags) lives in the binary; this
//! module only defines the shape, the defaults and validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which text search backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Use ripgrep when it is installed, otherwise the native scanner
    #[default]
    Auto,
    /// Always use ripgrep
    Ripgrep,
    /// Always use the in-process scanner
    Native,
}

impl FromStr for EngineMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(EngineMode::Auto),
            "ripgrep" | "rg" => Ok(EngineMode::Ripgrep),
            "native" => Ok(EngineMode::Native),
            other => Err(Error::config_error(format!(
                "unknown search engine '{}'. Valid options: auto, ripgrep, native",
                other
            ))),
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineMode::Auto => write!(f, "auto"),
            EngineMode::Ripgrep => write!(f, "ripgrep"),
            EngineMode::Native => write!(f, "native"),
        }
    }
}

/// Text search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub engine: EngineMode,
    /// Program name or absolute path of the ripgrep binary
    pub ripgrep_path: PathBuf,
    pub default_limit: usize,
    pub context_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engine: EngineMode::Auto,
            ripgrep_path: PathBuf::from("rg"),
            default_limit: 20,
            context_chars: 80,
        }
    }
}

/// Graph expansion defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub depth: usize,
    pub node_limit: usize,
    pub seed_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            node_limit: 200,
            seed_limit: 5,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkvaultConfig {
    /// Vault root; the binary falls back to the working directory
    pub vault: Option<PathBuf>,
    pub log_level: String,
    pub search: SearchConfig,
    pub graph: GraphConfig,
}

impl Default for LinkvaultConfig {
    fn default() -> Self {
        Self {
            vault: None,
            log_level: "warn".to_string(),
            search: SearchConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl LinkvaultConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.search.ripgrep_path.as_os_str().is_empty() {
            return Err(Error::config_error("search.ripgrep_path cannot be empty"));
        }
        if self.search.default_limit == 0 {
            return Err(Error::config_error("search.default_limit must be > 0"));
        }
        if self.graph.node_limit == 0 {
            return Err(Error::config_error("graph.node_limit must be > 0"));
        }
        if self.graph.seed_limit == 0 {
            return Err(Error::config_error("graph.seed_limit must be > 0"));
        }
        if let Some(vault) = &self.vault {
            Self::validate_vault_path(vault)?;
        }
        Ok(())
    }

    /// Check that a vault root exists and is a directory
    pub fn validate_vault_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::config_error(format!(
                "vault path does not exist: {}",
                path.display()
            )));
        }
        if !path.is_dir() {
            return Err(Error::config_error(format!(
                "vault path is not a directory: {}",
                path.display()
            )));
        }
        Ok(())
    }

    /// Resolved vault root
    pub fn vault_root(&self) -> Result<PathBuf> {
        match &self.vault {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().map_err(Error::io),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_validate() {
        let config = LinkvaultConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.search.context_chars, 80);
        assert_eq!(config.graph.node_limit, 200);
    }

    #[test]
    fn test_rejects_zero_node_limit() {
        let mut config = LinkvaultConfig::new();
        config.graph.node_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_vault_path_must_be_dir() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("note.md");
        std::fs::write(&file, "x").unwrap();

        let mut config = LinkvaultConfig::new();
        config.vault = Some(file);
        assert!(config.validate().is_err());

        config.vault = Some(temp.path().to_path_buf());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_engine_mode_parse() {
        assert_eq!("rg".parse::<EngineMode>().unwrap(), EngineMode::Ripgrep);
        assert_eq!("Native".parse::<EngineMode>().unwrap(), EngineMode::Native);
        assert!("lucene".parse::<EngineMode>().is_err());
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = "search:\n  engine: native\ngraph:\n  depth: 3\n";
        let config: LinkvaultConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.search.engine, EngineMode::Native);
        assert_eq!(config.search.context_chars, 80);
        assert_eq!(config.graph.depth, 3);
        assert_eq!(config.graph.node_limit, 200);
    }
}
