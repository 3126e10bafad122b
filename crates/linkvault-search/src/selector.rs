//! Engine selection with transparent fallback.

use crate::engine::SearchEngine;
use crate::native::NativeEngine;
use crate::query::SearchQuery;
use crate::ripgrep::RipgrepEngine;
use async_trait::async_trait;
use linkvault_core::prelude::*;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// Picks ripgrep or the native scanner per [`EngineMode`].
///
/// In `Auto` mode the ripgrep probe runs at most once per selector. If the
/// probe fails, or ripgrep turns out to be unavailable at spawn time, the
/// native engine answers instead and the caller sees no error.
pub struct EngineSelector {
    mode: EngineMode,
    ripgrep: RipgrepEngine,
    native: NativeEngine,
    probe: OnceCell<bool>,
}

impl EngineSelector {
    /// Selector for `vault_root` configured from `config`
    pub fn new(vault_root: impl Into<PathBuf>, config: &SearchConfig) -> Self {
        let vault_root = vault_root.into();
        Self {
            mode: config.engine,
            ripgrep: RipgrepEngine::with_program(&vault_root, &config.ripgrep_path),
            native: NativeEngine::new(vault_root),
            probe: OnceCell::new(),
        }
    }

    /// Selector with the default ripgrep program and an explicit mode
    pub fn with_mode(vault_root: impl Into<PathBuf>, mode: EngineMode) -> Self {
        let config = SearchConfig {
            engine: mode,
            ..SearchConfig::default()
        };
        Self::new(vault_root, &config)
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// Whether ripgrep answered the probe; cached after the first call
    pub async fn ripgrep_available(&self) -> bool {
        *self
            .probe
            .get_or_init(|| RipgrepEngine::probe(self.ripgrep.program()))
            .await
    }

    /// Name of the engine a text query would run on right now
    pub async fn active_engine(&self) -> &'static str {
        match self.mode {
            EngineMode::Ripgrep => self.ripgrep.name(),
            EngineMode::Native => self.native.name(),
            EngineMode::Auto if self.ripgrep_available().await => self.ripgrep.name(),
            EngineMode::Auto => self.native.name(),
        }
    }
}

#[async_trait]
impl SearchEngine for EngineSelector {
    fn name(&self) -> &'static str {
        "auto"
    }

    async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchResult>> {
        match self.mode {
            EngineMode::Ripgrep => self.ripgrep.search(query, cancel).await,
            EngineMode::Native => self.native.search(query, cancel).await,
            EngineMode::Auto => {
                if !self.ripgrep_available().await {
                    log::info!("ripgrep not available, using native search");
                    return self.native.search(query, cancel).await;
                }
                match self.ripgrep.search(query, cancel).await {
                    Err(Error::ToolUnavailable { tool }) => {
                        log::info!("{} could not be started, using native search", tool);
                        self.native.search(query, cancel).await
                    }
                    other => other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_falls_back_without_ripgrep() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        tokio::fs::write(temp_dir.path().join("a.md"), "find the needle")
            .await
            .unwrap();
        let config = SearchConfig {
            ripgrep_path: PathBuf::from("/nonexistent/rg-binary"),
            ..SearchConfig::default()
        };
        let selector = EngineSelector::new(temp_dir.path(), &config);

        assert!(!selector.ripgrep_available().await);
        assert_eq!(selector.active_engine().await, "native");
        let query = SearchQuery::text("needle").unwrap();
        let results = selector
            .search(&query, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "a.md");
    }

    #[tokio::test]
    async fn test_forced_ripgrep_reports_unavailable() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = SearchConfig {
            engine: EngineMode::Ripgrep,
            ripgrep_path: PathBuf::from("/nonexistent/rg-binary"),
            ..SearchConfig::default()
        };
        let selector = EngineSelector::new(temp_dir.path(), &config);
        let query = SearchQuery::text("needle").unwrap();

        let err = selector
            .search(&query, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolUnavailable { .. }));
    }
}
