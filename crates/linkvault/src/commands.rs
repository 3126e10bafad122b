//! Command handlers.
//!
//! Each handler returns a [`CommandOutput`]; printing and exit codes are
//! left to the binary.

use crate::cli::{Command, GraphCommand, GraphLimits, IndexCommand, LinksCommand, SearchArgs};
use crate::output::CommandOutput;
use chrono::{DateTime, Utc};
use linkvault_core::format_timestamp;
use linkvault_core::prelude::*;
use linkvault_core::strict::{GRAPH_HINT, SEARCH_HINT, enforce};
use linkvault_graph::{
    BacklinkCache, ExpandOptions, GraphExpander, GraphExpansion, IndexStats, VaultNeighbors,
    normalize_graph_path, seed_paths_from_results,
};
use linkvault_parser::parse_wikilinks;
use linkvault_search::{
    EngineSelector, LIMIT_WARNING, SearchEngine, SearchQuery, VaultSearch, apply_snippet_max_chars,
};
use linkvault_vault::{DocumentStore, FsDocumentStore, source_file_mtime_max};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Cache status reported by graph commands
pub const GRAPH_CACHE_STATUS: &str = "backlinks_in_memory_auto";

/// Cache status reported by search
pub const SEARCH_CACHE_STATUS: &str = "on_demand";

/// Snippet context used for graph context seed searches
const SEED_CONTEXT_CHARS: i64 = 80;

#[derive(Debug, Serialize)]
struct GraphPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seeds: Option<&'a [SearchResult]>,
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
    metadata: OperationMetadata,
    #[serde(skip_serializing_if = "no_warnings")]
    warnings: &'a [String],
}

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    results: &'a [SearchResult],
    metadata: OperationMetadata,
    warnings: &'a [String],
}

#[derive(Debug, Serialize)]
struct IndexPayload {
    stats: IndexStats,
    built_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_mtime_max: Option<String>,
    cache_status: &'static str,
}

fn no_warnings(warnings: &&[String]) -> bool {
    warnings.is_empty()
}

fn to_data<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| Error::other(format!("failed to serialize output: {}", e)))
}

/// One vault with its store, backlink cache and search stack.
pub struct App {
    root: PathBuf,
    config: LinkvaultConfig,
    store: Arc<dyn DocumentStore>,
    cache: Arc<BacklinkCache>,
    search: VaultSearch,
}

impl App {
    /// Open the vault named by `config`, or the working directory.
    pub fn new(config: LinkvaultConfig) -> Result<Self> {
        let root = config.vault_root()?;
        LinkvaultConfig::validate_vault_path(&root)?;
        let store: Arc<dyn DocumentStore> = Arc::new(FsDocumentStore::new(&root));
        let engine: Arc<dyn SearchEngine> = Arc::new(EngineSelector::new(&root, &config.search));
        let search = VaultSearch::new(store.clone(), engine);
        Ok(Self {
            root,
            config,
            store,
            cache: Arc::new(BacklinkCache::new()),
            search,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[instrument(skip(self, cancel), name = "linkvault_command")]
    pub async fn run(&self, command: &Command, cancel: &CancellationToken) -> Result<CommandOutput> {
        match command {
            Command::Search(args) => self.search(args, cancel).await,
            Command::Links(LinksCommand::Outgoing { path }) => self.outgoing(path).await,
            Command::Links(LinksCommand::Backlinks { path, index }) => {
                self.backlinks(path, *index).await
            }
            Command::Graph(GraphCommand::Neighborhood { path, limits }) => {
                self.neighborhood(path, limits, cancel).await
            }
            Command::Graph(GraphCommand::Context {
                query,
                seed_limit,
                path,
                case_sensitive,
                limits,
            }) => {
                let seed_limit = positive_or(*seed_limit, self.config.graph.seed_limit);
                self.context(query, seed_limit, path, *case_sensitive, limits, cancel)
                    .await
            }
            Command::Index(IndexCommand::Build) => self.build_index().await,
        }
    }

    pub async fn search(
        &self,
        args: &SearchArgs,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput> {
        let max_chars = match args.max_chars {
            Some(max) if max <= 0 => {
                return Err(Error::validation_error("--max-chars must be > 0"));
            }
            Some(max) => max as usize,
            None => 0,
        };
        let query = SearchQuery::build(
            args.text.as_deref().unwrap_or_default(),
            &args.tag,
            &args.prop,
            args.limit.unwrap_or(self.config.search.default_limit as i64),
            args.context.unwrap_or(self.config.search.context_chars as i64),
            &args.path,
            args.case_sensitive,
        )?;

        let mut results = self.search.search(&query, cancel).await?;
        apply_snippet_max_chars(&mut results, max_chars);

        let truncated = results.len() >= query.limit();
        let warnings: Vec<String> = if truncated {
            vec![LIMIT_WARNING.to_string()]
        } else {
            Vec::new()
        };
        enforce(args.strict, &warnings, SEARCH_HINT)?;

        let mut lines: Vec<String> = results
            .iter()
            .map(|r| {
                if r.line > 0 {
                    format!("{}:{}\t{}", r.path, r.line, r.snippet)
                } else {
                    format!("{}\t{}", r.path, r.match_text)
                }
            })
            .collect();

        if !args.with_meta {
            return Ok(CommandOutput::new(to_data(&results)?, lines));
        }

        let mut metadata = OperationMetadata::new(args.strict)
            .with_cache_status(SEARCH_CACHE_STATUS)
            .with_source_mtime(self.source_mtime().await);
        metadata.truncated = truncated;
        lines.push(format!(
            "metadata: generated_at={} cache_status={} truncated={}",
            metadata.generated_at, metadata.cache_status, metadata.truncated
        ));
        if let Some(mtime) = &metadata.source_file_mtime_max {
            lines.push(format!("source_file_mtime_max: {}", mtime));
        }
        lines.extend(warnings.iter().map(|w| format!("warning: {}", w)));

        let payload = SearchPayload {
            results: &results,
            metadata,
            warnings: &warnings,
        };
        Ok(CommandOutput::new(to_data(&payload)?, lines))
    }

    pub async fn outgoing(&self, path: &str) -> Result<CommandOutput> {
        let doc = DocumentRef::parse(path)?;
        let body = self.store.get_body(&doc).await?;
        let links = parse_wikilinks(&body);
        Ok(CommandOutput::new(to_data(&links)?, links))
    }

    /// Backlinks from the cached index; `rebuild` forces a fresh build.
    pub async fn backlinks(&self, path: &str, rebuild: bool) -> Result<CommandOutput> {
        let doc = DocumentRef::parse(path)?;
        let (index, status) = self.cache.get_or_build(self.store.as_ref(), rebuild).await?;
        log::debug!("Backlink index {} for {}", status, doc);
        let backlinks = index.backlinks_for(&doc);
        Ok(CommandOutput::new(to_data(&backlinks)?, backlinks))
    }

    pub async fn neighborhood(
        &self,
        path: &str,
        limits: &GraphLimits,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput> {
        let seed = normalize_graph_path(path);
        if seed.is_empty() {
            return Err(Error::validation_error("note path is required"));
        }
        let graph = self.expand(&[seed], limits, cancel).await?;
        let metadata = self.graph_metadata(&graph, limits.strict).await;

        let mut lines = vec![format!("nodes: {} edges: {}", graph.nodes.len(), graph.edges.len())];
        lines.extend(graph.warnings.iter().map(|w| format!("warning: {}", w)));
        lines.extend(
            graph
                .edges
                .iter()
                .map(|e| format!("{} -> {} ({})", e.from, e.to, e.kind)),
        );

        let payload = GraphPayload {
            query: None,
            seeds: None,
            nodes: &graph.nodes,
            edges: &graph.edges,
            metadata,
            warnings: &graph.warnings,
        };
        Ok(CommandOutput::new(to_data(&payload)?, lines))
    }

    pub async fn context(
        &self,
        query: &str,
        seed_limit: usize,
        path_prefix: &str,
        case_sensitive: bool,
        limits: &GraphLimits,
        cancel: &CancellationToken,
    ) -> Result<CommandOutput> {
        let search = SearchQuery::build(
            query,
            "",
            "",
            seed_limit as i64,
            SEED_CONTEXT_CHARS,
            path_prefix,
            case_sensitive,
        )?;
        let seeds = self.search.search(&search, cancel).await?;
        let seed_paths = seed_paths_from_results(&seeds);
        let graph = self.expand(&seed_paths, limits, cancel).await?;
        let metadata = self.graph_metadata(&graph, limits.strict).await;

        let mut lines = vec![format!(
            "seeds: {} nodes: {} edges: {}",
            seed_paths.len(),
            graph.nodes.len(),
            graph.edges.len()
        )];
        lines.extend(graph.warnings.iter().map(|w| format!("warning: {}", w)));
        lines.extend(
            graph
                .nodes
                .iter()
                .filter(|n| n.is_seed)
                .map(|n| format!("seed: {}", n.path)),
        );

        let payload = GraphPayload {
            query: Some(query),
            seeds: (!seeds.is_empty()).then_some(seeds.as_slice()),
            nodes: &graph.nodes,
            edges: &graph.edges,
            metadata,
            warnings: &graph.warnings,
        };
        Ok(CommandOutput::new(to_data(&payload)?, lines))
    }

    pub async fn build_index(&self) -> Result<CommandOutput> {
        let (index, status) = self.cache.get_or_build(self.store.as_ref(), true).await?;
        let stats = index.stats();
        let payload = IndexPayload {
            stats,
            built_at: format_timestamp(index.built_at),
            file_mtime_max: index.file_mtime_max.map(format_timestamp),
            cache_status: status.as_str(),
        };
        let lines = vec![format!(
            "documents: {} links: {} targets: {}",
            stats.documents, stats.links, stats.targets
        )];
        Ok(CommandOutput::new(to_data(&payload)?, lines))
    }

    /// Expand `seeds` and apply the strict policy to the warnings.
    async fn expand(
        &self,
        seeds: &[String],
        limits: &GraphLimits,
        cancel: &CancellationToken,
    ) -> Result<GraphExpansion> {
        let options = ExpandOptions {
            max_depth: limits
                .depth
                .map_or(self.config.graph.depth, |d| d.max(0) as usize),
            node_limit: positive_or(limits.node_limit, self.config.graph.node_limit),
            strict: limits.strict,
        };
        let neighbors = VaultNeighbors::new(self.store.clone(), self.cache.clone());
        let graph = GraphExpander::new(&neighbors, options)
            .with_cancel(cancel.clone())
            .expand(seeds)
            .await?;
        if let Some(status) = neighbors.cache_status().await {
            log::debug!("Backlink index {} during expansion", status);
        }
        enforce(limits.strict, &graph.warnings, GRAPH_HINT)?;
        Ok(graph)
    }

    async fn graph_metadata(&self, graph: &GraphExpansion, strict: bool) -> OperationMetadata {
        let mut metadata = OperationMetadata::new(strict)
            .with_cache_status(GRAPH_CACHE_STATUS)
            .with_source_mtime(self.source_mtime().await);
        metadata.truncated = graph.truncated;
        metadata
    }

    async fn source_mtime(&self) -> Option<DateTime<Utc>> {
        source_file_mtime_max(self.store.as_ref()).await.ok().flatten()
    }
}

/// A positive flag value, or `fallback` for missing and non-positive ones
fn positive_or(value: Option<i64>, fallback: usize) -> usize {
    match value {
        Some(v) if v > 0 => v as usize,
        _ => fallback,
    }
}
