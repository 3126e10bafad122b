//! Bounded breadth-first neighborhood expansion.
//!
//! Starting from seed documents the expander follows outgoing wikilinks and
//! backlinks up to a depth limit, stopping node insertion at a node limit.
//! Output is sorted so repeated runs over an unchanged vault are identical.

use async_trait::async_trait;
use linkvault_core::prelude::*;
use linkvault_core::clean_slash_path;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Score added each time a path is marked as a seed
pub const SEED_BONUS: i64 = 10;

/// Warning reported when the node limit refuses an insertion
pub const NODE_LIMIT_WARNING: &str = "node limit reached; graph truncated";

/// Neighbor lookups the expander needs.
///
/// Paths are graph paths as produced by [`normalize_graph_path`].
#[async_trait]
pub trait NeighborSource: Send + Sync {
    /// Whether the document exists. A missing document is `Ok(false)`.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Raw outgoing link targets of the document
    async fn outgoing_links(&self, path: &str) -> Result<Vec<String>>;

    /// Paths of documents linking to the document
    async fn backlinks(&self, path: &str) -> Result<Vec<String>>;
}

/// Limits and policy for one expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Maximum hop count from a seed; 0 returns the seeds alone
    pub max_depth: usize,
    /// Maximum number of nodes; 0 means unlimited
    pub node_limit: usize,
    /// Abort on the first read error instead of recording a warning
    pub strict: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            node_limit: 200,
            strict: false,
        }
    }
}

/// Result of an expansion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphExpansion {
    /// Sorted by score descending, then path ascending
    pub nodes: Vec<GraphNode>,
    /// Sorted by from, to, then kind name
    pub edges: Vec<GraphEdge>,
    /// Deduplicated and sorted
    pub warnings: Vec<String>,
    pub truncated: bool,
}

/// Normalize a raw path or link target into a graph path.
///
/// Backslashes become slashes, one leading `/` is dropped, `.md` is appended
/// when missing and the result is cleaned. Blank input and `.` give `""`.
pub fn normalize_graph_path(raw: &str) -> String {
    let replaced = raw.replace('\\', "/");
    let trimmed = replaced.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.is_empty() || trimmed == "." {
        return String::new();
    }
    if trimmed.to_lowercase().ends_with(".md") {
        clean_slash_path(trimmed)
    } else {
        clean_slash_path(&format!("{}.md", trimmed))
    }
}

/// Unique graph paths of search hits, in first-seen order.
pub fn seed_paths_from_results(results: &[SearchResult]) -> Vec<String> {
    let mut seen = HashSet::new();
    results
        .iter()
        .map(|result| normalize_graph_path(&result.path))
        .filter(|path| !path.is_empty() && seen.insert(path.clone()))
        .collect()
}

/// Expands seed documents into a bounded neighborhood graph.
pub struct GraphExpander<'a> {
    source: &'a dyn NeighborSource,
    options: ExpandOptions,
    cancel: Option<CancellationToken>,
}

struct QueueItem {
    path: String,
    depth: usize,
}

/// Mutable state of one expansion run
struct Walk {
    options: ExpandOptions,
    nodes: HashMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    edge_seen: HashSet<(String, EdgeKind, String)>,
    discovered_depth: HashMap<String, usize>,
    queue: VecDeque<QueueItem>,
    note_exists: HashMap<String, bool>,
    warnings: BTreeSet<String>,
    truncated: bool,
}

impl Walk {
    fn new(options: ExpandOptions) -> Self {
        Self {
            options,
            nodes: HashMap::new(),
            edges: Vec::new(),
            edge_seen: HashSet::new(),
            discovered_depth: HashMap::new(),
            queue: VecDeque::new(),
            note_exists: HashMap::new(),
            warnings: BTreeSet::new(),
            truncated: false,
        }
    }

    fn warn(&mut self, message: String) {
        if !message.trim().is_empty() {
            self.warnings.insert(message);
        }
    }

    fn enqueue(&mut self, path: &str, depth: usize) {
        if depth > self.options.max_depth || path.is_empty() {
            return;
        }
        if self
            .discovered_depth
            .get(path)
            .is_some_and(|&existing| existing <= depth)
        {
            return;
        }
        self.discovered_depth.insert(path.to_string(), depth);
        self.queue.push_back(QueueItem {
            path: path.to_string(),
            depth,
        });
    }

    /// Insert or re-mark a node. False when the node limit refuses it.
    fn add_node(&mut self, path: &str, is_seed: bool) -> bool {
        if path.is_empty() {
            return false;
        }
        if let Some(existing) = self.nodes.get_mut(path) {
            if is_seed {
                existing.is_seed = true;
                existing.score += SEED_BONUS;
            }
            return true;
        }
        if self.options.node_limit > 0 && self.nodes.len() >= self.options.node_limit {
            self.truncated = true;
            self.warn(NODE_LIMIT_WARNING.to_string());
            return false;
        }
        let mut node = GraphNode::new(path);
        if is_seed {
            node.is_seed = true;
            node.score = SEED_BONUS;
        }
        self.nodes.insert(path.to_string(), node);
        true
    }

    fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) {
        if !self
            .edge_seen
            .insert((from.to_string(), kind, to.to_string()))
        {
            return;
        }
        self.edges.push(GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
            kind,
        });
        if let Some(src) = self.nodes.get_mut(from) {
            src.out_degree += 1;
            src.score += 1;
        }
        if let Some(dst) = self.nodes.get_mut(to) {
            dst.in_degree += 1;
            dst.score += 1;
        }
    }

    fn finish(self) -> GraphExpansion {
        let mut nodes: Vec<GraphNode> = self.nodes.into_values().collect();
        nodes.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.path.cmp(&b.path)));

        let mut edges = self.edges;
        edges.sort_by(|a, b| {
            a.from
                .cmp(&b.from)
                .then_with(|| a.to.cmp(&b.to))
                .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
        });

        GraphExpansion {
            nodes,
            edges,
            warnings: self.warnings.into_iter().collect(),
            truncated: self.truncated,
        }
    }
}

impl<'a> GraphExpander<'a> {
    /// Create an expander over `source`
    pub fn new(source: &'a dyn NeighborSource, options: ExpandOptions) -> Self {
        Self {
            source,
            options,
            cancel: None,
        }
    }

    /// Stop the walk with [`Error::Cancelled`] once `cancel` fires
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    async fn has_note(&self, walk: &mut Walk, path: &str) -> Result<bool> {
        if path.is_empty() {
            return Ok(false);
        }
        if let Some(&known) = walk.note_exists.get(path) {
            return Ok(known);
        }
        let exists = match self.source.exists(path).await {
            Ok(exists) => exists,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e),
        };
        walk.note_exists.insert(path.to_string(), exists);
        Ok(exists)
    }

    /// Expand `seeds` into a neighborhood graph.
    ///
    /// In lenient mode read failures become warnings and the walk goes on.
    /// In strict mode the first read failure is returned as the error.
    #[instrument(skip(self, seeds), fields(seeds = seeds.len(), depth = self.options.max_depth), name = "graph_expand")]
    pub async fn expand<S: AsRef<str>>(&self, seeds: &[S]) -> Result<GraphExpansion> {
        let strict = self.options.strict;
        let mut walk = Walk::new(self.options);

        for seed in seeds {
            let path = normalize_graph_path(seed.as_ref());
            if walk.add_node(&path, true) {
                walk.enqueue(&path, 0);
            }
        }

        while let Some(item) = walk.queue.pop_front() {
            if self.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if item.depth >= self.options.max_depth {
                continue;
            }
            match self.has_note(&mut walk, &item.path).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    walk.warn(format!("failed to read note {}: {}", item.path, e));
                    if strict {
                        return Err(e);
                    }
                    continue;
                }
            }

            match self.source.outgoing_links(&item.path).await {
                Ok(outgoing) => {
                    for raw in outgoing {
                        let target = normalize_graph_path(&raw);
                        if !walk.add_node(&target, false) {
                            continue;
                        }
                        walk.add_edge(&item.path, &target, EdgeKind::LinksTo);
                        match self.has_note(&mut walk, &target).await {
                            Ok(true) => walk.enqueue(&target, item.depth + 1),
                            Ok(false) => {}
                            Err(e) => {
                                walk.warn(format!("failed to read linked note {}: {}", target, e));
                                if strict {
                                    return Err(e);
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    walk.warn(format!(
                        "failed to list outgoing links for {}: {}",
                        item.path, e
                    ));
                    if strict {
                        return Err(e);
                    }
                }
            }

            match self.source.backlinks(&item.path).await {
                Ok(backlinks) => {
                    for raw in backlinks {
                        let source = normalize_graph_path(&raw);
                        if !walk.add_node(&source, false) {
                            continue;
                        }
                        walk.add_edge(&source, &item.path, EdgeKind::LinkedTo);
                        walk.enqueue(&source, item.depth + 1);
                    }
                }
                Err(e) => {
                    walk.warn(format!("failed to list backlinks for {}: {}", item.path, e));
                    if strict {
                        return Err(e);
                    }
                }
            }
        }

        let expansion = walk.finish();
        log::debug!(
            "Expanded {} seeds into {} nodes and {} edges (truncated: {})",
            seeds.len(),
            expansion.nodes.len(),
            expansion.edges.len(),
            expansion.truncated
        );
        Ok(expansion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_graph_path() {
        assert_eq!(normalize_graph_path(" /notes\\a "), "notes/a.md");
        assert_eq!(normalize_graph_path("b"), "b.md");
        assert_eq!(normalize_graph_path("x/./y.MD"), "x/y.MD");
        assert_eq!(normalize_graph_path(""), "");
        assert_eq!(normalize_graph_path("."), "");
    }

    #[test]
    fn test_seed_paths_from_results() {
        let hit = |path: &str| SearchResult {
            path: path.to_string(),
            line: 1,
            column: 1,
            match_text: "x".to_string(),
            snippet: "x".to_string(),
            match_type: MatchType::Text,
        };
        let results = vec![hit("b.md"), hit("a.md"), hit("b.md"), hit("b")];
        assert_eq!(seed_paths_from_results(&results), vec!["b.md", "a.md"]);
    }

    #[test]
    fn test_repeat_seed_compounds_bonus() {
        let mut walk = Walk::new(ExpandOptions::default());
        assert!(walk.add_node("a.md", true));
        assert!(walk.add_node("a.md", true));
        assert_eq!(walk.nodes["a.md"].score, 2 * SEED_BONUS);
    }

    #[test]
    fn test_duplicate_edge_counted_once() {
        let mut walk = Walk::new(ExpandOptions::default());
        walk.add_node("a.md", false);
        walk.add_node("b.md", false);
        walk.add_edge("a.md", "b.md", EdgeKind::LinksTo);
        walk.add_edge("a.md", "b.md", EdgeKind::LinksTo);
        walk.add_edge("a.md", "b.md", EdgeKind::LinkedTo);
        assert_eq!(walk.edges.len(), 2);
        assert_eq!(walk.nodes["a.md"].out_degree, 2);
        assert_eq!(walk.nodes["b.md"].in_degree, 2);
    }

    #[test]
    fn test_edges_sort_by_kind_name() {
        let mut walk = Walk::new(ExpandOptions::default());
        walk.add_edge("a.md", "b.md", EdgeKind::LinksTo);
        walk.add_edge("a.md", "b.md", EdgeKind::LinkedTo);
        let expansion = walk.finish();
        assert_eq!(expansion.edges[0].kind, EdgeKind::LinkedTo);
        assert_eq!(expansion.edges[1].kind, EdgeKind::LinksTo);
    }
}
