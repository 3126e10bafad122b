//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use linkvault_core::EngineMode;
use std::path::PathBuf;

/// linkvault - link graph, backlinks and search for markdown vaults
#[derive(Parser, Debug)]
#[command(name = "linkvault", author, version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Path to the vault directory (defaults to the working directory)
    #[arg(short, long, env = "LINKVAULT_VAULT", global = true)]
    pub vault: Option<PathBuf>,

    /// YAML configuration file (defaults to <vault>/.linkvault.yaml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON envelopes instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Text search backend: auto, ripgrep or native
    #[arg(long, global = true)]
    pub engine: Option<EngineMode>,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Overall deadline in seconds; searches stop when it passes
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search note text, tags or frontmatter properties
    Search(SearchArgs),
    /// Outgoing links and backlinks of a note
    #[command(subcommand)]
    Links(LinksCommand),
    /// Neighborhood graphs around notes
    #[command(subcommand)]
    Graph(GraphCommand),
    /// Backlink index maintenance
    #[command(subcommand)]
    Index(IndexCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Text to search for
    pub text: Option<String>,
    /// Search by tag instead of text
    #[arg(long, default_value = "")]
    pub tag: String,
    /// Search by frontmatter property, as key=value
    #[arg(long, default_value = "")]
    pub prop: String,
    /// Result limit (config search.default_limit when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
    /// Snippet context in characters on each side of the match
    #[arg(long, allow_negative_numbers = true)]
    pub context: Option<i64>,
    /// Maximum snippet length in characters
    #[arg(long, allow_negative_numbers = true)]
    pub max_chars: Option<i64>,
    /// Restrict to a directory under the vault
    #[arg(long, default_value = "")]
    pub path: String,
    #[arg(long)]
    pub case_sensitive: bool,
    /// Include metadata and warnings in the output
    #[arg(long)]
    pub with_meta: bool,
    /// Fail when warnings are present
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum LinksCommand {
    /// Wikilink targets of a note
    Outgoing { path: String },
    /// Notes linking to a note
    Backlinks {
        path: String,
        /// Rebuild the backlink index first
        #[arg(long)]
        index: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct GraphLimits {
    /// Link expansion depth (config graph.depth when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub depth: Option<i64>,
    /// Maximum graph nodes (config graph.node_limit when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub node_limit: Option<i64>,
    /// Fail when warnings are present
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum GraphCommand {
    /// Expand outgoing links and backlinks around a note
    Neighborhood {
        path: String,
        #[command(flatten)]
        limits: GraphLimits,
    },
    /// Build a graph seeded by a text search
    Context {
        query: String,
        /// Maximum number of seed notes
        #[arg(long, allow_negative_numbers = true)]
        seed_limit: Option<i64>,
        /// Restrict the seed search to a directory
        #[arg(long, default_value = "")]
        path: String,
        #[arg(long)]
        case_sensitive: bool,
        #[command(flatten)]
        limits: GraphLimits,
    },
}

#[derive(Subcommand, Debug)]
pub enum IndexCommand {
    /// Rebuild the backlink index and print its statistics
    Build,
}
