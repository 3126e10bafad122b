//! # linkvault
//!
//! Command-line front end over the linkvault crates: wiring of
//! configuration, logging and output around the backlink index, graph
//! expansion and search.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod settings;

pub use cli::{Cli, Command};
pub use commands::App;
pub use output::{CommandOutput, render_error, render_success};
