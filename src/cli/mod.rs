//! Command-line interface for chrome-history-mcp.
//!
//! Besides running the MCP server, the CLI can run a single query through
//! the same snapshot path and print the table schemas.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;

/// Individual CLI command implementations.
pub mod commands;

/// Output format selection.
pub mod format;

/// Options that locate the history file and its snapshot.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Path to Chrome's History file (defaults to the platform location)
    #[arg(long, global = true, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Where to keep the working snapshot
    #[arg(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,
}

impl PathArgs {
    /// Resolves the configuration, failing if the history file is missing.
    pub fn resolve(self) -> Result<Config> {
        Ok(Config::resolve(self.path, self.snapshot)?)
    }
}
