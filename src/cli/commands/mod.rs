//! CLI commands.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// Run one SQL statement against the history snapshot.
pub mod query;

/// Print the history table schemas.
pub mod schema;

/// Start the MCP server on stdio.
pub mod serve;
