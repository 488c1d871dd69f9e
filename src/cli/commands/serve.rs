//! Serve command.
//!
//! Starts the Model Context Protocol server that exposes the Chrome
//! history to AI tools.

use anyhow::Result;

use crate::cli::PathArgs;

/// Arguments for the serve command.
#[derive(clap::Args, Debug, Default)]
pub struct Args {}

/// Runs the MCP server until the client disconnects.
pub fn run(_args: Args, paths: PathArgs) -> Result<()> {
    // Resolve before starting the runtime so a missing file fails fast
    let config = paths.resolve()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(crate::mcp::run_server(config))
}
