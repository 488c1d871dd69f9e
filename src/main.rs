use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod history;
mod mcp;

use cli::{commands, PathArgs};

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "chrome-history-mcp")]
#[command(version)]
#[command(about = "Query your Chrome browsing history with SQL over MCP")]
#[command(long_about = "Exposes the local Chrome history database to AI tools through the\n\
    Model Context Protocol. Queries run against a private snapshot of the\n\
    History file, which is refreshed whenever Chrome has written to it.")]
#[command(after_help = "EXAMPLES:\n    \
    chrome-history-mcp                          Serve MCP on stdio\n    \
    chrome-history-mcp --path ~/History serve   Serve a specific History file\n    \
    chrome-history-mcp query \"SELECT url FROM urls LIMIT 5\"\n    \
    chrome-history-mcp schema visits            Show the visits table schema")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    paths: PathArgs,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio (default)
    #[command(long_about = "Starts the MCP server on stdio. The server reads JSON-RPC requests\n\
        from stdin and writes responses to stdout.\n\n\
        Available tools:\n  \
        - fetch-urls-from-sqlite: Run SQL against the urls table\n  \
        - fetch-visits-info-from-sqlite: Run SQL against the visits table")]
    Serve(commands::serve::Args),

    /// Run one SQL statement and print the rows
    #[command(long_about = "Refreshes the snapshot if needed, runs the statement against it and\n\
        prints each row the way MCP clients receive it.")]
    Query(commands::query::Args),

    /// Print the schemas of the queryable tables
    Schema(commands::schema::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the MCP transport, so logs go to stderr
    let filter = if cli.verbose {
        "chrome_history_mcp=debug"
    } else {
        "chrome_history_mcp=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();

    match cli.command.unwrap_or(Commands::Serve(Default::default())) {
        Commands::Serve(args) => commands::serve::run(args, cli.paths),
        Commands::Query(args) => commands::query::run(args, cli.paths),
        Commands::Schema(args) => commands::schema::run(args),
    }
}
