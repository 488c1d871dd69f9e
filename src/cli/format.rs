//! Output formatting for CLI commands.

use clap::ValueEnum;

/// Output format options for the query command.
///
/// - `Text` prints one `col: value, ...` line per row, exactly as MCP
///   clients receive them
/// - `Json` prints an array of objects keyed by column name
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rendered text lines (default).
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}
