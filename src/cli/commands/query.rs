//! Query command - run one SQL statement against the history snapshot

use anyhow::{Context, Result};

use crate::cli::format::OutputFormat;
use crate::cli::PathArgs;
use crate::history::HistoryService;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// SQL statement to execute
    pub sql: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: Args, paths: PathArgs) -> Result<()> {
    let service = HistoryService::new(paths.resolve()?);
    let records = service.fetch(&args.sql)?;

    match args.format {
        OutputFormat::Text => {
            for record in &records {
                println!("{record}");
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
            println!("{json}");
        }
    }

    Ok(())
}
