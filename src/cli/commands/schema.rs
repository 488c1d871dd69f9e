//! Schema command - print the tables exposed over MCP

use anyhow::{bail, Result};
use colored::Colorize;

use crate::history::schema::{TableSchema, TABLES};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Only show this table (urls or visits)
    pub table: Option<String>,
}

pub fn run(args: Args) -> Result<()> {
    let tables: Vec<&TableSchema> = match args.table.as_deref() {
        Some(name) => match TableSchema::by_table(name) {
            Some(table) => vec![table],
            None => bail!("Unknown table '{name}'. Expected one of: urls, visits"),
        },
        None => TABLES.iter().collect(),
    };

    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{} {}", table.table.bold(), format!("({})", table.tool).dimmed());
        println!("{}", table.ddl);
    }

    Ok(())
}
