//! MCP (Model Context Protocol) server for Chrome history.
//!
//! Exposes the browsing history to AI tools over stdio. The server
//! implements the following tools:
//! - `fetch-urls-from-sqlite`: Run SQL against the `urls` table
//! - `fetch-visits-info-from-sqlite`: Run SQL against the `visits` table
//!
//! Both take a single `sql_statement` argument and return one text item per
//! result row.

mod server;

pub use server::run_server;
