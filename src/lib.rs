//! chrome-history-mcp - SQL access to Chrome history for AI tools
//!
//! Keeps a private snapshot of Chrome's locked `History` database and runs
//! caller-supplied SQL against it, rendering each row as a text line.

pub mod config;
pub mod history;
