//! Snapshot-backed access to the Chrome history database.
//!
//! Queries never touch Chrome's live `History` file. Each call first makes
//! sure a private snapshot is up to date, then runs the SQL against it.

pub mod models;
pub mod query;
pub mod schema;
pub mod snapshot;

use std::path::PathBuf;
use std::sync::Mutex;

use crate::config::Config;

pub use models::{Record, Value};
pub use query::{execute_query, render_records};
pub use schema::TableSchema;
pub use snapshot::{ensure_fresh_snapshot, SnapshotRefresh};

/// Errors from resolving, snapshotting or querying the history database.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The history file does not exist.
    #[error("History file not found at {}", path.display())]
    HistoryNotFound { path: PathBuf },

    /// No default history location could be derived for this platform.
    #[error("Could not determine the default history location: {0}")]
    NoDefaultLocation(String),

    /// Copying the history file to the snapshot failed.
    #[error(
        "Failed to refresh snapshot {} from {}: {error}",
        snapshot_path.display(),
        source_path.display()
    )]
    Snapshot {
        source_path: PathBuf,
        snapshot_path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// SQLite rejected or failed to run the statement.
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Runs queries against a snapshot of the configured history file.
///
/// Refresh and query happen under one lock, so concurrent callers cannot
/// replace the snapshot while another query is reading it.
#[derive(Debug)]
pub struct HistoryService {
    config: Config,
    lock: Mutex<()>,
}

impl HistoryService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Refreshes the snapshot if needed and runs `sql` against it.
    pub fn fetch(&self, sql: &str) -> Result<Vec<Record>, HistoryError> {
        // A poisoned lock only means an earlier query panicked
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let refresh =
            ensure_fresh_snapshot(&self.config.history_path, &self.config.snapshot_path)?;
        if refresh == SnapshotRefresh::Fresh {
            tracing::debug!("Snapshot {} is fresh", self.config.snapshot_path.display());
        }

        execute_query(&self.config.snapshot_path, sql).inspect_err(|e| {
            tracing::warn!("{e}");
        })
    }

    /// Like [`fetch`](Self::fetch), with each record rendered to a line.
    pub fn fetch_lines(&self, sql: &str) -> Result<Vec<String>, HistoryError> {
        self.fetch(sql).map(|records| render_records(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn create_service() -> (TempDir, HistoryService) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let history = dir.path().join("History");
        let conn = Connection::open(&history).expect("Failed to open history");
        conn.execute_batch(schema::URLS_SCHEMA).unwrap();
        conn.execute(
            "INSERT INTO urls (url, title, visit_count, last_visit_time) VALUES ('http://a', 'A', 3, 0)",
            [],
        )
        .unwrap();
        drop(conn);

        let config = Config {
            history_path: history,
            snapshot_path: dir.path().join("snapshot"),
        };
        (dir, HistoryService::new(config))
    }

    #[test]
    fn test_fetch_creates_snapshot() {
        let (_dir, service) = create_service();
        assert!(!service.config().snapshot_path.exists());

        let lines = service.fetch_lines("SELECT url, visit_count FROM urls").unwrap();

        assert_eq!(lines, vec!["url: http://a, visit_count: 3"]);
        assert!(service.config().snapshot_path.exists());
    }

    #[test]
    fn test_fetch_sees_updates_after_refresh() {
        let (_dir, service) = create_service();
        service.fetch("SELECT 1").unwrap();

        let conn = Connection::open(&service.config().history_path).unwrap();
        conn.execute(
            "INSERT INTO urls (url, last_visit_time) VALUES ('http://b', 0)",
            [],
        )
        .unwrap();
        drop(conn);
        // Push the source mtime well past the tolerance
        File::options()
            .write(true)
            .open(&service.config().history_path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(10))
            .unwrap();

        let records = service.fetch("SELECT url FROM urls ORDER BY id").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_write_statement_does_not_change_later_results() {
        let (_dir, service) = create_service();
        File::options()
            .write(true)
            .open(&service.config().history_path)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(60))
            .unwrap();

        service.fetch("DELETE FROM urls").unwrap();

        let lines = service.fetch_lines("SELECT count(*) AS n FROM urls").unwrap();
        assert_eq!(lines, vec!["n: 1"]);
    }

    #[test]
    fn test_concurrent_fetches_while_source_changes() {
        let (_dir, service) = create_service();
        let history = service.config().history_path.clone();
        let sql = "SELECT count(*) AS n, max(url) AS u FROM urls";

        std::thread::scope(|s| {
            // Keep moving the source mtime forward so most fetches re-copy
            s.spawn(|| {
                for i in 0..20 {
                    File::options()
                        .write(true)
                        .open(&history)
                        .unwrap()
                        .set_modified(SystemTime::now() + Duration::from_secs(10 + 2 * i))
                        .unwrap();
                    std::thread::sleep(Duration::from_millis(5));
                }
            });

            let workers: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..10)
                            .map(|_| service.fetch_lines(sql))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            for worker in workers {
                for result in worker.join().expect("Worker panicked") {
                    let lines = result.expect("Concurrent fetch should succeed");
                    assert_eq!(lines, vec!["n: 1, u: http://a"]);
                }
            }
        });
    }

    #[test]
    fn test_fetch_error_is_query_error() {
        let (_dir, service) = create_service();
        let err = service.fetch("SELECT * FROM nosuchtable").unwrap_err();
        assert!(matches!(err, HistoryError::Query(_)));
    }

    #[test]
    fn test_fetch_missing_history_is_snapshot_error() {
        let (_dir, service) = create_service();
        std::fs::remove_file(&service.config().history_path).unwrap();

        let err = service.fetch("SELECT 1").unwrap_err();
        assert!(matches!(err, HistoryError::Snapshot { .. }));
    }

    #[test]
    fn test_error_messages() {
        let err = HistoryError::HistoryNotFound {
            path: PathBuf::from("/nope/History"),
        };
        assert_eq!(err.to_string(), "History file not found at /nope/History");
    }
}
