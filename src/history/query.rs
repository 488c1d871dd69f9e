//! SQL execution against the history snapshot.

use rusqlite::{Batch, Connection, OpenFlags};
use std::path::Path;

use super::models::{Record, Value};
use super::HistoryError;

/// Read-write so any statement compiles, but never create: a missing
/// snapshot is an error, not a fresh empty database. Paths are never
/// interpreted as `file:` URIs.
const SNAPSHOT_OPEN_FLAGS: OpenFlags =
    OpenFlags::SQLITE_OPEN_READ_WRITE.union(OpenFlags::SQLITE_OPEN_NO_MUTEX);

fn open_snapshot(path: &Path) -> Result<Connection, HistoryError> {
    Ok(Connection::open_with_flags(path, SNAPSHOT_OPEN_FLAGS)?)
}

/// Runs `sql` against the snapshot at `path` and materializes every row.
///
/// Returns either the complete result set or an error; rows already read
/// are discarded if a later step fails. Records keep the engine's emission
/// order. Statements without a result set yield no records.
///
/// The statement runs inside a transaction that is always rolled back, so
/// writes never persist into the snapshot. Input holding more than one
/// statement is rejected before anything runs.
pub fn execute_query(path: &Path, sql: &str) -> Result<Vec<Record>, HistoryError> {
    let conn = open_snapshot(path)?;
    // On early return the connection is dropped, which closes it
    ensure_single_statement(&conn, sql)?;

    let tx = conn.unchecked_transaction()?;
    let records = collect_records(&tx, sql)?;
    tx.rollback()?;
    conn.close().map_err(|(_, e)| HistoryError::Query(e))?;

    tracing::debug!("Query returned {} rows", records.len());
    Ok(records)
}

fn ensure_single_statement(conn: &Connection, sql: &str) -> Result<(), HistoryError> {
    let mut batch = Batch::new(conn, sql);
    let mut count = 0;
    while batch.next()?.is_some() {
        count += 1;
        if count > 1 {
            return Err(HistoryError::Query(rusqlite::Error::MultipleStatement));
        }
    }
    Ok(())
}

fn collect_records(conn: &Connection, sql: &str) -> Result<Vec<Record>, HistoryError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut fields = Vec::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            fields.push((name.clone(), Value::from(row.get_ref(i)?)));
        }
        records.push(Record::new(fields));
    }

    Ok(records)
}

/// Renders records as one text line each.
pub fn render_records(records: &[Record]) -> Vec<String> {
    records.iter().map(Record::render).collect()
}
