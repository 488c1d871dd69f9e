//! Snapshot management for the live history database.
//!
//! Chrome keeps its `History` file locked while the browser runs, so all
//! queries go against a private copy. The copy is refreshed whenever the
//! source has been modified more than [`STALENESS_TOLERANCE`] after the
//! snapshot's recorded modification time.
//!
//! No lock is taken on the source. A copy made while Chrome is writing may
//! capture a torn state; the next refresh picks up a consistent one.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;

use super::HistoryError;

/// How far the source may run ahead of the snapshot before a re-copy.
pub const STALENESS_TOLERANCE: Duration = Duration::from_secs(1);

/// Outcome of [`ensure_fresh_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotRefresh {
    /// No snapshot existed; the source was copied.
    Created,
    /// The snapshot was stale and has been overwritten.
    Refreshed,
    /// The snapshot was recent enough and left untouched.
    Fresh,
}

/// Returns true when `source` is more than the tolerance newer than `snapshot`.
pub fn is_stale(source: SystemTime, snapshot: SystemTime) -> bool {
    match source.duration_since(snapshot) {
        Ok(lag) => lag > STALENESS_TOLERANCE,
        // Snapshot is newer than the source
        Err(_) => false,
    }
}

/// Makes sure `snapshot` holds a recent copy of `source`.
///
/// Copies unconditionally when the snapshot is missing, re-copies when it is
/// stale, and otherwise does nothing. Copies carry the source's modification
/// time and permissions so the next comparison stays meaningful. A failed
/// copy leaves any existing snapshot exactly as it was.
pub fn ensure_fresh_snapshot(
    source: &Path,
    snapshot: &Path,
) -> Result<SnapshotRefresh, HistoryError> {
    let snapshot_err = |error: io::Error| HistoryError::Snapshot {
        source_path: source.to_path_buf(),
        snapshot_path: snapshot.to_path_buf(),
        error,
    };

    let source_meta = fs::metadata(source).map_err(snapshot_err)?;
    let source_mtime = source_meta.modified().map_err(snapshot_err)?;

    let outcome = match fs::metadata(snapshot) {
        Ok(meta) => {
            let snapshot_mtime = meta.modified().map_err(snapshot_err)?;
            if !is_stale(source_mtime, snapshot_mtime) {
                return Ok(SnapshotRefresh::Fresh);
            }
            SnapshotRefresh::Refreshed
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => SnapshotRefresh::Created,
        Err(e) => return Err(snapshot_err(e)),
    };

    copy_with_metadata(source, snapshot, &source_meta, source_mtime).map_err(snapshot_err)?;

    tracing::info!(
        "Snapshot {} {} from {}",
        snapshot.display(),
        if outcome == SnapshotRefresh::Created {
            "created"
        } else {
            "refreshed"
        },
        source.display()
    );

    Ok(outcome)
}

/// Full-file copy that also transfers mtime and permissions.
///
/// Writes to a temporary file next to the snapshot and renames it into
/// place, so the snapshot is never observed half-written.
fn copy_with_metadata(
    source: &Path,
    snapshot: &Path,
    source_meta: &fs::Metadata,
    mtime: SystemTime,
) -> io::Result<()> {
    let dir = match snapshot.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut reader = File::open(source)?;
    let mut staged = NamedTempFile::new_in(dir)?;
    io::copy(&mut reader, staged.as_file_mut())?;
    staged.as_file().set_modified(mtime)?;
    staged.as_file().sync_all()?;
    fs::set_permissions(staged.path(), source_meta.permissions())?;

    staged.persist(snapshot).map_err(|e| e.error)?;
    Ok(())
}
