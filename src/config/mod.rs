//! Startup configuration.
//!
//! Resolves where Chrome's history lives and where the working snapshot is
//! kept. Resolution happens once; the result is owned by the service.

use std::path::{Path, PathBuf};

use crate::history::HistoryError;

/// File name of the working snapshot, relative to the working directory.
pub const DEFAULT_SNAPSHOT_NAME: &str = "chrome-history-snapshot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Chrome's live `History` database.
    pub history_path: PathBuf,

    /// Private copy that queries run against.
    pub snapshot_path: PathBuf,
}

impl Config {
    /// Resolves the configuration, falling back to platform defaults.
    ///
    /// Fails if the history file does not exist, since nothing useful can
    /// be served without it.
    pub fn resolve(
        history_path: Option<PathBuf>,
        snapshot_path: Option<PathBuf>,
    ) -> Result<Self, HistoryError> {
        let history_path = match history_path {
            Some(path) => path,
            None => default_history_path()?,
        };

        if !history_path.is_file() {
            return Err(HistoryError::HistoryNotFound { path: history_path });
        }

        Ok(Self {
            history_path,
            snapshot_path: snapshot_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_NAME)),
        })
    }
}

/// Chrome's default history location for the current platform.
pub fn default_history_path() -> Result<PathBuf, HistoryError> {
    let base = if cfg!(windows) {
        dirs::data_local_dir()
    } else {
        dirs::home_dir()
    };
    let base = base.ok_or_else(|| {
        HistoryError::NoDefaultLocation(if cfg!(windows) {
            "local app data directory is not set".to_string()
        } else {
            "home directory is not set".to_string()
        })
    })?;

    Ok(history_path_for(std::env::consts::OS, &base))
}

/// Default history location for `os`, relative to `base`.
///
/// `base` is the local app data directory on Windows and the home
/// directory everywhere else.
pub fn history_path_for(os: &str, base: &Path) -> PathBuf {
    match os {
        "windows" => base
            .join("Google")
            .join("Chrome")
            .join("User Data")
            .join("Default")
            .join("History"),
        "macos" => base
            .join("Library")
            .join("Application Support")
            .join("Google")
            .join("Chrome")
            .join("Default")
            .join("History"),
        _ => base
            .join(".config")
            .join("google-chrome")
            .join("Default")
            .join("History"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_history_path_for_linux() {
        let path = history_path_for("linux", Path::new("/home/user"));
        assert_eq!(
            path,
            PathBuf::from("/home/user/.config/google-chrome/Default/History")
        );
    }

    #[test]
    fn test_history_path_for_macos() {
        let path = history_path_for("macos", Path::new("/Users/user"));
        assert_eq!(
            path,
            PathBuf::from("/Users/user/Library/Application Support/Google/Chrome/Default/History")
        );
    }

    #[test]
    fn test_history_path_for_windows() {
        let base = Path::new("C:\\Users\\user\\AppData\\Local");
        let path = history_path_for("windows", base);
        assert!(path.starts_with(base));
        assert!(path.ends_with(
            Path::new("Google")
                .join("Chrome")
                .join("User Data")
                .join("Default")
                .join("History")
        ));
    }

    #[test]
    fn test_resolve_explicit_path() {
        let dir = TempDir::new().unwrap();
        let history = dir.path().join("History");
        std::fs::write(&history, b"").unwrap();

        let config = Config::resolve(Some(history.clone()), None).unwrap();

        assert_eq!(config.history_path, history);
        assert_eq!(config.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_NAME));
    }

    #[test]
    fn test_resolve_snapshot_override() {
        let dir = TempDir::new().unwrap();
        let history = dir.path().join("History");
        std::fs::write(&history, b"").unwrap();
        let snapshot = dir.path().join("snap.db");

        let config = Config::resolve(Some(history), Some(snapshot.clone())).unwrap();
        assert_eq!(config.snapshot_path, snapshot);
    }

    #[test]
    fn test_resolve_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("History");

        let err = Config::resolve(Some(missing.clone()), None).unwrap_err();
        match err {
            HistoryError::HistoryNotFound { path } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let err = Config::resolve(Some(dir.path().to_path_buf()), None).unwrap_err();
        assert!(matches!(err, HistoryError::HistoryNotFound { .. }));
    }
}
