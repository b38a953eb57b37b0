//! Error types for the lineage engine.
//!
//! These never escape the public entry points: a failed file is logged and
//! skipped, a missing directory reads as empty.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineageError {
    #[error("failed to open session log {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read session directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("home directory not found")]
    HomeDirNotFound,
}

pub type Result<T> = std::result::Result<T, LineageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn current_dir_failure_keeps_its_cause() {
        let err = LineageError::CurrentDir(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "cwd removed",
        ));
        assert!(err.to_string().starts_with("failed to determine the current directory"));
        assert!(err.source().is_some());
        assert!(!matches!(err, LineageError::ReadDir { .. }));
    }
}
