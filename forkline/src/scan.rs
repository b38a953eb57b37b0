//! Concurrent directory scanning.
//!
//! Each log file is read by its own task; a semaphore caps how many are in
//! flight. Results are sorted by path once collected, so nothing downstream
//! depends on completion order.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{LineageError, Result};
use crate::log::read_session_record;
use crate::models::{FileMeta, SessionRecord};

/// Extension of session log files.
pub const LOG_EXTENSION: &str = "jsonl";

/// A log file read from disk together with its metadata.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub record: SessionRecord,
    pub meta: FileMeta,
}

/// List the session log files directly inside `dir`, sorted by path.
pub async fn list_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir_error = |source| LineageError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_error)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let path = entry.path();
        let is_log = path.extension().is_some_and(|ext| ext == LOG_EXTENSION);
        if !is_log {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to stat log file"),
        }
    }

    files.sort();
    Ok(files)
}

/// Size and timestamps of a file.
pub async fn read_file_meta(path: &Path) -> std::io::Result<FileMeta> {
    let metadata = tokio::fs::metadata(path).await?;
    let modified: DateTime<Utc> = metadata.modified()?.into();
    let created = metadata.created().map_or(modified, DateTime::<Utc>::from);

    Ok(FileMeta {
        size_bytes: metadata.len(),
        modified,
        created,
    })
}

/// Run `read` on every path with at most `max_concurrent` reads in flight.
///
/// Failed reads are logged and dropped. Output is sorted by path.
pub async fn read_concurrently<T, F, Fut>(
    paths: Vec<PathBuf>,
    max_concurrent: usize,
    read: F,
) -> Vec<(PathBuf, T)>
where
    T: Send + 'static,
    F: Fn(PathBuf) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks = JoinSet::new();

    for path in paths {
        let semaphore = semaphore.clone();
        let read = read.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let result = read(path.clone()).await;
            (path, result)
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(value))) => results.push((path, value)),
            Ok((path, Err(e))) => warn!(path = %path.display(), error = %e, "Skipping session log"),
            Err(e) => warn!(error = %e, "Session log read task failed"),
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

async fn scan_file(path: PathBuf) -> Result<ScannedFile> {
    let record = read_session_record(&path).await?;
    let meta = match read_file_meta(&path).await {
        Ok(meta) => meta,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read file metadata");
            FileMeta::default()
        }
    };
    Ok(ScannedFile { record, meta })
}

/// Read every session log in `dir`.
///
/// A directory that cannot be listed yields no files.
pub async fn scan_directory(dir: &Path, max_concurrent: usize) -> Vec<ScannedFile> {
    let paths = match list_log_files(dir).await {
        Ok(paths) => paths,
        Err(e) => {
            debug!(error = %e, "No sessions found");
            return Vec::new();
        }
    };

    debug!(dir = %dir.display(), files = paths.len(), "Scanning session logs");

    read_concurrently(paths, max_concurrent, scan_file)
        .await
        .into_iter()
        .map(|(_, file)| file)
        .collect()
}
