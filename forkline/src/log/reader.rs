//! Streaming session log reader.

use std::path::Path;

use serde_json::Value;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{trace, warn};

use super::line::LogLine;
use crate::error::{LineageError, Result};
use crate::models::SessionRecord;

/// Accumulates parsed lines into a [`SessionRecord`].
#[derive(Debug)]
pub struct RecordBuilder {
    record: SessionRecord,
    skipped: usize,
}

impl RecordBuilder {
    pub fn new(path: &Path) -> Self {
        Self {
            record: SessionRecord::new(path),
            skipped: 0,
        }
    }

    /// Feed one raw line. Malformed lines are counted and dropped.
    pub fn push_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let Some(parsed) = LogLine::parse(line) else {
            self.skipped += 1;
            return;
        };
        self.push(&parsed);
    }

    fn push(&mut self, line: &LogLine) {
        let record = &mut self.record;

        // Later lines belong to the session currently writing the file
        if let Some(session_id) = line.session_id.as_deref().filter(|s| !s.is_empty()) {
            record.session_id = Some(session_id.to_string());
        }

        if let Some(id) = &line.id {
            record.all_ids.insert(id.clone());
        }

        if record.first_user_message_parent_id.is_none() && line.role.is_user() {
            if let Some(parent_id) = line.real_parent_id() {
                record.first_user_message_parent_id = Some(parent_id.to_string());
            }
        }

        record.messages.extend(line.messages());
    }

    pub fn finish(self) -> SessionRecord {
        if self.skipped > 0 {
            trace!(
                path = %self.record.file_path.display(),
                skipped = self.skipped,
                "Skipped malformed lines"
            );
        }
        self.record
    }
}

/// Build a record from lines already in memory.
pub fn parse_session_lines<I, S>(lines: I, path: &Path) -> SessionRecord
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = RecordBuilder::new(path);
    for line in lines {
        builder.push_line(line.as_ref());
    }
    builder.finish()
}

/// Feed every line of `path` to `on_line`.
///
/// Lines are read as raw bytes, so a line that is not valid UTF-8 is skipped
/// like any other malformed line and reading continues. Only a real I/O
/// error part-way through ends the file early; failing to open it is an error.
async fn for_each_line<F>(path: &Path, mut on_line: F) -> Result<()>
where
    F: FnMut(&str),
{
    let file = File::open(path)
        .await
        .map_err(|source| LineageError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut undecodable = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => match std::str::from_utf8(&buf) {
                Ok(line) => on_line(line),
                Err(_) => undecodable += 1,
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Stopped reading session log early");
                break;
            }
        }
    }

    if undecodable > 0 {
        trace!(path = %path.display(), undecodable, "Skipped lines that are not valid UTF-8");
    }
    Ok(())
}

/// Read one session log into a [`SessionRecord`].
pub async fn read_session_record(path: &Path) -> Result<SessionRecord> {
    let mut builder = RecordBuilder::new(path);
    for_each_line(path, |line| builder.push_line(line)).await?;
    Ok(builder.finish())
}

/// Read every well-formed line of a log as raw JSON, in file order.
pub async fn read_raw_records(path: &Path) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    for_each_line(path, |line| {
        if let Some(parsed) = LogLine::parse(line) {
            records.push(parsed.raw);
        }
    })
    .await?;
    Ok(records)
}
