//! Raw record lookup by session id.
//!
//! A session's lines are not guaranteed to live in one file (a resumed log
//! repeats earlier lines under their original session id), so every log in
//! the project is searched.

use std::cmp::Ordering;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::log::read_raw_records;
use crate::scan::{list_log_files, read_concurrently};

fn session_id_of(record: &Value) -> Option<&str> {
    record
        .get("sessionId")
        .or_else(|| record.get("session_id"))
        .and_then(Value::as_str)
}

fn timestamp_of(record: &Value) -> Option<DateTime<Utc>> {
    let raw = record.get("timestamp")?;
    if let Some(s) = raw.as_str() {
        return DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc));
    }
    // Epoch milliseconds
    raw.as_i64().and_then(DateTime::from_timestamp_millis)
}

/// Records with a timestamp come first, in ascending order. Records without
/// one keep their relative order after them.
fn by_timestamp(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Every raw record in `dir` whose `sessionId` is `session_id`, oldest first.
///
/// Equal timestamps keep file-name-then-line order. A missing directory
/// yields nothing.
pub async fn messages_for_session(dir: &Path, session_id: &str, max_concurrent: usize) -> Vec<Value> {
    let paths = match list_log_files(dir).await {
        Ok(paths) => paths,
        Err(e) => {
            debug!(error = %e, "No sessions found");
            return Vec::new();
        }
    };

    let mut matches: Vec<(Option<DateTime<Utc>>, Value)> = Vec::new();
    for (_, records) in read_concurrently(paths, max_concurrent, |path| async move {
        read_raw_records(&path).await
    })
    .await
    {
        matches.extend(
            records
                .into_iter()
                .filter(|record| session_id_of(record) == Some(session_id))
                .map(|record| (timestamp_of(&record), record)),
        );
    }

    matches.sort_by(|a, b| by_timestamp(&a.0, &b.0));

    debug!(session_id, records = matches.len(), "Collected session records");
    matches.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, lines: &[&str]) {
        std::fs::write(dir.join(name), lines.join("\n")).unwrap();
    }

    fn texts(records: &[Value]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("content").and_then(Value::as_str).unwrap_or(""))
            .collect()
    }

    #[tokio::test]
    async fn collects_across_files_sorted_by_time() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "a.jsonl",
            &[
                r#"{"sessionId":"S","timestamp":"2025-01-01T10:00:02Z","content":"third"}"#,
                r#"{"sessionId":"T","timestamp":"2025-01-01T10:00:00Z","content":"other"}"#,
                r#"{"sessionId":"S","timestamp":"2025-01-01T10:00:00Z","content":"first"}"#,
            ],
        );
        write(
            dir.path(),
            "b.jsonl",
            &[
                "garbage line",
                r#"{"sessionId":"S","timestamp":"2025-01-01T12:00:01+02:00","content":"second"}"#,
            ],
        );

        let records = messages_for_session(dir.path(), "S", 4).await;
        assert_eq!(texts(&records), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn records_without_timestamp_go_last() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "a.jsonl",
            &[
                r#"{"sessionId":"S","content":"undated-1"}"#,
                r#"{"sessionId":"S","timestamp":"2025-01-01T10:00:00Z","content":"dated"}"#,
                r#"{"sessionId":"S","timestamp":"not a time","content":"undated-2"}"#,
            ],
        );

        let records = messages_for_session(dir.path(), "S", 1).await;
        assert_eq!(texts(&records), vec!["dated", "undated-1", "undated-2"]);
    }

    #[tokio::test]
    async fn unknown_session_or_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.jsonl", &[r#"{"sessionId":"S","content":"x"}"#]);

        assert!(messages_for_session(dir.path(), "nope", 2).await.is_empty());
        assert!(messages_for_session(&dir.path().join("missing"), "S", 2)
            .await
            .is_empty());
    }
}
