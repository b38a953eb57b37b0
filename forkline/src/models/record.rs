//! Condensed view of one session log file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::message::SessionMessage;

/// Everything the lineage resolver needs to know about one log file.
///
/// Built once by the log reader and consumed by the tree builder; it is not
/// kept in the finished forest.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    /// Session id declared by the file's lines, if any.
    pub session_id: Option<String>,
    /// Text-bearing messages in file order.
    pub messages: Vec<SessionMessage>,
    /// Every line id seen in the file.
    pub all_ids: BTreeSet<String>,
    /// Parent id of the first user-authored line that does not point at a root sentinel.
    pub first_user_message_parent_id: Option<String>,
    /// Path of the file this record was read from.
    pub file_path: PathBuf,
}

impl SessionRecord {
    /// Create an empty record for a file.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// File name of the log, used as the lineage key.
    pub fn filename(&self) -> String {
        file_name_of(&self.file_path)
    }

    /// Session id, falling back to the file stem when no line declared one.
    pub fn resolved_session_id(&self) -> String {
        self.session_id.clone().unwrap_or_else(|| {
            self.file_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Message texts in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.text.as_str())
    }

    pub fn first_text(&self) -> Option<&str> {
        self.messages.first().map(|m| m.text.as_str())
    }

    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(|m| m.text.as_str())
    }

    /// Text of the last user-authored message.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role.is_user())
            .map(|m| m.text.as_str())
    }

    /// Whether this record's texts are an exact positional prefix of `other`'s.
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.texts().zip(other.texts()).all(|(a, b)| a == b)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
