//! Session log line parsing.
//!
//! Each line of a session log is an independent JSON object. Two shapes are
//! understood: a flat one (`id`, `parentId`, `role`, `content`) and the Claude
//! Code one, where ids are `uuid`/`parentUuid` and the payload sits under
//! `message.role` / `message.content`. Every field is optional.

use serde_json::Value;

use crate::models::{MessageRole, SessionMessage};

/// Parent ids that mark the start of a conversation rather than a real parent.
const ROOT_PARENT_SENTINELS: &[&str] = &["", "root", "00000000-0000-0000-0000-000000000000"];

/// Whether a parent id points at the conversation root instead of a real line.
pub fn is_root_sentinel(parent_id: &str) -> bool {
    ROOT_PARENT_SENTINELS.contains(&parent_id.trim())
}

/// A parsed session log line.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub session_id: Option<String>,
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub timestamp: Option<String>,
    pub role: MessageRole,
    /// Text parts in order. Empty for lines without text (tool calls, metadata).
    pub texts: Vec<String>,
    /// The complete line.
    pub raw: Value,
}

impl LogLine {
    /// Parse one line. Returns `None` for blank lines and anything that is not a JSON object.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let value: Value = serde_json::from_str(line).ok()?;
        Self::from_value(value)
    }

    /// Interpret an already-decoded line. Returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let session_id = string_field(&value, &["sessionId", "session_id"]);
        let id = string_field(&value, &["id", "uuid"]);
        let parent_id = string_field(&value, &["parentId", "parentUuid", "parent_id"]);
        let timestamp = string_field(&value, &["timestamp"]);

        let message = value.get("message");

        // Role: top level, then message.role, then the line type
        let role = value
            .get("role")
            .and_then(Value::as_str)
            .or_else(|| message.and_then(|m| m.get("role")).and_then(Value::as_str))
            .or_else(|| value.get("type").and_then(Value::as_str))
            .map_or(MessageRole::Other, MessageRole::parse);

        let texts = extract_texts(&value);

        Some(Self {
            session_id,
            id,
            parent_id,
            timestamp,
            role,
            texts,
            raw: value,
        })
    }

    /// Expand this line into one message per text part.
    pub fn messages(&self) -> impl Iterator<Item = SessionMessage> + '_ {
        self.texts.iter().map(|text| SessionMessage {
            text: text.clone(),
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            role: self.role,
        })
    }

    /// Parent id, unless it is a root sentinel.
    pub fn real_parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !is_root_sentinel(p))
    }
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(String::from)
}

/// Collect text parts from `content` or `message.content`.
///
/// Content may be a plain string (one part) or a list of parts; a part
/// contributes when it carries a string `text`.
fn extract_texts(value: &Value) -> Vec<String> {
    let message = value.get("message");
    let content = value
        .get("content")
        .or_else(|| message.and_then(|m| m.get("content")))
        .or_else(|| message.filter(|m| m.is_string()));

    match content {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
