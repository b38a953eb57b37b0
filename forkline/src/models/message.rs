//! Message model representing one text-bearing entry of a session log.

use serde::{Deserialize, Serialize};

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
    /// System message.
    System,
    /// Missing or unrecognised role.
    Other,
}

impl MessageRole {
    /// Convert role to its log-file spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Other => "other",
        }
    }

    /// Parse a role as written in a log line. Unknown roles map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "user" | "human" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::Other,
        }
    }

    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single text part extracted from a log line.
///
/// One log line may produce several of these when its content is a list of
/// parts; they share the line's `id`, `parent_id` and `role`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessage {
    /// The text payload. Lineage is decided on this field alone.
    pub text: String,
    /// Id of the log line this text came from.
    pub id: Option<String>,
    /// Parent id of the log line this text came from.
    pub parent_id: Option<String>,
    /// Role of the author.
    pub role: MessageRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_unknown_roles() {
        assert_eq!(MessageRole::parse("user"), MessageRole::User);
        assert_eq!(MessageRole::parse("assistant"), MessageRole::Assistant);
        assert_eq!(MessageRole::parse("system"), MessageRole::System);
        assert_eq!(MessageRole::parse("summary"), MessageRole::Other);
        assert!(MessageRole::parse("human").is_user());
    }
}
