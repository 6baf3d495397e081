//! UI-agnostic session state types
//!
//! These are shared by every front end (the TUI, one-shot commands) and don't
//! depend on any specific UI framework.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

/// One entry of a chat transcript. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub origin: Origin,
    pub body: String,
}

impl ChatMessage {
    pub fn user(body: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            body: body.into(),
        }
    }

    pub fn assistant(body: impl Into<String>) -> Self {
        Self {
            origin: Origin::Assistant,
            body: body.into(),
        }
    }
}

/// Whether a controller has a request outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Pending,
}

impl InteractionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, InteractionState::Pending)
    }
}

/// Opaque handle naming one ingested repository's index on the backend.
///
/// The client never looks inside it; it is passed through verbatim as
/// `repo_id` on every chat request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Returns `None` for an empty identifier.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_rejects_empty() {
        assert!(SessionId::new("").is_none());
    }

    #[test]
    fn test_session_id_is_verbatim() {
        let id = SessionId::new(" acme-widgets ").unwrap();
        assert_eq!(id.as_str(), " acme-widgets ");
        assert_eq!(id.to_string(), " acme-widgets ");
    }

    #[test]
    fn test_origin_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"origin":"assistant","body":"hi"}"#);
    }
}
