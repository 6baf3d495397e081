//! Request and response bodies exchanged with the indexing backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub repo_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub repo_id: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub repo_id: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// Human-readable detail, if the body carries one.
    ///
    /// A string is used as is. Validation failures arrive as a list of
    /// `{ loc, msg, type }` entries and are reduced to their `msg` fields.
    pub fn detail_text(&self) -> Option<String> {
        let text = match self.detail.as_ref()? {
            Value::String(s) => s.clone(),
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            _ => return None,
        };

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
