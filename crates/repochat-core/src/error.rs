//! Failures reported by the request gateway and how they become the single
//! error line a controller shows.

use thiserror::Error;

/// Shown when an ingestion failure carries neither detail nor description.
pub const INGEST_FALLBACK: &str = "An unexpected error occurred.";

/// Shown when a chat failure carries neither detail nor description.
pub const CHAT_FALLBACK: &str = "Failed to get answer.";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend answered with a non-2xx status.
    #[error("request failed with status code {status}")]
    Api { status: u16, detail: Option<String> },

    /// Connection refused, timeout, broken body, ...
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx response whose body isn't what the contract promises.
    #[error("unexpected response from backend: {0}")]
    Decode(String),

    /// Anything else, with its description when one exists.
    #[error("{}", .0.as_deref().unwrap_or("unrecognized failure"))]
    Unrecognized(Option<String>),
}

impl GatewayError {
    /// Structured detail sent by the backend.
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Api {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }

    /// Textual description of the failure, `None` when nothing useful is known.
    pub fn describe(&self) -> Option<String> {
        match self {
            GatewayError::Unrecognized(None) => None,
            GatewayError::Unrecognized(Some(text)) if text.trim().is_empty() => None,
            other => Some(other.to_string()),
        }
    }
}

/// Error Value for a failed attempt: detail, then description, then `fallback`.
pub fn failure_message(err: &GatewayError, fallback: &str) -> String {
    if let Some(detail) = err.detail() {
        return detail.to_string();
    }
    err.describe().unwrap_or_else(|| fallback.to_string())
}

/// Returned by [`crate::RepoLocator::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("Please enter a repository URL.")]
    Empty,
    #[error("Please enter a valid URL: {0}")]
    Malformed(String),
    #[error("Only http and https URLs are supported (got {0}).")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_wins() {
        let err = GatewayError::Api {
            status: 500,
            detail: Some("X".to_string()),
        };
        assert_eq!(failure_message(&err, CHAT_FALLBACK), "X");
    }

    #[test]
    fn test_description_without_detail() {
        let err = GatewayError::Unrecognized(Some("Y".to_string()));
        assert_eq!(failure_message(&err, CHAT_FALLBACK), "Y");

        let err = GatewayError::Api {
            status: 502,
            detail: None,
        };
        assert_eq!(
            failure_message(&err, INGEST_FALLBACK),
            "request failed with status code 502"
        );
    }

    #[test]
    fn test_blank_detail_is_ignored() {
        let err = GatewayError::Api {
            status: 400,
            detail: Some("   ".to_string()),
        };
        assert_eq!(
            failure_message(&err, INGEST_FALLBACK),
            "request failed with status code 400"
        );
    }

    #[test]
    fn test_fallback_when_nothing_known() {
        let err = GatewayError::Unrecognized(None);
        assert_eq!(failure_message(&err, INGEST_FALLBACK), INGEST_FALLBACK);
        assert_eq!(failure_message(&err, CHAT_FALLBACK), CHAT_FALLBACK);

        let err = GatewayError::Unrecognized(Some(String::new()));
        assert_eq!(failure_message(&err, CHAT_FALLBACK), CHAT_FALLBACK);
    }
}
