use std::fmt;

use reqwest::Url;

use crate::error::LocatorError;

/// A syntactically valid repository URL, checked where the user types it.
///
/// Nothing here asks whether the repository exists; that is the backend's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator(Url);

impl RepoLocator {
    pub fn parse(text: &str) -> Result<Self, LocatorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LocatorError::Empty);
        }

        let url = Url::parse(text).map_err(|e| LocatorError::Malformed(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(LocatorError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(LocatorError::Malformed("missing host".to_string()));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
