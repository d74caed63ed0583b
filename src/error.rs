// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Leakhound
//!
//! Only collaborator calls (fetching, reporting, configuration) produce
//! errors. Rejected candidates inside the filters are plain `false`/`None`
//! and never surface here.

use thiserror::Error;

/// Result type alias for Leakhound operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Leakhound
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Resource fetch failed
    #[error("Fetch failed for {url}: {reason}")]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// Progress sink rejected an update
    #[error("Progress sink error: {0}")]
    Sink(String),

    /// Session not found or already torn down
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Fetch {
            url: url.into(),
            status: None,
            reason: reason.into(),
        }
    }

    /// Create a fetch error carrying the HTTP status
    pub fn fetch_status(url: impl Into<String>, status: u16) -> Self {
        Error::Fetch {
            url: url.into(),
            status: Some(status),
            reason: format!("HTTP status {}", status),
        }
    }

    /// Create a sink error
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        Error::Sink(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a fetch-level failure
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::Http(_))
    }

    /// Check if a fallback fetch path is worth trying
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Fetch { status, .. } => !matches!(status, Some(404) | Some(410)),
            _ => false,
        }
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Fetch { status, .. } => *status,
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Fetch { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Turn any error into a fetch error for `url`
    fn with_url(self, url: &str) -> Result<T>;

    /// Add operation context to error
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            Error::Fetch { status, reason, .. } => Error::Fetch {
                url: url.to_string(),
                status,
                reason,
            },
            Error::Http(err) => Error::Fetch {
                url: url.to_string(),
                status: err.status().map(|s| s.as_u16()),
                reason: err.to_string(),
            },
            other => other,
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error() {
        let err = Error::fetch_status("https://example.com/app.js", 503);

        assert!(err.is_fetch());
        assert!(err.is_recoverable());
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(err.url(), Some("https://example.com/app.js"));
    }

    #[test]
    fn test_not_found_is_final() {
        let err = Error::fetch_status("https://example.com/gone.js", 404);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_with_url_rewrites_fetch_errors() {
        let res: std::result::Result<(), Error> = Err(Error::fetch("", "connection reset"));
        let err = res.with_url("https://example.com/a.js").unwrap_err();
        assert_eq!(err.url(), Some("https://example.com/a.js"));
    }

    #[test]
    fn test_context() {
        let res: std::result::Result<(), Error> = Err(Error::config("bad concurrency"));
        let err = res.context("loading config").unwrap_err();
        assert!(err.to_string().starts_with("loading config:"));
    }
}
