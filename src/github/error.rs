// src/github/error.rs
// =============================================================================
// Errors raised by the listing and raw-content collaborators.
// =============================================================================

use thiserror::Error;

/// A failed request to either the contents API or the raw-content host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered, but not with a 2xx status.
    #[error("request to {url} failed: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The request never got an answer (DNS, TLS, timeout, reset...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A 2xx listing response that was not the JSON array we expect.
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn transport(url: &str, error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            "connection failed".to_string()
        } else {
            error.to_string()
        };

        FetchError::Transport {
            url: url.to_string(),
            message,
        }
    }
}
