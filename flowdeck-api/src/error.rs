//! Error types for the REST client and loader

use thiserror::Error;
use url::Url;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the REST client, the sync adapter and the loader
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally, before any network dispatch
    #[error("invalid {what}")]
    InvalidId { what: &'static str },

    /// 401 - the stored token was cleared; the identity collaborator decides
    /// what happens next
    #[error("unauthorized (401): {url}")]
    Unauthorized { url: String },

    /// 403
    #[error("forbidden (403): {url}")]
    Forbidden { url: String },

    /// 404
    #[error("not found (404): {url}")]
    NotFound { url: String },

    /// Any other non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The request hit the configured timeout
    #[error("request timed out: {url}")]
    Timeout { url: String },

    /// Connection-level failure
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// The response body did not match the expected shape
    #[error("malformed response body from {url}: {message}")]
    Decode { url: String, message: String },

    /// The configured base URL (or a path joined onto it) failed to parse
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Create a local validation error
    pub fn invalid_id(what: &'static str) -> Self {
        Self::InvalidId { what }
    }

    /// Classify a reqwest transport error
    pub(crate) fn from_transport(error: reqwest::Error, url: &Url) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_decode() {
            Self::Decode {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }

    /// True for 401/403 responses
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::Forbidden { .. })
    }

    /// True when the request never reached the network
    pub fn is_local(&self) -> bool {
        matches!(self, Self::InvalidId { .. } | Self::Url(_))
    }
}
