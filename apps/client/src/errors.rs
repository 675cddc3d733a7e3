#![allow(dead_code)]

use thiserror::Error;

/// Client-level error type.
///
/// Every failure the runtime can produce funnels into this enum. The request
/// gateway never recovers from errors itself — it normalizes them here and
/// surfaces them to the caller. Workflows convert them into notifications at
/// their boundary; the session manager handles invalidated sessions silently.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status. `message` is taken from
    /// the response body's `message` field when present, else a generic
    /// fallback supplied by the gateway.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport-level failure: no response was received at all.
    #[error("network error")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the configured client timeout.
    #[error("request timed out")]
    Timeout,

    /// A 2xx response whose body could not be parsed as the expected JSON.
    #[error("invalid response")]
    InvalidResponse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Local pre-network validation failure; never reaches the wire.
    #[error("{0}")]
    Validation(String),

    /// Reading or writing the credential token store failed.
    #[error("credential storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status of the failed request, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::InvalidResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}
