//! Vizlook error types.
//!
//! Every failure that reaches the caller is a [`VizlookError`]. Malformed
//! stream frames are not errors: they are dropped by the SSE decoder (see
//! [`crate::client::map_frame`]).

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// HTTP status codes returned by the Vizlook API
// ---------------------------------------------------------------------------

/// The request body or parameters were rejected.
pub const BAD_REQUEST: u16 = 400;

/// Missing or invalid API key.
pub const UNAUTHORIZED: u16 = 401;

/// Rate limit exceeded.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// The pay-as-you-go spending limit has been reached.
pub const PAY_AS_YOU_GO_LIMIT_EXCEEDED: u16 = 432;

/// Server-side failure, also used for client-side failures with no HTTP status.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Message used when an error response carries no `error` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error.";

// ---------------------------------------------------------------------------
// VizlookError enum
// ---------------------------------------------------------------------------

/// Unified error type for all Vizlook client operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VizlookError {
    /// The API answered with a non-success status before any data was read.
    #[error("request to {path} failed with HTTP {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Endpoint path, e.g. `/answer`.
        path: String,
        /// The `error` field of the response body, or a fallback message.
        message: String,
        /// Remaining fields of the error body, if it was a JSON object.
        extra: Option<serde_json::Map<String, serde_json::Value>>,
        /// When the failure was observed.
        timestamp: DateTime<Utc>,
    },

    /// Network or IO failure while sending the request or reading the body.
    #[error("transport error on {path}: {cause}")]
    TransportFailed {
        /// Endpoint path.
        path: String,
        /// Underlying cause.
        cause: String,
    },

    /// The transport reported success but there is no body to stream.
    #[error("no response body available for streaming from {path}")]
    StreamUnavailable {
        /// Endpoint path.
        path: String,
    },

    /// The request timed out in the transport.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A successful non-streaming response could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No API key was supplied and `VIZLOOK_API_KEY` is not set.
    #[error("The API key must be provided as an argument or as an environment variable (VIZLOOK_API_KEY).")]
    MissingApiKey,

    /// Client configuration is unusable (bad base URL, header value, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience result type for Vizlook operations.
pub type VizlookResult<T> = Result<T, VizlookError>;

impl VizlookError {
    /// Create a `TransportFailed` error.
    pub fn transport(path: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::TransportFailed {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    /// Re-label a `TransportFailed` error with an endpoint path. Other
    /// variants are returned unchanged.
    pub fn with_path(self, path: &str) -> Self {
        match self {
            VizlookError::TransportFailed { cause, .. } => VizlookError::TransportFailed {
                path: path.to_string(),
                cause,
            },
            other => other,
        }
    }

    /// Build a `RequestFailed` error from a status code and the raw error body.
    ///
    /// The body is parsed best-effort: a JSON object contributes its `error`
    /// field as the message and keeps everything else in `extra`. Anything
    /// else becomes the message verbatim, or [`UNKNOWN_ERROR_MESSAGE`] if empty.
    pub fn from_error_body(status: u16, path: impl Into<String>, body: &[u8]) -> Self {
        let (message, extra) = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(mut map)) => {
                let message = match map.remove("error") {
                    Some(serde_json::Value::String(s)) => s,
                    Some(other) if !other.is_null() => other.to_string(),
                    _ => UNKNOWN_ERROR_MESSAGE.to_string(),
                };
                (message, Some(map))
            }
            _ => {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() {
                    (UNKNOWN_ERROR_MESSAGE.to_string(), None)
                } else {
                    (text, None)
                }
            }
        };

        Self::RequestFailed {
            status,
            path: path.into(),
            message,
            extra,
            timestamp: Utc::now(),
        }
    }

    /// The HTTP status associated with this error.
    ///
    /// Client-side failures with no HTTP response map to 500, a missing API
    /// key maps to 401.
    pub fn status_code(&self) -> u16 {
        match self {
            VizlookError::RequestFailed { status, .. } => *status,
            VizlookError::MissingApiKey => UNAUTHORIZED,
            VizlookError::TransportFailed { .. }
            | VizlookError::StreamUnavailable { .. }
            | VizlookError::Timeout(_)
            | VizlookError::InvalidResponse(_)
            | VizlookError::InvalidConfig(_) => INTERNAL_SERVER_ERROR,
        }
    }

    /// The endpoint path this error relates to, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            VizlookError::RequestFailed { path, .. }
            | VizlookError::TransportFailed { path, .. }
            | VizlookError::StreamUnavailable { path } => Some(path),
            _ => None,
        }
    }

    /// Returns `true` for HTTP 429.
    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == TOO_MANY_REQUESTS
    }

    /// Returns `true` for HTTP 401 or a missing API key.
    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == UNAUTHORIZED
    }
}

impl From<serde_json::Error> for VizlookError {
    fn from(err: serde_json::Error) -> Self {
        VizlookError::InvalidResponse(err.to_string())
    }
}
