//! Error types for call batch decoding and response output.
//!
//! Failures of individual calls never surface here: they are captured in that
//! call's [`Response`](courier_plugins::Response). These errors concern the
//! batch as a whole.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced while decoding a call batch or writing its responses.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The call-map is not valid JSON.
    #[error("malformed call-map: {message}")]
    MalformedCallMap {
        /// Parser message.
        message: String,
        /// Underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// An entry of the call-map is not a `[method, [args...]]` pair.
    #[error("invalid call at position {index}: {message}")]
    InvalidCall {
        /// Zero-based position within the batch.
        index: usize,
        /// What was wrong with the entry.
        message: String,
    },

    /// The batch response could not be serialized.
    #[error("failed to serialize batch response: {0}")]
    SerializeResponse(#[source] serde_json::Error),

    /// Writing the batch response failed.
    #[error("failed to write batch response: {0}")]
    Io(#[source] Arc<io::Error>),
}

impl DispatchError {
    /// Creates a malformed call-map error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedCallMap {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed call-map error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCallMap {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid call error.
    #[must_use]
    pub fn invalid_call(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidCall {
            index,
            message: message.into(),
        }
    }

    /// Wraps a write failure.
    #[must_use]
    pub fn io(source: io::Error) -> Self {
        Self::Io(Arc::new(source))
    }

    /// Whether the error comes from the request rather than the host.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedCallMap { .. } | Self::InvalidCall { .. })
    }
}
