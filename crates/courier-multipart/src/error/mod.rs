//! Errors raised while splitting request bodies.
//!
//! [`MultipartError`] covers the fatal cases that abort a whole request.
//! [`PartIssue`] describes a single part that could not be understood; issues
//! are collected on the [`Mapper`](crate::Mapper) and never abort the
//! remaining parts. I/O errors are wrapped in `Arc` to keep both types
//! cheap to clone and `Send + Sync`.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::token::TokenError;

/// Fatal errors that abort processing of a request body.
#[derive(Debug, Clone, Error)]
pub enum MultipartError {
    /// No carriage return terminated the boundary line in time.
    #[error("malformed boundary: no carriage return within the first {limit} bytes")]
    MalformedBoundary {
        /// Number of bytes inspected before giving up.
        limit: usize,
    },

    /// The body starts with an empty boundary line.
    #[error("malformed boundary: boundary line is empty")]
    EmptyBoundary,

    /// Reading or writing temporary storage failed.
    #[error("I/O error while {action}: {source}")]
    Io {
        /// What the splitter was doing when the error occurred.
        action: &'static str,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The client stopped sending before the declared body length arrived.
    #[error("upload '{upload_id}' cancelled after {bytes_read} of {bytes_total} bytes")]
    Cancelled {
        /// Host-supplied upload identifier.
        upload_id: String,
        /// Bytes received before the body ended.
        bytes_read: u64,
        /// Declared body length.
        bytes_total: u64,
    },

    /// An uploaded file could not be moved to its destination.
    #[error("failed to persist uploaded file to '{}': {source}", destination.display())]
    Persist {
        /// Requested destination path.
        destination: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
}

impl MultipartError {
    /// Builds an I/O error tagged with the failing action.
    pub(crate) fn io(action: &'static str, source: io::Error) -> Self {
        Self::Io {
            action,
            source: Arc::new(source),
        }
    }
}

/// A part that was skipped because it could not be understood.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PartIssue {
    /// The part carried no `Content-Disposition` header.
    #[error("part {index} has no recognizable Content-Disposition header")]
    MissingDisposition {
        /// Zero-based part position in the body.
        index: usize,
    },

    /// The header block did not end within the header size limit.
    #[error("part {index} headers exceed {limit} bytes")]
    HeadersTooLarge {
        /// Zero-based part position in the body.
        index: usize,
        /// Maximum header block size.
        limit: usize,
    },

    /// A file part's field name did not follow the file token layout.
    #[error("part {index} has invalid file field name: {source}")]
    InvalidFieldName {
        /// Zero-based part position in the body.
        index: usize,
        /// Token parse failure.
        #[source]
        source: TokenError,
    },

    /// The correlation id was not a canonical UUID string.
    #[error("part {index} carries invalid correlation id '{value}'")]
    InvalidCorrelationId {
        /// Zero-based part position in the body.
        index: usize,
        /// The rejected text, lossily decoded.
        value: String,
    },

    /// The call-map content was not valid UTF-8.
    #[error("part {index} carries a call-map that is not valid UTF-8")]
    InvalidCallMap {
        /// Zero-based part position in the body.
        index: usize,
    },
}

impl PartIssue {
    /// Zero-based position of the offending part.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::MissingDisposition { index }
            | Self::HeadersTooLarge { index, .. }
            | Self::InvalidFieldName { index, .. }
            | Self::InvalidCorrelationId { index, .. }
            | Self::InvalidCallMap { index } => *index,
        }
    }
}
