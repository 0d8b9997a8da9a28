//! Error types shared by every codec.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh load and save operations.
pub type IoResult<T> = Result<T, IoError>;

/// Failures surfaced by the codecs.
///
/// Local anomalies inside an otherwise valid file (out-of-range face indices,
/// malformed numeric tokens, unknown chunks) are recovered from silently and
/// never show up here.
#[derive(Debug, Error)]
pub enum IoError {
    /// The input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The file extension or a detected variant (binary FBX, binary PLY) has no codec.
    #[error("unsupported format: {message}")]
    UnsupportedFormat {
        /// What was not supported.
        message: String,
    },

    /// The top-level signature or container header is missing or wrong.
    #[error("malformed container: {message}")]
    MalformedContainer {
        /// Which part of the container was invalid.
        message: String,
    },

    /// The file parsed but yielded no geometry where some was required.
    #[error("no geometry found: {message}")]
    EmptyResult {
        /// Context for the empty result.
        message: String,
    },

    /// A fixed-size record ran past the end of the data.
    #[error("unexpected end of data at byte {position}")]
    UnexpectedEof {
        /// Offset at which more bytes were needed.
        position: usize,
    },

    /// A writer was handed something it cannot serialise.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the argument.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `UnsupportedFormat` error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /// Create a `MalformedContainer` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedContainer {
            message: message.into(),
        }
    }

    /// Create an `EmptyResult` error.
    #[must_use]
    pub fn empty(message: impl Into<String>) -> Self {
        Self::EmptyResult {
            message: message.into(),
        }
    }

    /// Create an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
