//! Error types for image I/O.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Format could not be determined or is not supported.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed or unsupported file contents.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoder failure.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Invalid arguments or image construction failure.
    #[error(transparent)]
    Core(#[from] gfx_core::Error),
}

impl IoError {
    #[inline]
    pub(crate) fn decode(msg: impl ToString) -> Self {
        Self::DecodeError(msg.to_string())
    }

    #[inline]
    pub(crate) fn encode(msg: impl ToString) -> Self {
        Self::EncodeError(msg.to_string())
    }

    /// Returns `true` for [`IoError::UnsupportedFormat`].
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }

    /// Returns `true` for decode failures.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::DecodeError(_))
    }

    /// Returns `true` if the wrapped core error is an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_invalid_argument())
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
