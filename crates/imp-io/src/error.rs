//! Error types for PGM/PPM encoding and decoding.

use std::io;
use thiserror::Error;

/// Codec error.
#[derive(Debug, Error)]
pub enum IoError {
    /// Underlying stream error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or unexpected header.
    #[error("format error: {0}")]
    Format(String),

    /// Stream ended before the header or body was complete.
    #[error("truncated data: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes the header or body requires.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// `max` does not exceed the black level.
    #[error("invalid range: max {max} must exceed black level {black}")]
    InvalidRange {
        /// Requested maximum value.
        max: f64,
        /// Requested black level.
        black: f64,
    },

    /// Container construction failed.
    #[error(transparent)]
    Core(#[from] imp_core::Error),
}

impl IoError {
    /// Creates a format error.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Returns `true` for [`IoError::Truncated`].
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Returns `true` for [`IoError::Format`].
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// Result type for codec operations.
pub type IoResult<T> = Result<T, IoError>;
