//! Error types for PFM and TIFF I/O.
//!
//! Every fallible operation in this crate returns [`IoResult`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::PixelFormat;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or unrecognized PFM header, or a body of the wrong size.
    #[error("format error: {0}")]
    Format(String),

    /// Sample buffer has an element type PFM cannot store.
    #[error("type error: image dtype must be float32, got {0}")]
    Type(PixelFormat),

    /// Sample grid has a shape PFM cannot store.
    #[error("shape error: {0}")]
    Shape(String),

    /// A source image could not be loaded.
    #[error("failed to load {}: {reason}", path.display())]
    Load {
        /// File that failed to load.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

impl IoError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
