//! Error types for folder2md.
//!
//! Library crates use [`Folder2MdError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all folder2md operations.
#[derive(Debug, thiserror::Error)]
pub enum Folder2MdError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal could not proceed.
    #[error("walk error at {path:?}: {message}")]
    Walk { path: PathBuf, message: String },

    /// Invalid input (bad filter list, root that is not a directory, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, Folder2MdError>;

impl Folder2MdError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a walk error for the given path.
    pub fn walk(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Walk {
            path: path.into(),
            message: msg.into(),
        }
    }
}
