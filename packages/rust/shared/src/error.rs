//! Error types for podlens.
//!
//! Library crates use [`PodlensError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! The POD conversion core itself never returns these: rendering and example
//! extraction are best-effort and degrade to empty output instead.

use std::path::PathBuf;

/// Top-level error type for all podlens operations.
#[derive(Debug, thiserror::Error)]
pub enum PodlensError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A configured source root cannot be searched.
    #[error("source error: {0}")]
    Source(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Rejected input (malformed document id, bad option value).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PodlensError>;

impl PodlensError {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = PodlensError::config("max_entries must be positive");
        assert_eq!(err.to_string(), "config error: max_entries must be positive");

        let err = PodlensError::validation("document id `../etc` escapes the root");
        assert!(err.to_string().contains("escapes the root"));
    }

    #[test]
    fn io_error_includes_path() {
        let err = PodlensError::io(
            "/tmp/missing.pod",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.pod"));
        assert!(msg.contains("denied"));
    }
}
