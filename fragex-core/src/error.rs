//! Typed error handling for fragex.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fragex operations.
///
/// The two pending-registration variants are the structured form of the
/// extraction pass's internal consistency check: they indicate a program
/// or predicate set that violates the load-order preconditions, and the
/// enclosing compile is expected to abort on them.
#[derive(Error, Debug)]
pub enum FragexError {
    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Malformed or unreadable program bundle
    #[error("Bundle error at {path}: {message}")]
    Bundle { path: PathBuf, message: String },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A kept install statement needed a type whose registration was never
    /// buffered in this pass.
    #[error("no registration buffered, but an install for a method of `{required}` needs one")]
    NoPendingRegistration { required: String },

    /// The buffered registration introduces a different type than the one
    /// the install statement requires.
    #[error("buffered registration is for `{buffered}`, but an install needs `{required}`")]
    PendingTypeMismatch { buffered: String, required: String },
}

impl FragexError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a bundle error.
    pub fn bundle(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Bundle {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error reports an inconsistent program/predicate set.
    ///
    /// Such errors are not recoverable by retrying the extraction; the
    /// inputs themselves are wrong.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::NoPendingRegistration { .. } | Self::PendingTypeMismatch { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Bundle { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for fragex results.
pub type FragexResult<T> = Result<T, FragexError>;
