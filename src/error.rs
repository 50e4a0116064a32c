//! Unified error types for chatroster.
//!
//! Only whole-transcript failures surface as [`ChatrosterError`]. Problems with
//! individual lines never abort a parse: they are counted in
//! [`ParseStats`](crate::normalizer::ParseStats) and reported to the
//! [`LineObserver`](crate::observer::LineObserver) instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatroster operations.
///
/// # Example
///
/// ```rust
/// use chatroster::error::Result;
/// use chatroster::Participant;
///
/// fn my_function() -> Result<Vec<Participant>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatrosterError>;

/// The error type for all chatroster operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatrosterError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The transcript file doesn't exist
    /// - Permission denied
    /// - The transcript is not valid UTF-8
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Unknown dialect name (CLI flag or config file).
    #[error("Unknown dialect '{input}'. Expected one of: {expected}")]
    InvalidDialect {
        /// The name that was provided
        input: String,
        /// Accepted names
        expected: String,
    },

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The transcript parsed cleanly but contained no participants.
    ///
    /// Not a parse failure: the caller gets this from the ingest layer so it
    /// can report "no usable data" separately from I/O or format problems.
    #[error("No usable chat data found{}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    NoUsableData {
        /// The transcript path, if available
        path: Option<PathBuf>,
    },
}

impl From<std::string::FromUtf8Error> for ChatrosterError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatrosterError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatrosterError {
    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatrosterError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid dialect error listing the accepted names.
    pub fn invalid_dialect(input: impl Into<String>) -> Self {
        ChatrosterError::InvalidDialect {
            input: input.into(),
            expected: crate::config::DialectChoice::all_names().join(", "),
        }
    }

    /// Creates a "no usable data" error.
    pub fn no_usable_data(path: Option<PathBuf>) -> Self {
        ChatrosterError::NoUsableData { path }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatrosterError::Io(_))
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatrosterError::InvalidFormat { .. })
    }

    /// Returns `true` if this is an unknown dialect error.
    pub fn is_invalid_dialect(&self) -> bool {
        matches!(self, ChatrosterError::InvalidDialect { .. })
    }

    /// Returns `true` if the transcript yielded no participants.
    pub fn is_no_usable_data(&self) -> bool {
        matches!(self, ChatrosterError::NoUsableData { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
