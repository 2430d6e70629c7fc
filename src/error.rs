//! Unified error types for chatarchive.
//!
//! Almost nothing in the parsing engine can fail: malformed lines are folded
//! or dropped, bad timestamps become `None`, unmatched media is plain text.
//! What remains are boundary failures (unreadable archives, I/O, writing an
//! export) and primary-user selection errors, which callers are expected to
//! recover from by falling back to auto-detection.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::primary_user::SelectionError;

/// A specialized [`Result`] type for chatarchive operations.
///
/// # Example
///
/// ```rust
/// use chatarchive::error::Result;
/// use chatarchive::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatArchiveError>;

/// The error type for all chatarchive operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatArchiveError {
    /// An I/O error occurred while reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive container could not be read.
    ///
    /// This is the only failure that aborts loading: nothing from a
    /// structurally broken archive is parsed.
    #[error("Unreadable archive{}: {source}", path.as_ref().map(|p| format!(" ({})", p.display())).unwrap_or_default())]
    Archive {
        /// The underlying container error
        #[source]
        source: ArchiveErrorKind,
        /// The archive path, if it came from disk
        path: Option<PathBuf>,
    },

    /// The input or output format is not one we understand.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// What kind of format was expected (e.g. "input", "output")
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Primary-user selection failed.
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 encoding error while converting output to a string.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Kinds of archive container failures.
#[derive(Debug, Error)]
pub enum ArchiveErrorKind {
    /// Zip container error
    #[cfg(feature = "archive")]
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),
    /// Directory traversal error
    #[error("{0}")]
    Walk(#[from] walkdir::Error),
    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl From<std::string::FromUtf8Error> for ChatArchiveError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatArchiveError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatArchiveError {
    /// Creates an archive error from a zip failure.
    #[cfg(feature = "archive")]
    pub fn zip(source: zip::result::ZipError, path: Option<PathBuf>) -> Self {
        ChatArchiveError::Archive {
            source: ArchiveErrorKind::Zip(source),
            path,
        }
    }

    /// Creates an archive error from a directory walk failure.
    pub fn walk(source: walkdir::Error, path: Option<PathBuf>) -> Self {
        ChatArchiveError::Archive {
            source: ArchiveErrorKind::Walk(source),
            path,
        }
    }

    /// Creates an archive error with a free-form message.
    pub fn archive(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ChatArchiveError::Archive {
            source: ArchiveErrorKind::Other(message.into()),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatArchiveError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatArchiveError::Io(_))
    }

    /// Returns `true` if the archive container itself was unreadable.
    pub fn is_archive(&self) -> bool {
        matches!(self, ChatArchiveError::Archive { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatArchiveError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a primary-user selection error.
    pub fn is_selection(&self) -> bool {
        matches!(self, ChatArchiveError::Selection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatArchiveError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert!(err.is_io());
    }

    #[test]
    fn test_archive_error_with_path() {
        let err = ChatArchiveError::archive("bad header", Some(PathBuf::from("/tmp/chat.zip")));
        let display = err.to_string();
        assert!(display.contains("Unreadable archive"));
        assert!(display.contains("/tmp/chat.zip"));
        assert!(display.contains("bad header"));
        assert!(err.is_archive());
    }

    #[test]
    fn test_archive_error_without_path() {
        let err = ChatArchiveError::archive("truncated", None);
        assert_eq!(err.to_string(), "Unreadable archive: truncated");
    }

    #[cfg(feature = "archive")]
    #[test]
    fn test_zip_error_conversion() {
        let err = ChatArchiveError::zip(zip::result::ZipError::FileNotFound, None);
        assert!(err.is_archive());
        assert!(!err.is_io());
    }

    #[test]
    fn test_invalid_format_display() {
        let err = ChatArchiveError::invalid_format("input", "expected .zip or .txt");
        assert_eq!(
            err.to_string(),
            "Invalid input format: expected .zip or .txt"
        );
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_selection_error_conversion() {
        let err: ChatArchiveError = SelectionError::Cancelled.into();
        assert!(err.is_selection());
        assert!(err.to_string().contains("Selection error"));
    }

    #[test]
    fn test_utf8_error_conversion() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err = ChatArchiveError::from(bad);
        assert!(err.to_string().contains("output conversion"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatArchiveError>();
    }
}
