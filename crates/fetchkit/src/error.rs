//! Error types for download and extraction operations.
//!
//! Errors are categorized so callers can tell a flaky network apart from a
//! broken archive or a filesystem problem.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for fetchkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of fetch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient).
    Network,
    /// Unknown or corrupt archive.
    Format,
    /// Permission denied while writing.
    Permission,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Format => "Invalid archive",
            Self::Permission => "Permission denied",
            Self::Other => "Unexpected error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while downloading or unpacking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("download of {url} failed: {message}")]
    HttpError {
        /// URL being fetched.
        url: String,
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Response body exceeded the size limit.
    #[error("download of {url} exceeds the {limit} byte limit")]
    TooLarge {
        /// URL being fetched.
        url: String,
        /// Limit in bytes.
        limit: u64,
    },

    /// File is not an archive format we can unpack.
    #[error("unsupported archive format: {path}")]
    UnsupportedArchive {
        /// Archive path.
        path: PathBuf,
    },

    /// Archive could be opened but not extracted.
    #[error("failed to extract {path}: {message}")]
    Extract {
        /// Archive path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert a ureq error, keeping the URL for context.
    pub fn http(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                url: url.to_string(),
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            ureq::Error::BodyExceedsLimit(limit) => Self::TooLarge {
                url: url.to_string(),
                limit,
            },
            other => Self::HttpError {
                url: url.to_string(),
                message: other.to_string(),
                status: None,
            },
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::HttpError { .. } => ErrorCategory::Network,
            Error::TooLarge { .. } => ErrorCategory::Other,
            Error::UnsupportedArchive { .. } | Error::Extract { .. } => ErrorCategory::Format,
            Error::Io { source, .. } => {
                if source.kind() == io::ErrorKind::PermissionDenied {
                    ErrorCategory::Permission
                } else {
                    ErrorCategory::Other
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_transient() {
        assert!(ErrorCategory::Network.is_transient());
        assert!(!ErrorCategory::Format.is_transient());
        assert!(!ErrorCategory::Permission.is_transient());
        assert!(!ErrorCategory::Other.is_transient());
    }

    #[test]
    fn test_http_status_conversion() {
        let err = Error::http("https://example.com/a", ureq::Error::StatusCode(404));
        match &err {
            Error::HttpError { url, status, .. } => {
                assert_eq!(url, "https://example.com/a");
                assert_eq!(*status, Some(404));
            }
            _ => panic!("Expected Error::HttpError"),
        }
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_body_limit_conversion() {
        let err = Error::http("https://example.com/big", ureq::Error::BodyExceedsLimit(10));
        assert!(matches!(err, Error::TooLarge { limit: 10, .. }));
    }

    #[test]
    fn test_io_permission_category() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io("/opt/out", io_err);
        assert_eq!(err.category(), ErrorCategory::Permission);
        assert!(err.to_string().contains("/opt/out"));
    }

    #[test]
    fn test_archive_errors_are_format() {
        let err = Error::UnsupportedArchive {
            path: PathBuf::from("/tmp/blob"),
        };
        assert_eq!(err.category(), ErrorCategory::Format);
    }
}
