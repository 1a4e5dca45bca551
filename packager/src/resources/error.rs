//! Error types for resource copying and filtering.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while copying resource sets into the staging directory.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Reading a resource or writing its copy failed.
    #[error("failed to copy resource {path}")]
    Io {
        /// The file or directory concerned.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Walking a resource directory failed.
    #[error("failed to walk resource directory")]
    Walk(#[from] walkdir::Error),

    /// A resource path is not valid UTF-8.
    #[error("resource path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),

    /// A filter properties file could not be read.
    #[error("error loading property file {path}")]
    FilterFile {
        /// The properties file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configured encoding is not supported.
    #[error("unsupported resource encoding \"{0}\"; only UTF-8 is supported")]
    UnsupportedEncoding(String),

    /// A file selected for filtering is not valid text in the configured encoding.
    #[error("resource {path} is not valid UTF-8 text; add its extension to non_filtered_file_extensions")]
    InvalidText {
        /// The offending file.
        path: Utf8PathBuf,
    },

    /// A delimiter specification is malformed.
    #[error("invalid delimiter \"{value}\": {reason}")]
    InvalidDelimiter {
        /// The rejected specification.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An include or exclude pattern is malformed.
    #[error("invalid resource pattern \"{pattern}\"")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The parser's error.
        #[source]
        source: glob::PatternError,
    },
}

impl ResourceError {
    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`ResourceError`].
pub type Result<T> = std::result::Result<T, ResourceError>;
