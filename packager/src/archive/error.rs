//! Error types for archive assembly.
//!
//! Covers timestamp validation, directory traversal, and zip encoding
//! failures raised while writing a `.rar` file.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// An I/O operation failed (reading staged files, writing the archive).
    #[error("I/O error while writing {path}")]
    Io {
        /// The file being read or written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Walking the staging directory failed.
    #[error("failed to walk staging directory")]
    Walk(#[from] walkdir::Error),

    /// The zip encoder rejected an entry or failed to finalize.
    #[error("zip format error")]
    Zip(#[from] zip::result::ZipError),

    /// A staged path is not valid UTF-8 and cannot become an entry name.
    #[error("staged path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),

    /// The reproducible-build timestamp could not be parsed.
    #[error(
        "invalid output timestamp \"{value}\": expected ISO 8601 \
         (yyyy-MM-dd'T'HH:mm:ssXXX) or seconds since the epoch"
    )]
    InvalidTimestamp {
        /// The rejected value.
        value: String,
    },

    /// The reproducible-build timestamp lies outside the zip date range.
    #[error("output timestamp {value} is outside 1980-01-01T00:00:02Z..2099-12-31T23:59:59Z")]
    TimestampOutOfRange {
        /// The rejected value.
        value: String,
    },
}

impl ArchiveError {
    /// Wrap an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using [`ArchiveError`].
pub type Result<T> = std::result::Result<T, ArchiveError>;
