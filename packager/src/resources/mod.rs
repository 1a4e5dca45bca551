//! Resource copying with optional property filtering.
//!
//! The staging assembler hands a [`ResourcesExecution`] to a
//! [`ResourceFilter`]; the default implementation is [`PropertyResourceFilter`].
//!
//! # Sub-modules
//!
//! - [`copier`] - Walks resource sets and writes their copies.
//! - [`delimiters`] - `begin*end` delimiter specifications.
//! - [`error`] - Error types for resource filtering (`ResourceError`).
//! - [`interpolation`] - Expression replacement (`Interpolator`).
//! - [`properties`] - `.properties` filter file reader.

pub mod copier;
pub mod delimiters;
pub mod error;
pub mod interpolation;
pub mod properties;

pub use copier::PropertyResourceFilter;
pub use error::ResourceError;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extensions copied byte-for-byte even when filtering is enabled.
pub const DEFAULT_NON_FILTERED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "gif", "bmp", "png"];

/// One directory of resources to copy into the staging tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSet {
    /// Source directory.
    pub directory: Utf8PathBuf,
    /// Destination below the staging root; the root itself when absent.
    #[serde(default)]
    pub target_path: Option<Utf8PathBuf>,
    /// Whether text files are filtered.
    #[serde(default)]
    pub filtering: bool,
    /// Glob patterns selecting files; everything when empty.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Glob patterns removing files from the selection.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl ResourceSet {
    /// Create an unfiltered set copying all of `directory`.
    #[must_use]
    pub fn new(directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            target_path: None,
            filtering: false,
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Enable or disable filtering.
    #[must_use]
    pub fn with_filtering(mut self, filtering: bool) -> Self {
        self.filtering = filtering;
        self
    }
}

/// Switches controlling how filtering behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteringOptions {
    /// Double backslashes in substituted values that look like Windows paths.
    pub escape_windows_paths: bool,
    /// Prefix that keeps an expression literal.
    pub escape_string: Option<String>,
    /// Replace plain copies even when the destination is newer.
    pub overwrite: bool,
    /// Recreate directories that select no files.
    pub include_empty_dirs: bool,
    /// Let expressions span line breaks.
    pub support_multi_line_filtering: bool,
    /// Add `${*}` and `@` to `delimiters`.
    pub use_default_delimiters: bool,
    /// Custom delimiter specs such as `${*}` or `@`.
    pub delimiters: Vec<String>,
    /// Added to [`DEFAULT_NON_FILTERED_EXTENSIONS`].
    pub non_filtered_file_extensions: Vec<String>,
}

impl Default for FilteringOptions {
    fn default() -> Self {
        Self {
            escape_windows_paths: true,
            escape_string: None,
            overwrite: false,
            include_empty_dirs: false,
            support_multi_line_filtering: false,
            use_default_delimiters: true,
            delimiters: Vec::new(),
            non_filtered_file_extensions: Vec::new(),
        }
    }
}

/// A complete request to copy resource sets into an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcesExecution {
    /// Sets copied in order; later sets overwrite earlier copies.
    pub resources: Vec<ResourceSet>,
    /// Root that relative target paths resolve against.
    pub output_directory: Utf8PathBuf,
    /// Declared text encoding of filtered files.
    pub encoding: Option<String>,
    /// `.properties` files supplying the lowest-precedence values.
    pub filters: Vec<Utf8PathBuf>,
    /// Project and user values; these replace filter file values.
    pub properties: BTreeMap<String, String>,
    /// Interpolation switches.
    pub options: FilteringOptions,
}

/// Copies resource sets, filtering where requested.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceFilter {
    /// Copy every resource set and return the files written.
    ///
    /// # Errors
    ///
    /// Returns a [`ResourceError`] when a filter file, resource, or
    /// destination cannot be read or written, or when the options are
    /// invalid.
    fn filter_resources(&self, execution: &ResourcesExecution)
    -> error::Result<Vec<Utf8PathBuf>>;
}
