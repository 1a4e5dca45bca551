//! Error types for a packaging run.
//!
//! Each staging step has its own variant so the message names the step
//! that failed; the underlying cause is always linked as the source.

use crate::archive::ArchiveError;
use crate::config::ConfigError;
use crate::resources::ResourceError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort a packaging run.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The project descriptor could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The staging directory could not be created.
    #[error("failed to create staging directory {path}")]
    CreateStaging {
        /// The staging directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Step 1: copying the project's primary jar failed.
    #[error("Error copying generated Jar file {path}")]
    CopyGeneratedJar {
        /// The primary jar.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Step 2: copying a dependency artifact failed.
    #[error("Error copying RAR dependencies: {artifact}")]
    CopyDependency {
        /// The artifact's coordinate id.
        artifact: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Step 3: resource filtering failed.
    #[error("Error copying RAR resources")]
    CopyResources(#[source] ResourceError),

    /// Step 4: copying the deployment descriptor failed.
    #[error("Error copying ra.xml file {path}")]
    CopyRaXml {
        /// The configured descriptor.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Step 5: copying the custom manifest failed.
    #[error("Error copying manifest file {path}")]
    CopyManifest {
        /// The configured manifest.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the archive failed.
    #[error("Error assembling RAR")]
    Assemble(#[source] ArchiveError),

    /// Printing the run's output failed.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
