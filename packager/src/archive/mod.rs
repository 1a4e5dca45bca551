//! Archive naming, manifest synthesis, timestamps, and zip writing.
//!
//! # Sub-modules
//!
//! - [`error`] - Error types for archive assembly (`ArchiveError`).
//! - [`manifest`] - Jar manifest headers and rendering (`Manifest`).
//! - [`naming`] - Output file naming policy (`Classifier`, `rar_file`).
//! - [`timestamp`] - Reproducible-build timestamps (`OutputTimestamp`).
//! - [`writer`] - Zip assembly of the staging directory (`ArchiveWriter`).

pub mod error;
pub mod manifest;
pub mod naming;
pub mod timestamp;
pub mod writer;

pub use error::ArchiveError;
pub use manifest::{Manifest, ManifestSource};
pub use naming::{Classifier, rar_file};
pub use timestamp::OutputTimestamp;
pub use writer::{ArchiveRequest, ArchiveWriter, ZipArchiveWriter};
