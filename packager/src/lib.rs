//! Resource adapter archive packager.
//!
//! This crate assembles J2EE Resource Adapter Archives (RAR) from a project's
//! build outputs. It stages the primary jar, runtime dependency jars, the rar
//! source directory, and any extra resource sets into a work directory, then
//! zips that directory into `<final_name>[-<classifier>].rar`. The
//! `rar-packager` binary drives it from a TOML project descriptor.
//!
//! # Modules
//!
//! - [`archive`] - Archive naming, manifests, timestamps, and the zip writer
//! - [`artifact`] - Dependency artifacts and the packaging filter
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Project descriptor loading and parameter resolution
//! - [`error`] - Packaging errors
//! - [`lifecycle`] - Lifecycle phase bindings for `rar` packaging
//! - [`output`] - Human and JSON rendering of results
//! - [`packager`] - The `rar` goal itself
//! - [`project`] - Project model and built-in filter properties
//! - [`publish`] - Main and attached artifact registration
//! - [`resources`] - Resource copying with property filtering
//! - [`staging`] - Work directory assembly

pub mod archive;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod output;
pub mod packager;
pub mod project;
pub mod publish;
pub mod resources;
pub mod staging;

#[cfg(test)]
mod test_utils;

pub use config::RarSettings;
pub use error::PackagerError;
pub use packager::{PackageOutcome, RarPackager};
