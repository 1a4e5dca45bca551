//! Dependency artifact model and the runtime artifact filter.
//!
//! # Sub-modules
//!
//! - [`artifact_type`] - Packaging types and classpath handling.
//! - [`dependency`] - Resolved dependency artifacts (`DependencyArtifact`).
//! - [`filter`] - Selection of the artifacts copied into the archive.
//! - [`scope`] - Dependency scopes and the runtime scope filter.

pub mod artifact_type;
pub mod dependency;
pub mod filter;
pub mod scope;

pub use artifact_type::ArtifactType;
pub use dependency::DependencyArtifact;
pub use filter::{is_packaged, packaged_artifacts};
pub use scope::Scope;
