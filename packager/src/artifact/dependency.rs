//! Resolved dependency artifacts as supplied by the build host.

use super::artifact_type::ArtifactType;
use super::scope::Scope;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency the host has already resolved to a file on disk.
///
/// Values are read-only once loaded from the project descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyArtifact {
    /// Group identifier, e.g. `org.example`.
    pub group_id: String,
    /// Artifact identifier within the group.
    pub artifact_id: String,
    /// Resolved version.
    pub version: String,
    /// Dependency scope; `None` means unrestricted.
    #[serde(default)]
    pub scope: Option<Scope>,
    /// Whether the dependency was declared optional.
    #[serde(default)]
    pub optional: bool,
    /// Packaging type of the artifact.
    #[serde(default, rename = "type")]
    pub artifact_type: ArtifactType,
    /// Classifier distinguishing variant files of the same artifact.
    #[serde(default)]
    pub classifier: Option<String>,
    /// Overrides the type handler's classpath decision.
    #[serde(default)]
    pub added_to_classpath: Option<bool>,
    /// Location of the resolved file.
    pub file: Utf8PathBuf,
}

impl DependencyArtifact {
    /// Whether this artifact is a classpath entry.
    #[must_use]
    pub fn is_added_to_classpath(&self) -> bool {
        self.added_to_classpath
            .unwrap_or_else(|| self.artifact_type.is_added_to_classpath())
    }

    /// Return the artifact's file name, if its path has one.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file.file_name()
    }

    /// Return a copy with a relative `file` resolved against `base`.
    #[must_use]
    pub fn resolved_against(mut self, base: &Utf8Path) -> Self {
        if self.file.is_relative() {
            self.file = base.join(&self.file);
        }
        self
    }

    /// Return the conventional `group:artifact:type[:classifier]:version` id.
    #[must_use]
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DependencyArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.artifact_type)?;
        if let Some(classifier) = self.classifier.as_deref().filter(|c| !c.is_empty()) {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}
