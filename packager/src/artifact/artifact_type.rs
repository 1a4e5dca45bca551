//! Artifact types and their classpath handling.
//!
//! Mirrors the packaging handler table a Java build host consults to
//! decide whether an artifact of a given type is a classpath entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type an artifact is assumed to have when the descriptor omits it.
pub const DEFAULT_TYPE: &str = "jar";

/// Types whose handler adds them to the classpath.
const CLASSPATH_TYPES: &[&str] = &["jar", "test-jar", "maven-plugin", "ejb", "ejb-client"];

/// The packaging type of a dependency artifact (`jar`, `pom`, `war`, ...).
///
/// # Examples
///
/// ```
/// use rar_packager::artifact::ArtifactType;
///
/// assert!(ArtifactType::from("jar").is_added_to_classpath());
/// assert!(!ArtifactType::from("pom").is_added_to_classpath());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ArtifactType(String);

impl ArtifactType {
    /// Return the type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether artifacts of this type are classpath entries.
    ///
    /// Unknown types are treated as auxiliary and are not added.
    #[must_use]
    pub fn is_added_to_classpath(&self) -> bool {
        CLASSPATH_TYPES.contains(&self.0.as_str())
    }
}

impl Default for ArtifactType {
    fn default() -> Self {
        Self(DEFAULT_TYPE.to_owned())
    }
}

impl From<&str> for ArtifactType {
    fn from(value: &str) -> Self {
        Self(value.trim().to_owned())
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::jar("jar", true)]
    #[case::test_jar("test-jar", true)]
    #[case::ejb_client("ejb-client", true)]
    #[case::pom("pom", false)]
    #[case::war("war", false)]
    #[case::rar("rar", false)]
    #[case::javadoc("javadoc", false)]
    #[case::unknown("zip", false)]
    fn classpath_handling_follows_handler_table(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(ArtifactType::from(name).is_added_to_classpath(), expected);
    }

    #[test]
    fn default_type_is_jar() {
        assert_eq!(ArtifactType::default().as_str(), "jar");
    }
}
