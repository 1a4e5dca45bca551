//! Selection of the dependencies that ship inside the archive.

use super::dependency::DependencyArtifact;
use super::scope::includes_runtime;

/// Whether `artifact` belongs in the archive's staging root.
///
/// An artifact is included iff it is not optional, its scope passes the
/// runtime scope filter, and its type is a classpath entry.
#[must_use]
pub fn is_packaged(artifact: &DependencyArtifact) -> bool {
    !artifact.optional && includes_runtime(artifact.scope) && artifact.is_added_to_classpath()
}

/// Select the packaged subset of `artifacts`, preserving input order.
pub fn packaged_artifacts<'a, I>(artifacts: I) -> impl Iterator<Item = &'a DependencyArtifact>
where
    I: IntoIterator<Item = &'a DependencyArtifact>,
{
    artifacts.into_iter().filter(|artifact| is_packaged(artifact))
}
