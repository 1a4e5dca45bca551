//! Dependency scopes and the runtime scope filter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility classification of a resolved dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Needed to compile and run.
    Compile,
    /// Needed only at run time.
    Runtime,
    /// Supplied by the container at run time.
    Provided,
    /// Needed only by tests.
    Test,
    /// Supplied by the host system from an explicit path.
    System,
    /// Imported dependency-management section; never a real artifact.
    Import,
}

impl Scope {
    /// Return the scope's lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
        }
    }

    /// Whether an artifact of this scope belongs on a runtime classpath.
    ///
    /// Only `compile` and `runtime` qualify; the container supplies
    /// `provided` and `system` artifacts, and `test` artifacts never ship.
    #[must_use]
    pub const fn is_runtime(self) -> bool {
        matches!(self, Self::Compile | Self::Runtime)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply the runtime scope filter to an optional scope.
///
/// An artifact without a scope carries no restriction and is accepted.
#[must_use]
pub fn includes_runtime(scope: Option<Scope>) -> bool {
    scope.is_none_or(Scope::is_runtime)
}
