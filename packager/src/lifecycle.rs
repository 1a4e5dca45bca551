//! Build lifecycle bindings for `rar` packaging.
//!
//! Maps each phase of the `default` lifecycle to the goal a build host runs
//! for a project packaged as `rar`.

use serde::Serialize;

/// Identifier of the only lifecycle with bindings.
pub const DEFAULT_LIFECYCLE: &str = "default";

/// This tool's packaging goal, `<name>:<version>:rar`.
pub const RAR_GOAL: &str = concat!(env!("CARGO_PKG_NAME"), ":", env!("CARGO_PKG_VERSION"), ":rar");

/// A lifecycle phase and the goal bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseBinding {
    /// Lifecycle phase name.
    pub phase: &'static str,
    /// Goal bound to the phase.
    pub goal: &'static str,
}

/// Phase bindings of the `default` lifecycle, in execution order.
pub const RAR_BINDINGS: [PhaseBinding; 8] = [
    PhaseBinding {
        phase: "process-resources",
        goal: "org.apache.maven.plugins:maven-resources-plugin:3.2.0:resources",
    },
    PhaseBinding {
        phase: "compile",
        goal: "org.apache.maven.plugins:maven-compiler-plugin:3.8.1:compile",
    },
    PhaseBinding {
        phase: "process-test-resources",
        goal: "org.apache.maven.plugins:maven-resources-plugin:3.2.0:testResources",
    },
    PhaseBinding {
        phase: "test-compile",
        goal: "org.apache.maven.plugins:maven-compiler-plugin:3.8.1:testCompile",
    },
    PhaseBinding {
        phase: "test",
        goal: "org.apache.maven.plugins:maven-surefire-plugin:3.0.0-M5:test",
    },
    PhaseBinding {
        phase: "package",
        goal: RAR_GOAL,
    },
    PhaseBinding {
        phase: "install",
        goal: "org.apache.maven.plugins:maven-install-plugin:3.0.0-M1:install",
    },
    PhaseBinding {
        phase: "deploy",
        goal: "org.apache.maven.plugins:maven-deploy-plugin:3.0.0-M1:deploy",
    },
];

/// Return the bindings of lifecycle `id`; only `default` has any.
///
/// # Examples
///
/// ```
/// use rar_packager::lifecycle::bindings;
///
/// assert_eq!(bindings("default").map(<[_]>::len), Some(8));
/// assert!(bindings("clean").is_none());
/// ```
#[must_use]
pub fn bindings(id: &str) -> Option<&'static [PhaseBinding]> {
    (id == DEFAULT_LIFECYCLE).then_some(RAR_BINDINGS.as_slice())
}

/// Return the goal bound to `phase` of the `default` lifecycle.
#[must_use]
pub fn goal_for(phase: &str) -> Option<&'static str> {
    RAR_BINDINGS
        .iter()
        .find(|binding| binding.phase == phase)
        .map(|binding| binding.goal)
}
