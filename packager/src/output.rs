//! Output formatting for the `rar-packager` CLI.
//!
//! This module renders the result of a packaging run and the lifecycle
//! bindings for human-readable or JSON output.

use crate::lifecycle::PhaseBinding;
use crate::packager::PackageOutcome;
use crate::publish::ProjectArtifacts;
use serde::Serialize;

/// JSON-serializable record of one packaging run.
#[derive(Debug, Serialize)]
pub struct PublicationRecord<'a> {
    /// What the run did.
    #[serde(flatten)]
    pub outcome: &'a PackageOutcome,
    /// What the run published.
    pub artifacts: &'a ProjectArtifacts,
}

/// Format the run's result for a human reader.
///
/// # Examples
///
/// ```
/// use rar_packager::output::format_outcome_human;
/// use rar_packager::packager::PackageOutcome;
/// use rar_packager::publish::ProjectArtifacts;
///
/// let text = format_outcome_human(&PackageOutcome::Skipped, &ProjectArtifacts::default());
/// assert!(text.contains("skipped"));
/// ```
#[must_use]
pub fn format_outcome_human(outcome: &PackageOutcome, artifacts: &ProjectArtifacts) -> String {
    match outcome {
        PackageOutcome::Skipped => String::from("Packaging skipped."),
        PackageOutcome::Packaged { archive } => {
            let mut text = format!("Packaged {archive}");
            if artifacts.main.is_some() {
                text.push_str("\n  published as the main artifact");
            }
            for attached in &artifacts.attached {
                text.push_str(&format!(
                    "\n  attached as {} ({})",
                    attached.artifact_type, attached.classifier
                ));
            }
            text
        }
    }
}

/// Format the run's result as JSON.
#[must_use]
pub fn format_outcome_json(outcome: &PackageOutcome, artifacts: &ProjectArtifacts) -> String {
    let record = PublicationRecord { outcome, artifacts };
    serde_json::to_string_pretty(&record).unwrap_or_else(|_| "{}".to_owned())
}

/// Format lifecycle bindings as an aligned table.
#[must_use]
pub fn format_bindings_human(id: &str, bindings: Option<&[PhaseBinding]>) -> String {
    let Some(bindings) = bindings else {
        return format!("No bindings for lifecycle `{id}`.");
    };
    let width = bindings
        .iter()
        .map(|binding| binding.phase.len())
        .max()
        .unwrap_or_default();

    let mut text = format!("Lifecycle `{id}`:");
    for binding in bindings {
        text.push_str(&format!("\n  {:<width$}  {}", binding.phase, binding.goal));
    }
    text
}

/// Format lifecycle bindings as JSON; unknown lifecycles give an empty list.
#[must_use]
pub fn format_bindings_json(bindings: Option<&[PhaseBinding]>) -> String {
    serde_json::to_string_pretty(bindings.unwrap_or_default()).unwrap_or_else(|_| "[]".to_owned())
}
