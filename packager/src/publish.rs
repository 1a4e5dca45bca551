//! Registration of the produced archive with the project.
//!
//! An archive without a classifier becomes the project's main artifact;
//! one with a classifier is attached alongside it as type `rar`.

use crate::archive::naming::{Classifier, RAR_EXTENSION};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// Receives the archive produced by a packaging run.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactPublisher {
    /// Make `file` the project's main artifact.
    fn set_main_artifact(&mut self, file: &Utf8Path);

    /// Attach `file` as a secondary artifact.
    fn attach_artifact(&mut self, artifact_type: &str, classifier: &Classifier, file: &Utf8Path);
}

/// A secondary artifact registered next to the main one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedArtifact {
    /// Always `rar` for archives built here.
    #[serde(rename = "type")]
    pub artifact_type: String,
    /// Distinguishes this file from the main artifact.
    pub classifier: Classifier,
    /// Path of the attached file.
    pub file: Utf8PathBuf,
}

/// The artifacts a project has published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectArtifacts {
    /// The primary artifact file, once set.
    pub main: Option<Utf8PathBuf>,
    /// Attached artifacts in attachment order.
    pub attached: Vec<AttachedArtifact>,
}

impl ArtifactPublisher for ProjectArtifacts {
    fn set_main_artifact(&mut self, file: &Utf8Path) {
        self.main = Some(file.to_owned());
    }

    fn attach_artifact(&mut self, artifact_type: &str, classifier: &Classifier, file: &Utf8Path) {
        self.attached.push(AttachedArtifact {
            artifact_type: artifact_type.to_owned(),
            classifier: classifier.clone(),
            file: file.to_owned(),
        });
    }
}

/// Publish `archive` as the main artifact or, with a classifier, as an
/// attached `rar` artifact.
pub fn publish_archive(
    publisher: &mut dyn ArtifactPublisher,
    archive: &Utf8Path,
    classifier: Option<&Classifier>,
) {
    match classifier {
        Some(classifier) => publisher.attach_artifact(RAR_EXTENSION, classifier, archive),
        None => publisher.set_main_artifact(archive),
    }
}
