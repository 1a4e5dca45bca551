//! The packaging step.
//!
//! [`RarPackager::execute`] runs
//! `Start -> (Skip | Stage -> Inject-Overrides -> Validate-Descriptor-Presence
//! -> Write-Archive -> Publish) -> Done`. Any failure ends the run; nothing
//! is published unless the archive was written.

use crate::archive::{ArchiveRequest, ArchiveWriter, rar_file};
use crate::config::RarSettings;
use crate::error::{PackagerError, Result};
use crate::publish::{ArtifactPublisher, publish_archive};
use crate::resources::ResourceFilter;
use crate::staging::{StagingAssembler, StagingDirectory};
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use serde::Serialize;

/// How a packaging run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PackageOutcome {
    /// `skip` was set; nothing was read or written.
    Skipped,
    /// The archive was written and published.
    Packaged {
        /// Path of the written archive.
        archive: Utf8PathBuf,
    },
}

/// Packages a resource adapter archive from resolved settings.
pub struct RarPackager<'a> {
    settings: &'a RarSettings,
    resource_filter: &'a dyn ResourceFilter,
    archive_writer: &'a dyn ArchiveWriter,
}

impl<'a> RarPackager<'a> {
    /// Create a packager using the given collaborators.
    #[must_use]
    pub fn new(
        settings: &'a RarSettings,
        resource_filter: &'a dyn ResourceFilter,
        archive_writer: &'a dyn ArchiveWriter,
    ) -> Self {
        Self {
            settings,
            resource_filter,
            archive_writer,
        }
    }

    /// Return the archive path this packager writes to.
    #[must_use]
    pub fn archive_path(&self) -> Utf8PathBuf {
        let settings = self.settings;
        rar_file(
            &settings.output_directory,
            &settings.project.final_name,
            settings.classifier.as_ref().map(|c| c.as_str()),
        )
    }

    /// Run the packaging step and publish the archive to `publisher`.
    ///
    /// # Errors
    ///
    /// Returns the [`PackagerError`] of the first failing step. The
    /// publisher is not called on failure.
    pub fn execute(&self, publisher: &mut dyn ArtifactPublisher) -> Result<PackageOutcome> {
        let settings = self.settings;
        if settings.skip {
            info!("Skipping rar generation.");
            return Ok(PackageOutcome::Skipped);
        }

        let mut staging = StagingDirectory::new(settings.work_directory.clone());
        let manifest =
            StagingAssembler::new(settings, self.resource_filter).assemble(&mut staging)?;

        if settings.warn_on_missing_ra_xml {
            warn_if_descriptor_missing(&staging.ra_xml());
        }

        let archive = self.archive_path();
        let request = ArchiveRequest {
            staging_dir: staging.ensure()?.to_owned(),
            output_file: archive.clone(),
            manifest,
            timestamp: settings.output_timestamp,
            compress: settings.archive.compress,
        };
        self.archive_writer
            .write(&request)
            .map_err(PackagerError::Assemble)?;

        publish_archive(publisher, &archive, settings.classifier.as_ref());
        Ok(PackageOutcome::Packaged { archive })
    }
}

fn warn_if_descriptor_missing(ra_xml: &Utf8Path) {
    if !ra_xml.exists() {
        warn!("Connector deployment descriptor: {ra_xml} does not exist.");
    }
}

#[cfg(test)]
#[path = "packager_tests.rs"]
mod tests;
