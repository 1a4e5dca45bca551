//! Layered assembly of the staging directory.
//!
//! The [`StagingAssembler`] fills a [`StagingDirectory`] in five ordered
//! layers: the primary jar, runtime dependencies, resources, the
//! deployment descriptor, and the manifest. Later layers overwrite files
//! written by earlier ones.

use crate::archive::manifest::MANIFEST_PATH;
use crate::archive::{Manifest, ManifestSource};
use crate::artifact::{DependencyArtifact, packaged_artifacts};
use crate::config::RarSettings;
use crate::error::{PackagerError, Result};
use crate::resources::{ResourceFilter, ResourceSet, ResourcesExecution};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;

/// Conventional location of the deployment descriptor inside the archive.
pub const RA_XML_PATH: &str = "META-INF/ra.xml";

/// The work directory that becomes the archive's contents.
///
/// The directory is created on first use; the handle is passed explicitly
/// between steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingDirectory {
    path: Utf8PathBuf,
    created: bool,
}

impl StagingDirectory {
    /// Create a handle for `path` without touching the file system.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            created: false,
        }
    }

    /// Return the directory path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Create the directory if this handle has not yet done so.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CreateStaging`] when the directory cannot be
    /// created.
    pub fn ensure(&mut self) -> Result<&Utf8Path> {
        if !self.created {
            fs::create_dir_all(&self.path).map_err(|source| PackagerError::CreateStaging {
                path: self.path.clone(),
                source,
            })?;
            self.created = true;
        }
        Ok(&self.path)
    }

    /// Return the path of the descriptor slot, whether or not it exists.
    #[must_use]
    pub fn ra_xml(&self) -> Utf8PathBuf {
        self.path.join(RA_XML_PATH)
    }
}

/// Runs the staging layers for one packaging run.
pub struct StagingAssembler<'a> {
    settings: &'a RarSettings,
    resource_filter: &'a dyn ResourceFilter,
}

impl<'a> StagingAssembler<'a> {
    /// Create an assembler reading `settings` and delegating resource
    /// copying to `resource_filter`.
    #[must_use]
    pub fn new(settings: &'a RarSettings, resource_filter: &'a dyn ResourceFilter) -> Self {
        Self {
            settings,
            resource_filter,
        }
    }

    /// Run every layer in order and return the manifest to embed.
    ///
    /// # Errors
    ///
    /// Returns the step-specific [`PackagerError`] of the first layer that
    /// fails. Files written by earlier layers are left in place.
    pub fn assemble(&self, staging: &mut StagingDirectory) -> Result<ManifestSource> {
        staging.ensure()?;
        self.include_generated_jar(staging)?;
        self.copy_dependencies(staging)?;
        self.copy_resources(staging)?;
        self.include_ra_xml(staging)?;
        self.include_manifest(staging)
    }

    /// Copy `<output_directory>/<final_name>.jar` when requested and present.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CopyGeneratedJar`] when the copy fails.
    pub fn include_generated_jar(&self, staging: &mut StagingDirectory) -> Result<()> {
        if !self.settings.include_jar {
            return Ok(());
        }
        let jar_name = format!("{}.jar", self.settings.project.final_name);
        let jar = self.settings.output_directory.join(&jar_name);
        if !jar.is_file() {
            debug!("No generated jar at {jar}");
            return Ok(());
        }

        info!("Including generated jar file[{jar_name}]");
        let destination = staging.ensure()?.join(&jar_name);
        copy_keeping_mtime(&jar, &destination)
            .map_err(|source| PackagerError::CopyGeneratedJar { path: jar, source })
    }

    /// Copy every packaged dependency flat into the staging root.
    ///
    /// When two artifacts share a file name the later one wins and a
    /// warning names both.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CopyDependency`] when a copy fails.
    pub fn copy_dependencies(&self, staging: &mut StagingDirectory) -> Result<()> {
        let root = staging.ensure()?.to_owned();
        let mut copied: HashMap<&str, &DependencyArtifact> = HashMap::new();

        for artifact in packaged_artifacts(&self.settings.dependencies) {
            let scope = artifact
                .scope
                .map_or_else(|| "none".to_owned(), |scope| scope.to_string());
            info!(
                "Copying artifact[{}, {}, {scope}]",
                artifact.group_id,
                artifact.id()
            );

            let file_name = artifact.file_name().ok_or_else(|| PackagerError::CopyDependency {
                artifact: artifact.id(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("artifact file {} has no file name", artifact.file),
                ),
            })?;
            if let Some(previous) = copied.insert(file_name, artifact) {
                warn!(
                    "Artifact {} overwrites {} in the staging directory; both are named {file_name}",
                    artifact.id(),
                    previous.id()
                );
            }

            copy_keeping_mtime(&artifact.file, &root.join(file_name)).map_err(|source| {
                PackagerError::CopyDependency {
                    artifact: artifact.id(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Copy the rar source directory and every extra resource set.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CopyResources`] when filtering fails.
    pub fn copy_resources(&self, staging: &mut StagingDirectory) -> Result<()> {
        let root = staging.ensure()?.to_owned();
        let execution = self.resources_execution(root);
        let written = self
            .resource_filter
            .filter_resources(&execution)
            .map_err(PackagerError::CopyResources)?;
        debug!("Copied {} resource file(s)", written.len());
        Ok(())
    }

    /// Build the filtering request: the rar source directory first, then
    /// the configured extra resource sets in order.
    #[must_use]
    pub fn resources_execution(&self, staging_root: Utf8PathBuf) -> ResourcesExecution {
        let settings = self.settings;
        let source = ResourceSet::new(settings.rar_source_directory.clone())
            .with_filtering(settings.filter_rar_source_directory);
        let mut resources = vec![source];
        resources.extend(settings.rar_resources.iter().cloned());

        ResourcesExecution {
            resources,
            output_directory: staging_root,
            encoding: settings.encoding.clone(),
            filters: settings.filters.clone(),
            properties: settings.project.filter_properties(),
            options: settings.filtering.clone(),
        }
    }

    /// Copy the configured deployment descriptor to `META-INF/ra.xml`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CopyRaXml`] when the copy fails.
    pub fn include_ra_xml(&self, staging: &mut StagingDirectory) -> Result<()> {
        let ra_xml = &self.settings.ra_xml_file;
        if !ra_xml.is_file() {
            return Ok(());
        }

        info!("Using ra.xml {ra_xml}");
        let destination = staging.ensure()?.join(RA_XML_PATH);
        copy_into_meta_inf(ra_xml, &destination).map_err(|source| PackagerError::CopyRaXml {
            path: ra_xml.clone(),
            source,
        })
    }

    /// Copy the configured manifest to `META-INF/MANIFEST.MF`, or describe
    /// the manifest the writer should synthesize.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CopyManifest`] when the copy fails.
    pub fn include_manifest(&self, staging: &mut StagingDirectory) -> Result<ManifestSource> {
        let manifest = &self.settings.manifest_file;
        if !manifest.is_file() {
            info!("Could not find manifest file: {manifest} - Generating one");
            return Ok(ManifestSource::Generated(self.generated_manifest()));
        }

        info!("Including custom manifest file[{manifest}]");
        let destination = staging.ensure()?.join(MANIFEST_PATH);
        copy_into_meta_inf(manifest, &destination).map_err(|source| {
            PackagerError::CopyManifest {
                path: manifest.clone(),
                source,
            }
        })?;
        Ok(ManifestSource::File(manifest.clone()))
    }

    /// Build the manifest used when no custom file is configured.
    #[must_use]
    pub fn generated_manifest(&self) -> Manifest {
        let project = &self.settings.project;
        let archive = &self.settings.archive;
        let mut manifest = Manifest::synthesized();
        if archive.add_default_entries {
            manifest.insert("Implementation-Title", &project.artifact_id);
            manifest.insert("Implementation-Version", &project.version);
            manifest.insert("Implementation-Vendor-Id", &project.group_id);
        }
        manifest.extend(&archive.manifest_entries);
        manifest
    }
}

/// Copy `source` and give the copy the source's modification time, so a
/// newer file from a later layer still replaces it.
fn copy_keeping_mtime(source: &Utf8Path, destination: &Utf8Path) -> std::io::Result<()> {
    fs::copy(source, destination)?;
    let modified = fs::metadata(source)?.modified()?;
    fs::File::options()
        .write(true)
        .open(destination)?
        .set_modified(modified)
}

fn copy_into_meta_inf(source: &Utf8Path, destination: &Utf8Path) -> std::io::Result<()> {
    if let Some(meta_inf) = destination.parent() {
        fs::create_dir_all(meta_inf)?;
    }
    fs::copy(source, destination).map(drop)
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
