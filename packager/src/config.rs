//! Project descriptor loading.
//!
//! The descriptor (`rar.toml` by default) is deserialized into the raw
//! [`RarConfig`] model, adjusted by command-line [`ConfigOverrides`], and
//! resolved into [`RarSettings`] with every default applied and every path
//! made absolute.

use crate::archive::naming::Classifier;
use crate::archive::{ArchiveError, OutputTimestamp};
use crate::artifact::DependencyArtifact;
use crate::project::Project;
use crate::resources::{FilteringOptions, ResourceSet};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// File name looked up when no descriptor path is given.
pub const DEFAULT_DESCRIPTOR: &str = "rar.toml";

/// Errors raised while loading or resolving the project descriptor.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The descriptor could not be read.
    #[error("failed to read project descriptor {path}")]
    Read {
        /// Descriptor path as given.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is not valid TOML or does not match the schema.
    #[error("invalid project descriptor {path}")]
    Parse {
        /// Descriptor path as given.
        path: Utf8PathBuf,
        /// The parser's error.
        #[source]
        source: toml::de::Error,
    },

    /// A required project coordinate is blank.
    #[error("project.{field} must not be empty")]
    EmptyCoordinate {
        /// The blank field.
        field: &'static str,
    },

    /// The output timestamp is malformed or out of range.
    #[error("invalid rar.output_timestamp")]
    Timestamp(#[source] ArchiveError),
}

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The descriptor as written, before defaults are applied.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RarConfig {
    /// The `[project]` table.
    pub project: ProjectConfig,
    /// Resolved dependency artifacts in declaration order.
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencyArtifact>,
    /// The `[rar]` table.
    #[serde(default)]
    pub rar: RarParameters,
    /// Values supplied with `-D`; never read from the descriptor.
    #[serde(skip)]
    pub user_properties: BTreeMap<String, String>,
}

/// The `[project]` table.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Maven-style group identifier.
    pub group_id: String,
    /// Artifact identifier; also names the archive.
    pub artifact_id: String,
    /// Project version.
    pub version: String,
    /// Project root; defaults to the descriptor's directory.
    #[serde(default)]
    pub basedir: Option<Utf8PathBuf>,
    /// Build output; defaults to `<basedir>/target`.
    #[serde(default)]
    pub build_directory: Option<Utf8PathBuf>,
    /// Defaults to `<artifact_id>-<version>`.
    #[serde(default)]
    pub final_name: Option<String>,
    /// Fallback resource encoding.
    #[serde(default)]
    pub source_encoding: Option<String>,
    /// Nested tables flatten to dotted keys, so `jndi.name = "x"` yields
    /// the property `jndi.name`.
    #[serde(default, deserialize_with = "flatten_properties")]
    pub properties: BTreeMap<String, String>,
}

/// The `[rar]` table. Every key is optional.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RarParameters {
    /// Defaults to `<basedir>/src/main/rar`.
    pub rar_source_directory: Option<Utf8PathBuf>,
    /// Defaults to `<rar_source_directory>/META-INF/ra.xml`.
    pub ra_xml_file: Option<Utf8PathBuf>,
    /// Stage `<final_name>.jar` from the build directory when it exists.
    pub include_jar: bool,
    /// Defaults to `<rar_source_directory>/META-INF/MANIFEST.MF`.
    pub manifest_file: Option<Utf8PathBuf>,
    /// Defaults to `<build_directory>/<final_name>`.
    pub work_directory: Option<Utf8PathBuf>,
    /// Defaults to `<build_directory>`.
    pub output_directory: Option<Utf8PathBuf>,
    /// Attach the archive under this classifier instead of replacing the main artifact.
    pub classifier: Option<String>,
    /// Filter the RAR source directory as well as `rar_resources`.
    pub filter_rar_source_directory: bool,
    /// Defaults to `project.source_encoding`.
    pub encoding: Option<String>,
    /// Double backslashes in substituted Windows paths.
    pub escape_windows_paths: bool,
    /// Prefix that keeps an expression literal.
    pub escape_string: Option<String>,
    /// Replace plain copies even when the destination is newer.
    pub overwrite: bool,
    /// Recreate empty directories from resource sets.
    pub include_empty_dirs: bool,
    /// Let expressions span line breaks.
    pub support_multi_line_filtering: bool,
    /// Keep `${*}` and `@` alongside `delimiters`.
    pub use_default_delimiters: bool,
    /// Custom delimiter specs.
    pub delimiters: Vec<String>,
    /// Property files read before filtering.
    pub filters: Vec<Utf8PathBuf>,
    /// Extensions copied byte for byte, in addition to the defaults.
    pub non_filtered_file_extensions: Vec<String>,
    /// Warn when the staged tree has no `META-INF/ra.xml`.
    pub warn_on_missing_ra_xml: bool,
    /// Skip packaging entirely.
    pub skip: bool,
    /// ISO-8601 instant or epoch seconds stamped on every entry.
    pub output_timestamp: Option<String>,
    /// Extra resource sets copied into the staging directory.
    pub rar_resources: Vec<ResourceSet>,
    /// The `[rar.archive]` table.
    pub archive: ArchiveOptions,
}

impl Default for RarParameters {
    fn default() -> Self {
        Self {
            rar_source_directory: None,
            ra_xml_file: None,
            include_jar: true,
            manifest_file: None,
            work_directory: None,
            output_directory: None,
            classifier: None,
            filter_rar_source_directory: false,
            encoding: None,
            escape_windows_paths: true,
            escape_string: None,
            overwrite: false,
            include_empty_dirs: false,
            support_multi_line_filtering: false,
            use_default_delimiters: true,
            delimiters: Vec::new(),
            filters: Vec::new(),
            non_filtered_file_extensions: Vec::new(),
            warn_on_missing_ra_xml: true,
            skip: false,
            output_timestamp: None,
            rar_resources: Vec::new(),
            archive: ArchiveOptions::default(),
        }
    }
}

/// The `[rar.archive]` table controlling the manifest and compression.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveOptions {
    /// Add `Implementation-Title`, `-Version` and `-Vendor-Id` headers.
    pub add_default_entries: bool,
    /// Deflate entries; `false` stores them.
    pub compress: bool,
    /// Extra main-section headers for a synthesized manifest.
    pub manifest_entries: BTreeMap<String, String>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            add_default_entries: false,
            compress: true,
            manifest_entries: BTreeMap::new(),
        }
    }
}

/// Command-line values that replace descriptor values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--skip`.
    pub skip: bool,
    /// `--classifier`.
    pub classifier: Option<String>,
    /// `--output-timestamp`.
    pub output_timestamp: Option<String>,
    /// `--filter-rar-source-directory`; only ever enables it.
    pub filter_rar_source_directory: bool,
    /// `--no-warn-on-missing-ra-xml`.
    pub no_warn_on_missing_ra_xml: bool,
    /// `-D key=value` pairs.
    pub user_properties: BTreeMap<String, String>,
}

impl RarConfig {
    /// Read and parse a descriptor file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents do not match the schema.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Apply command-line overrides. Switches only ever enable their
    /// effect; strings replace the descriptor's value when present.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let rar = &mut self.rar;
        rar.skip |= overrides.skip;
        rar.filter_rar_source_directory |= overrides.filter_rar_source_directory;
        if overrides.no_warn_on_missing_ra_xml {
            rar.warn_on_missing_ra_xml = false;
        }
        if overrides.classifier.is_some() {
            rar.classifier = overrides.classifier;
        }
        if overrides.output_timestamp.is_some() {
            rar.output_timestamp = overrides.output_timestamp;
        }
        self.user_properties.extend(overrides.user_properties);
    }

    /// Apply defaults and make every path absolute.
    ///
    /// `descriptor_dir` is the directory holding the descriptor; the
    /// project's base directory resolves against it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCoordinate`] for blank coordinates and
    /// [`ConfigError::Timestamp`] for an unusable output timestamp.
    pub fn resolve(self, descriptor_dir: &Utf8Path) -> Result<RarSettings> {
        let Self {
            project,
            dependencies,
            rar,
            user_properties,
        } = self;

        let project = resolve_project(project, user_properties, descriptor_dir)?;
        let basedir = project.basedir.clone();
        let source_dir = rar
            .rar_source_directory
            .map_or_else(|| basedir.join("src/main/rar"), |dir| absolute(&basedir, &dir));
        let meta_inf = source_dir.join("META-INF");

        let output_timestamp = OutputTimestamp::parse(rar.output_timestamp.as_deref())
            .map_err(ConfigError::Timestamp)?;

        Ok(RarSettings {
            dependencies: dependencies
                .into_iter()
                .map(|dependency| dependency.resolved_against(&basedir))
                .collect(),
            ra_xml_file: rar
                .ra_xml_file
                .map_or_else(|| meta_inf.join("ra.xml"), |file| absolute(&basedir, &file)),
            manifest_file: rar
                .manifest_file
                .map_or_else(|| meta_inf.join("MANIFEST.MF"), |file| absolute(&basedir, &file)),
            work_directory: rar.work_directory.map_or_else(
                || project.build_directory.join(&project.final_name),
                |dir| absolute(&basedir, &dir),
            ),
            output_directory: rar.output_directory.map_or_else(
                || project.build_directory.clone(),
                |dir| absolute(&basedir, &dir),
            ),
            rar_source_directory: source_dir,
            include_jar: rar.include_jar,
            classifier: Classifier::parse(rar.classifier.as_deref()),
            filter_rar_source_directory: rar.filter_rar_source_directory,
            encoding: rar.encoding.or_else(|| project.source_encoding.clone()),
            filters: rar
                .filters
                .iter()
                .map(|filter| absolute(&basedir, filter))
                .collect(),
            filtering: FilteringOptions {
                escape_windows_paths: rar.escape_windows_paths,
                escape_string: rar.escape_string,
                overwrite: rar.overwrite,
                include_empty_dirs: rar.include_empty_dirs,
                support_multi_line_filtering: rar.support_multi_line_filtering,
                use_default_delimiters: rar.use_default_delimiters,
                delimiters: rar.delimiters,
                non_filtered_file_extensions: rar.non_filtered_file_extensions,
            },
            rar_resources: rar
                .rar_resources
                .into_iter()
                .map(|mut resource| {
                    resource.directory = absolute(&basedir, &resource.directory);
                    resource
                })
                .collect(),
            warn_on_missing_ra_xml: rar.warn_on_missing_ra_xml,
            skip: rar.skip,
            output_timestamp,
            archive: rar.archive,
            project,
        })
    }
}

/// The fully resolved parameters of one packaging run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RarSettings {
    /// Project coordinates and properties.
    pub project: Project,
    /// Declared dependencies, unfiltered.
    pub dependencies: Vec<DependencyArtifact>,
    /// Directory copied into the archive root.
    pub rar_source_directory: Utf8PathBuf,
    /// Descriptor copied over `META-INF/ra.xml` when present.
    pub ra_xml_file: Utf8PathBuf,
    /// Stage the project's own jar.
    pub include_jar: bool,
    /// Manifest used instead of a generated one when present.
    pub manifest_file: Utf8PathBuf,
    /// Staging directory.
    pub work_directory: Utf8PathBuf,
    /// Directory receiving the archive.
    pub output_directory: Utf8PathBuf,
    /// Set for attached archives.
    pub classifier: Option<Classifier>,
    /// Filter the source directory copy.
    pub filter_rar_source_directory: bool,
    /// Resource encoding.
    pub encoding: Option<String>,
    /// Filter property files.
    pub filters: Vec<Utf8PathBuf>,
    /// Interpolation switches.
    pub filtering: FilteringOptions,
    /// Extra resource sets.
    pub rar_resources: Vec<ResourceSet>,
    /// Warn about a missing `ra.xml`.
    pub warn_on_missing_ra_xml: bool,
    /// Do nothing.
    pub skip: bool,
    /// Entry timestamp for reproducible archives.
    pub output_timestamp: Option<OutputTimestamp>,
    /// Manifest and compression options.
    pub archive: ArchiveOptions,
}

impl RarSettings {
    /// Load a descriptor, apply `overrides`, and resolve it.
    ///
    /// # Errors
    ///
    /// Returns any [`ConfigError`] raised while reading, parsing, or
    /// resolving the descriptor.
    pub fn load(path: &Utf8Path, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = RarConfig::load(path)?;
        config.apply(overrides);
        let absolute_path = path.canonicalize_utf8().map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let descriptor_dir = absolute_path
            .parent()
            .map_or_else(|| absolute_path.clone(), Utf8Path::to_owned);
        config.resolve(&descriptor_dir)
    }
}

fn resolve_project(
    raw: ProjectConfig,
    user_properties: BTreeMap<String, String>,
    descriptor_dir: &Utf8Path,
) -> Result<Project> {
    for (field, value) in [
        ("group_id", &raw.group_id),
        ("artifact_id", &raw.artifact_id),
        ("version", &raw.version),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyCoordinate { field });
        }
    }

    let basedir = raw
        .basedir
        .map_or_else(|| descriptor_dir.to_owned(), |dir| absolute(descriptor_dir, &dir));
    let build_directory = raw
        .build_directory
        .map_or_else(|| basedir.join("target"), |dir| absolute(&basedir, &dir));
    let final_name = raw
        .final_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("{}-{}", raw.artifact_id, raw.version));

    Ok(Project {
        group_id: raw.group_id,
        artifact_id: raw.artifact_id,
        version: raw.version,
        basedir,
        build_directory,
        final_name,
        source_encoding: raw.source_encoding,
        properties: raw.properties,
        user_properties,
    })
}

fn absolute(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}

fn flatten_properties<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let table = toml::Table::deserialize(deserializer)?;
    let mut values = BTreeMap::new();
    flatten_into(&mut values, None, &table).map_err(serde::de::Error::custom)?;
    Ok(values)
}

fn flatten_into(
    values: &mut BTreeMap<String, String>,
    prefix: Option<&str>,
    table: &toml::Table,
) -> std::result::Result<(), String> {
    for (key, value) in table {
        let name = prefix.map_or_else(|| key.clone(), |prefix| format!("{prefix}.{key}"));
        let text = match value {
            toml::Value::Table(nested) => {
                flatten_into(values, Some(&name), nested)?;
                continue;
            }
            toml::Value::String(text) => text.clone(),
            toml::Value::Integer(number) => number.to_string(),
            toml::Value::Float(number) => number.to_string(),
            toml::Value::Boolean(flag) => flag.to_string(),
            toml::Value::Datetime(instant) => instant.to_string(),
            toml::Value::Array(_) => return Err(format!("property `{name}` must be a scalar")),
        };
        values.insert(name, text);
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
