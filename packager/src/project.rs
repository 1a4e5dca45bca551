//! The project whose build output is being packaged.
//!
//! A [`Project`] carries the coordinates and build layout that the staging
//! assembler, the manifest, and resource filtering read from.

use camino::Utf8PathBuf;
use std::collections::BTreeMap;

/// Coordinates and layout of the project being packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Group identifier.
    pub group_id: String,
    /// Artifact identifier.
    pub artifact_id: String,
    /// Project version.
    pub version: String,
    /// Absolute project root.
    pub basedir: Utf8PathBuf,
    /// Absolute build output directory.
    pub build_directory: Utf8PathBuf,
    /// Base name of produced archives, without extension.
    pub final_name: String,
    /// Declared source encoding, if any.
    pub source_encoding: Option<String>,
    /// Values declared in the descriptor's `[project.properties]` table.
    pub properties: BTreeMap<String, String>,
    /// Values supplied on the command line; these take precedence.
    pub user_properties: BTreeMap<String, String>,
}

impl Project {
    /// Return the `project.*` and `basedir` values exposed to filtering.
    #[must_use]
    pub fn builtin_properties(&self) -> BTreeMap<String, String> {
        let mut builtins = BTreeMap::from([
            ("project.groupId".to_owned(), self.group_id.clone()),
            ("project.artifactId".to_owned(), self.artifact_id.clone()),
            ("project.version".to_owned(), self.version.clone()),
            ("project.build.finalName".to_owned(), self.final_name.clone()),
            (
                "project.build.directory".to_owned(),
                self.build_directory.to_string(),
            ),
            ("project.basedir".to_owned(), self.basedir.to_string()),
            ("basedir".to_owned(), self.basedir.to_string()),
        ]);
        if let Some(encoding) = &self.source_encoding {
            builtins.insert("project.build.sourceEncoding".to_owned(), encoding.clone());
        }
        builtins
    }

    /// Return every value available to resource filtering.
    ///
    /// Built-ins are overridden by project properties, which are in turn
    /// overridden by user properties.
    #[must_use]
    pub fn filter_properties(&self) -> BTreeMap<String, String> {
        let mut values = self.builtin_properties();
        for layer in [&self.properties, &self.user_properties] {
            values.extend(layer.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        values
    }
}
