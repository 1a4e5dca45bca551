//! Test support utilities for packager integration tests.
//!
//! Provides a throwaway project directory with a `rar.toml` descriptor and
//! helpers for reading the archives a packaging run produces.

use camino::{Utf8Path, Utf8PathBuf};
use rar_packager::archive::ZipArchiveWriter;
use rar_packager::config::{ConfigOverrides, DEFAULT_DESCRIPTOR, RarSettings};
use rar_packager::error::PackagerError;
use rar_packager::packager::{PackageOutcome, RarPackager};
use rar_packager::publish::ProjectArtifacts;
use rar_packager::resources::PropertyResourceFilter;
use std::fs;
use std::io::Read;
use tempfile::TempDir;

/// Coordinates shared by every test project.
pub const PROJECT_HEADER: &str = r#"[project]
group_id = "org.example"
artifact_id = "adapter"
version = "1.0.0"
"#;

/// The outcome of one packaging run and what it published.
pub struct PackageRun {
    /// Outcome of the packaging run.
    pub result: Result<PackageOutcome, PackagerError>,
    /// Artifacts recorded by the run.
    pub artifacts: ProjectArtifacts,
}

/// A project directory on disk with its descriptor.
pub struct TestProject {
    _dir: TempDir,
    root: Utf8PathBuf,
    descriptor: String,
}

impl TestProject {
    /// Create an empty project.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        let canonical = dir.path().canonicalize().expect("canonical tempdir");
        let root = Utf8PathBuf::from_path_buf(canonical).expect("utf8 tempdir");
        Self {
            _dir: dir,
            root,
            descriptor: String::from(PROJECT_HEADER),
        }
    }

    /// Project root directory.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> Utf8PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, contents).expect("write file");
        path
    }

    /// Append raw TOML to the descriptor.
    pub fn append(&mut self, toml: &str) {
        self.descriptor.push('\n');
        self.descriptor.push_str(toml);
    }

    /// Declare a dependency; its jar is created unless `missing` is set.
    pub fn dependency(&mut self, artifact_id: &str, scope: &str, missing: bool) {
        let file = format!("repo/{artifact_id}-1.0.jar");
        if !missing {
            self.write(&file, format!("jar:{artifact_id}"));
        }
        self.append(&format!(
            "[[dependency]]\ngroup_id = \"org.deps\"\nartifact_id = \"{artifact_id}\"\nversion = \"1.0\"\nscope = \"{scope}\"\nfile = \"{file}\"\n"
        ));
    }

    /// Write the descriptor and return its path.
    pub fn save(&self) -> Utf8PathBuf {
        self.write(DEFAULT_DESCRIPTOR, &self.descriptor)
    }

    /// Load settings the way the CLI does.
    pub fn settings(&self, overrides: ConfigOverrides) -> RarSettings {
        RarSettings::load(&self.save(), overrides).expect("descriptor loads")
    }

    /// Package with the production collaborators.
    pub fn package(&self, overrides: ConfigOverrides) -> PackageRun {
        let settings = self.settings(overrides);
        let packager = RarPackager::new(&settings, &PropertyResourceFilter, &ZipArchiveWriter);
        let mut artifacts = ProjectArtifacts::default();
        let result = packager.execute(&mut artifacts);
        PackageRun { result, artifacts }
    }
}

/// List the entry names of the archive at `path`.
pub fn archive_entries(path: &Utf8Path) -> Vec<String> {
    let file = fs::File::open(path).expect("open archive");
    let archive = zip::ZipArchive::new(file).expect("read archive");
    archive.file_names().map(str::to_owned).collect()
}

/// Read entry `name` of the archive at `path` as text.
pub fn read_entry(path: &Utf8Path, name: &str) -> String {
    let file = fs::File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("read archive");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut text = String::new();
    entry.read_to_string(&mut text).expect("entry is text");
    text
}
