//! Shared test utilities for the packager crate.

use crate::config::{RarConfig, RarSettings};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Descriptor header shared by every fixture project.
pub const PROJECT_HEADER: &str = r#"
[project]
group_id = "org.example"
artifact_id = "adapter"
version = "1.0.0"
"#;

/// A throwaway project directory laid out like a real build.
pub struct ProjectFixture {
    _dir: TempDir,
    root: Utf8PathBuf,
    extra: String,
}

impl ProjectFixture {
    /// Create an empty project root.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        Self {
            _dir: dir,
            root,
            extra: String::new(),
        }
    }

    /// Return the project root.
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
    pub fn descriptor(&mut self, toml: &str) -> &mut Self {
        self.extra.push_str(toml);
        self.extra.push('\n');
        self
    }

    /// Declare a dependency jar, creating its file under `repo/`.
    pub fn dependency(&mut self, artifact_id: &str, scope: Option<&str>, optional: bool) -> &mut Self {
        let file = format!("repo/{artifact_id}-1.0.jar");
        self.write(&file, format!("jar:{artifact_id}"));
        let scope_line = scope.map(|s| format!("scope = \"{s}\"\n")).unwrap_or_default();
        let toml = format!(
            "[[dependency]]\ngroup_id = \"org.deps\"\nartifact_id = \"{artifact_id}\"\nversion = \"1.0\"\n{scope_line}optional = {optional}\nfile = \"{file}\"\n"
        );
        self.descriptor(&toml)
    }

    /// Return the full descriptor text.
    pub fn descriptor_text(&self) -> String {
        format!("{PROJECT_HEADER}\n{}", self.extra)
    }

    /// Parse and resolve the descriptor against the project root.
    pub fn settings(&self) -> RarSettings {
        toml::from_str::<RarConfig>(&self.descriptor_text())
            .expect("descriptor parses")
            .resolve(&self.root)
            .expect("descriptor resolves")
    }

    /// Return a path inside the default staging directory.
    pub fn staged(&self, relative: &str) -> Utf8PathBuf {
        self.root.join("target/adapter-1.0.0").join(relative)
    }
}
