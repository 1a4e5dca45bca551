//! Jar manifest synthesis.
//!
//! Manifests are written in the jar main-section format: `Name: value`
//! headers terminated by CRLF, wrapped at 72 bytes with single-space
//! continuation lines, and closed by an empty line.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;

/// Location of the manifest inside the archive.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Directory holding the manifest and the deployment descriptor.
pub const META_INF: &str = "META-INF";

/// Tool identity recorded in the `Created-By` header.
pub const CREATED_BY: &str = concat!("rar-packager ", env!("CARGO_PKG_VERSION"));

/// Maximum line length in bytes, excluding the line terminator.
const MAX_LINE_BYTES: usize = 72;

/// An ordered set of main-section manifest headers.
///
/// Header names compare case-insensitively; inserting an existing name
/// replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    entries: Vec<(String, String)>,
}

impl Manifest {
    /// Create a manifest carrying only the version and creator headers.
    #[must_use]
    pub fn synthesized() -> Self {
        let mut manifest = Self::default();
        manifest.insert("Manifest-Version", "1.0");
        manifest.insert("Created-By", CREATED_BY);
        manifest
    }

    /// Insert or replace a header.
    pub fn insert(&mut self, name: &str, value: &str) {
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => value.clone_into(&mut entry.1),
            None => self.entries.push((name.to_owned(), value.to_owned())),
        }
    }

    /// Insert every header from `entries` in key order.
    pub fn extend(&mut self, entries: &BTreeMap<String, String>) {
        for (name, value) in entries {
            self.insert(name, value);
        }
    }

    /// Look up a header value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Render the manifest in jar format.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.entries {
            push_wrapped(&mut out, &format!("{name}: {value}"));
        }
        out.push_str("\r\n");
        out
    }
}

/// Where the archive's manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// A manifest built from configuration.
    Generated(Manifest),
    /// A user-supplied file embedded verbatim.
    File(Utf8PathBuf),
}

impl ManifestSource {
    /// Return the manifest bytes to embed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when a user-supplied file cannot be read.
    pub fn bytes(&self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Generated(manifest) => Ok(manifest.render().into_bytes()),
            Self::File(path) => std::fs::read(path),
        }
    }

    /// Return the user-supplied file, if any.
    #[must_use]
    pub fn file(&self) -> Option<&Utf8Path> {
        match self {
            Self::Generated(_) => None,
            Self::File(path) => Some(path),
        }
    }
}

/// Append `line` to `out`, wrapping at [`MAX_LINE_BYTES`] on character
/// boundaries.
fn push_wrapped(out: &mut String, line: &str) {
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_BYTES {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out.push_str("\r\n");
}
