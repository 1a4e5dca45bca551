//! Archive naming policy.
//!
//! An archive is named `<final_name>[-<classifier>].rar` inside the output
//! directory. Classifiers are trimmed and gain a single `-` separator.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::fmt;

/// The fixed file extension for resource adapter archives.
pub const RAR_EXTENSION: &str = "rar";

/// Separator placed between the final name and the classifier.
const CLASSIFIER_SEPARATOR: char = '-';

/// A normalized, non-empty artifact classifier.
///
/// The stored value carries no leading separator; [`Self::suffix`] adds it
/// back for file naming.
///
/// # Examples
///
/// ```
/// use rar_packager::archive::naming::Classifier;
///
/// let classifier = Classifier::parse(Some("  -sources ")).expect("non-empty classifier");
/// assert_eq!(classifier.as_str(), "sources");
/// assert_eq!(classifier.suffix(), "-sources");
/// assert!(Classifier::parse(Some("   ")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Classifier(String);

impl Classifier {
    /// Normalize a raw classifier, returning `None` when nothing remains.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        let name = trimmed
            .strip_prefix(CLASSIFIER_SEPARATOR)
            .unwrap_or(trimmed);
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_owned()))
        }
    }

    /// Return the classifier without its separator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the classifier with its leading separator, e.g. `-sources`.
    #[must_use]
    pub fn suffix(&self) -> String {
        format!("{CLASSIFIER_SEPARATOR}{}", self.0)
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the archive file name for `final_name` and `classifier`.
#[must_use]
pub fn archive_file_name(final_name: &str, classifier: Option<&Classifier>) -> String {
    let suffix = classifier.map(Classifier::suffix).unwrap_or_default();
    format!("{final_name}{suffix}.{RAR_EXTENSION}")
}

/// Compute the archive path inside `output_dir`.
///
/// Pure function; the file system is never consulted.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use rar_packager::archive::naming::rar_file;
///
/// let dir = Utf8Path::new("target");
/// assert_eq!(rar_file(dir, "app", None), Utf8Path::new("target/app.rar"));
/// assert_eq!(
///     rar_file(dir, "app", Some("sources")),
///     Utf8Path::new("target/app-sources.rar"),
/// );
/// ```
#[must_use]
pub fn rar_file(output_dir: &Utf8Path, final_name: &str, classifier: Option<&str>) -> Utf8PathBuf {
    let classifier = Classifier::parse(classifier);
    output_dir.join(archive_file_name(final_name, classifier.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::absent(None, "app.rar")]
    #[case::empty(Some(""), "app.rar")]
    #[case::whitespace_only(Some("   "), "app.rar")]
    #[case::plain(Some("sources"), "app-sources.rar")]
    #[case::already_prefixed(Some("-sources"), "app-sources.rar")]
    #[case::padded(Some("  sources  "), "app-sources.rar")]
    #[case::padded_prefixed(Some(" -sources "), "app-sources.rar")]
    fn names_follow_classifier_rules(#[case] classifier: Option<&str>, #[case] expected: &str) {
        let dir = Utf8Path::new("/build/out");
        assert_eq!(rar_file(dir, "app", classifier), dir.join(expected));
    }

    #[test]
    fn prefixing_is_idempotent() {
        let once = Classifier::parse(Some("sources")).expect("classifier");
        let twice = Classifier::parse(Some(&once.suffix())).expect("classifier");
        assert_eq!(once, twice);
    }

    #[test]
    fn lone_separator_counts_as_absent() {
        assert!(Classifier::parse(Some("-")).is_none());
    }
}
