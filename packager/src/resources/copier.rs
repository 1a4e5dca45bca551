//! Default [`ResourceFilter`] implementation.
//!
//! Each resource set is walked in file-name order. Selected files are copied
//! below the set's target path, through the [`Interpolator`] when the set is
//! filtered and the file's extension is not in the non-filtered list.

use super::delimiters::resolve_delimiters;
use super::error::{ResourceError, Result};
use super::interpolation::Interpolator;
use super::properties::load_properties;
use super::{
    DEFAULT_NON_FILTERED_EXTENSIONS, FilteringOptions, ResourceFilter, ResourceSet,
    ResourcesExecution,
};
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fs;
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into.
const DEFAULT_EXCLUDED_DIRS: [&str; 10] = [
    ".git", ".svn", ".hg", ".bzr", "CVS", "RCS", "SCCS", "_darcs", ".arch-ids", "{arch}",
];

/// File-name patterns never copied.
const DEFAULT_EXCLUDED_FILES: [&str; 12] = [
    "*~",
    "#*#",
    ".#*",
    "%*%",
    "._*",
    ".DS_Store",
    ".gitignore",
    ".gitattributes",
    ".cvsignore",
    ".hgignore",
    ".hgtags",
    "vssver.scc",
];

const PATH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Copies resources and substitutes property expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyResourceFilter;

impl PropertyResourceFilter {
    /// Create the filter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ResourceFilter for PropertyResourceFilter {
    fn filter_resources(&self, execution: &ResourcesExecution) -> Result<Vec<Utf8PathBuf>> {
        check_encoding(execution.encoding.as_deref())?;
        let options = &execution.options;
        let delimiters = resolve_delimiters(&options.delimiters, options.use_default_delimiters)?;
        let values = filter_values(execution)?;
        let interpolator = Interpolator::new(&delimiters, &values)
            .with_escape_string(options.escape_string.as_deref())
            .with_multi_line(options.support_multi_line_filtering)
            .with_escape_windows_paths(options.escape_windows_paths);

        let copier = Copier {
            options,
            interpolator,
            non_filtered: non_filtered_extensions(options),
        };

        let mut written = Vec::new();
        for resource in &execution.resources {
            copier.copy_set(resource, &execution.output_directory, &mut written)?;
        }
        Ok(written)
    }
}

struct Copier<'a> {
    options: &'a FilteringOptions,
    interpolator: Interpolator<'a>,
    non_filtered: Vec<String>,
}

impl Copier<'_> {
    fn copy_set(
        &self,
        resource: &ResourceSet,
        output_root: &Utf8Path,
        written: &mut Vec<Utf8PathBuf>,
    ) -> Result<()> {
        let source_root = &resource.directory;
        if !source_root.is_dir() {
            debug!("Skipping missing resource directory {source_root}");
            return Ok(());
        }

        let target_root = match &resource.target_path {
            Some(target) => output_root.join(target),
            None => output_root.to_owned(),
        };
        let selection = Selection::new(resource)?;
        let before = written.len();

        let walker = WalkDir::new(source_root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded_dir(entry));

        for entry in walker {
            let entry = entry?;
            let path = Utf8Path::from_path(entry.path())
                .ok_or_else(|| ResourceError::NonUtf8Path(entry.path().to_path_buf()))?;
            let Ok(relative) = path.strip_prefix(source_root) else {
                continue;
            };
            let name = slash_separated(relative);
            let destination = target_root.join(relative);

            if entry.file_type().is_dir() {
                if self.options.include_empty_dirs && selection.selects_dir(&name) {
                    fs::create_dir_all(&destination)
                        .map_err(|err| ResourceError::io(&destination, err))?;
                }
                continue;
            }

            if selection.selects_file(&name)
                && self.copy_file(path, &destination, resource.filtering)?
            {
                written.push(destination);
            }
        }

        debug!(
            "Copied {} resource(s) from {source_root} to {target_root}",
            written.len() - before
        );
        Ok(())
    }

    /// Copy one file, returning `false` when an up-to-date copy was kept.
    ///
    /// Filtered files are always rewritten; `overwrite` only governs plain copies.
    fn copy_file(&self, source: &Utf8Path, destination: &Utf8Path, filtering: bool) -> Result<bool> {
        let filtered = filtering && !self.is_non_filtered(source);
        if !filtered && !self.options.overwrite && is_up_to_date(source, destination) {
            trace!("{destination} is up to date");
            return Ok(false);
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|err| ResourceError::io(parent, err))?;
        }

        if filtered {
            let bytes = fs::read(source).map_err(|err| ResourceError::io(source, err))?;
            let text = String::from_utf8(bytes).map_err(|_| ResourceError::InvalidText {
                path: source.to_owned(),
            })?;
            fs::write(destination, self.interpolator.interpolate(&text))
                .map_err(|err| ResourceError::io(destination, err))?;
        } else {
            fs::copy(source, destination).map_err(|err| ResourceError::io(destination, err))?;
        }
        Ok(true)
    }

    fn is_non_filtered(&self, path: &Utf8Path) -> bool {
        path.extension().is_some_and(|ext| {
            self.non_filtered
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
    }
}

/// Compiled include and exclude patterns for one resource set.
struct Selection {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
    default_excludes: Vec<Pattern>,
}

impl Selection {
    fn new(resource: &ResourceSet) -> Result<Self> {
        Ok(Self {
            includes: compile(resource.includes.iter().map(String::as_str))?,
            excludes: compile(resource.excludes.iter().map(String::as_str))?,
            default_excludes: compile(DEFAULT_EXCLUDED_FILES.iter().copied())?,
        })
    }

    fn selects_file(&self, name: &str) -> bool {
        let file_name = name.rsplit('/').next().unwrap_or(name);
        if self.default_excludes.iter().any(|p| p.matches(file_name)) {
            return false;
        }
        self.selects_dir(name)
    }

    fn selects_dir(&self, name: &str) -> bool {
        let included =
            self.includes.is_empty() || self.includes.iter().any(|p| p.matches_with(name, PATH_MATCH));
        included && !self.excludes.iter().any(|p| p.matches_with(name, PATH_MATCH))
    }
}

/// Compile patterns; a trailing `/` selects the whole subtree.
fn compile<'p>(patterns: impl Iterator<Item = &'p str>) -> Result<Vec<Pattern>> {
    patterns
        .map(|raw| {
            let mut normalized = raw.trim().replace('\\', "/");
            if normalized.ends_with('/') {
                normalized.push_str("**");
            }
            Pattern::new(&normalized).map_err(|source| ResourceError::InvalidPattern {
                pattern: raw.to_owned(),
                source,
            })
        })
        .collect()
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| DEFAULT_EXCLUDED_DIRS.contains(&name))
}

fn slash_separated(relative: &Utf8Path) -> String {
    relative
        .components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_up_to_date(source: &Utf8Path, destination: &Utf8Path) -> bool {
    let modified = |path: &Utf8Path| fs::metadata(path).and_then(|meta| meta.modified()).ok();
    match (modified(source), modified(destination)) {
        (Some(source_time), Some(destination_time)) => destination_time >= source_time,
        _ => false,
    }
}

fn check_encoding(encoding: Option<&str>) -> Result<()> {
    match encoding.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) if !is_utf8(name) => Err(ResourceError::UnsupportedEncoding(name.to_owned())),
        _ => Ok(()),
    }
}

fn is_utf8(name: &str) -> bool {
    let normalized: String = name.chars().filter(|c| !matches!(c, '-' | '_')).collect();
    normalized.eq_ignore_ascii_case("utf8")
}

/// Merge filter files and execution properties into one lookup table.
fn filter_values(execution: &ResourcesExecution) -> Result<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();
    for file in &execution.filters {
        values.extend(load_properties(file)?);
    }
    values.extend(
        execution
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    Ok(values)
}

fn non_filtered_extensions(options: &FilteringOptions) -> Vec<String> {
    DEFAULT_NON_FILTERED_EXTENSIONS
        .iter()
        .map(|ext| (*ext).to_owned())
        .chain(
            options
                .non_filtered_file_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_owned()),
        )
        .collect()
}

#[cfg(test)]
#[path = "copier_tests.rs"]
mod tests;
