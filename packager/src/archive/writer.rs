//! Zip assembly of the staging directory.
//!
//! The archive opens with `META-INF/` and `META-INF/MANIFEST.MF`, then
//! holds every staged directory and file in file-name order. Directories
//! are written as entries so empty ones survive the round trip.

use super::error::{ArchiveError, Result};
use super::manifest::{MANIFEST_PATH, META_INF, ManifestSource};
use super::timestamp::{OutputTimestamp, zip_date_time_for};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Permission bits for files in a reproducible archive.
const REPRODUCIBLE_FILE_MODE: u32 = 0o644;

/// Permission bits for directories in a reproducible archive.
const REPRODUCIBLE_DIR_MODE: u32 = 0o755;

/// Everything needed to write one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Directory whose full contents become the archive entries.
    pub staging_dir: Utf8PathBuf,
    /// Destination `.rar` file.
    pub output_file: Utf8PathBuf,
    /// Manifest to embed at `META-INF/MANIFEST.MF`.
    pub manifest: ManifestSource,
    /// Fixed entry timestamp for reproducible output.
    pub timestamp: Option<OutputTimestamp>,
    /// Deflate entries when `true`, store them otherwise.
    pub compress: bool,
}

/// Writes a staging directory into an archive file.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveWriter {
    /// Write the archive described by `request`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArchiveError`] on any I/O, traversal, or zip failure.
    fn write(&self, request: &ArchiveRequest) -> Result<()>;
}

/// Default writer backed by the `zip` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveWriter;

impl ArchiveWriter for ZipArchiveWriter {
    fn write(&self, request: &ArchiveRequest) -> Result<()> {
        let entries = collect_entries(&request.staging_dir)?;

        if let Some(parent) = request.output_file.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
        let file =
            File::create(&request.output_file).map_err(|e| ArchiveError::io(&request.output_file, e))?;

        info!("Building rar: {}", request.output_file);
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let entry_options = EntryOptions::for_request(request);

        write_manifest(&mut zip, request, &entry_options)?;
        for entry in &entries {
            write_entry(&mut zip, entry, &entry_options)?;
        }

        let mut inner = zip.finish()?;
        inner
            .flush()
            .map_err(|e| ArchiveError::io(&request.output_file, e))?;
        debug!("wrote {} staged entries", entries.len());
        Ok(())
    }
}

/// A file or directory found under the staging root.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StagedEntry {
    /// `/`-separated name inside the archive.
    name: String,
    /// Location on disk.
    path: Utf8PathBuf,
    /// Whether the entry is a directory.
    is_dir: bool,
}

/// Walk `staging_dir` and return its entries in file-name order.
///
/// The manifest and its directory are omitted because the writer emits
/// them first.
fn collect_entries(staging_dir: &Utf8Path) -> Result<Vec<StagedEntry>> {
    let mut entries = Vec::new();
    for item in WalkDir::new(staging_dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let item = item?;
        let path = Utf8PathBuf::try_from(item.path().to_path_buf())
            .map_err(|e| ArchiveError::NonUtf8Path(e.into_path_buf()))?;
        let name = entry_name(staging_dir, &path)?;
        if name == META_INF || name == MANIFEST_PATH {
            continue;
        }
        entries.push(StagedEntry {
            name,
            is_dir: item.file_type().is_dir(),
            path,
        });
    }
    Ok(entries)
}

/// Build the `/`-separated entry name for `path` relative to `root`.
fn entry_name(root: &Utf8Path, path: &Utf8Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ArchiveError::NonUtf8Path(path.as_std_path().to_path_buf()))?;
    Ok(relative
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Per-archive choices applied to each entry's options.
struct EntryOptions {
    method: CompressionMethod,
    timestamp: Option<zip::DateTime>,
}

impl EntryOptions {
    fn for_request(request: &ArchiveRequest) -> Self {
        Self {
            method: if request.compress {
                CompressionMethod::Deflated
            } else {
                CompressionMethod::Stored
            },
            timestamp: request.timestamp.map(|ts| ts.zip_date_time()),
        }
    }

    const fn is_reproducible(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Options for an entry whose source was last modified at `modified`.
    fn options(&self, modified: SystemTime, mode: u32) -> SimpleFileOptions {
        let time = self
            .timestamp
            .unwrap_or_else(|| zip_date_time_for(modified));
        SimpleFileOptions::default()
            .compression_method(self.method)
            .last_modified_time(time)
            .unix_permissions(mode)
    }

    fn file_mode(&self, path: &Path) -> u32 {
        if self.is_reproducible() {
            REPRODUCIBLE_FILE_MODE
        } else {
            disk_mode(path).unwrap_or(REPRODUCIBLE_FILE_MODE)
        }
    }

    fn dir_mode(&self, path: &Path) -> u32 {
        if self.is_reproducible() {
            REPRODUCIBLE_DIR_MODE
        } else {
            disk_mode(path).unwrap_or(REPRODUCIBLE_DIR_MODE)
        }
    }
}

#[cfg(unix)]
fn disk_mode(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .ok()
        .map(|meta| meta.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn disk_mode(_path: &Path) -> Option<u32> {
    None
}

fn modified_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or_else(|_| SystemTime::now())
}

fn write_manifest<W>(
    zip: &mut ZipWriter<W>,
    request: &ArchiveRequest,
    entry_options: &EntryOptions,
) -> Result<()>
where
    W: Write + std::io::Seek,
{
    let manifest_path = request
        .manifest
        .file()
        .map_or_else(|| request.staging_dir.join(MANIFEST_PATH), Utf8Path::to_path_buf);
    let bytes = request
        .manifest
        .bytes()
        .map_err(|e| ArchiveError::io(&manifest_path, e))?;
    let modified = request
        .manifest
        .file()
        .map_or_else(SystemTime::now, |path| modified_time(path.as_std_path()));

    let meta_inf = request.staging_dir.join(META_INF);
    zip.add_directory(
        format!("{META_INF}/"),
        entry_options.options(modified, entry_options.dir_mode(meta_inf.as_std_path())),
    )?;
    zip.start_file(
        MANIFEST_PATH,
        entry_options.options(modified, entry_options.file_mode(manifest_path.as_std_path())),
    )?;
    zip.write_all(&bytes)
        .map_err(|e| ArchiveError::io(&request.output_file, e))?;
    Ok(())
}

fn write_entry<W>(
    zip: &mut ZipWriter<W>,
    entry: &StagedEntry,
    entry_options: &EntryOptions,
) -> Result<()>
where
    W: Write + std::io::Seek,
{
    let path = entry.path.as_std_path();
    let modified = modified_time(path);
    if entry.is_dir {
        zip.add_directory(
            format!("{}/", entry.name),
            entry_options.options(modified, entry_options.dir_mode(path)),
        )?;
        return Ok(());
    }

    zip.start_file(
        entry.name.as_str(),
        entry_options.options(modified, entry_options.file_mode(path)),
    )?;
    let mut source = File::open(path).map_err(|e| ArchiveError::io(&entry.path, e))?;
    std::io::copy(&mut source, zip).map_err(|e| ArchiveError::io(&entry.path, e))?;
    Ok(())
}
