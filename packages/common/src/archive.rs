use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path};

use thiserror::Error;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

/// Maximum decompressed size per file inside a ZIP archive (128 MB).
pub const MAX_DECOMPRESSED_FILE_SIZE: u64 = 128 * 1024 * 1024;

/// Maximum total decompressed size across all files in a ZIP archive (2048 MB).
pub const MAX_TOTAL_DECOMPRESSED_SIZE: u64 = 2048 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open archive: {0}")]
    Open(#[source] ZipError),

    #[error("failed to read archive entry: {0}")]
    Entry(#[source] ZipError),

    #[error("file '{name}' exceeds maximum decompressed size of {limit} bytes")]
    EntryTooLarge { name: String, limit: u64 },

    #[error("total decompressed archive content exceeds {limit} bytes")]
    TotalTooLarge { limit: u64 },

    #[error("archive IO error: {0}")]
    Io(#[from] io::Error),
}

/// Tunables for [`extract_archive`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Top-level folder names that are dropped when every file in the archive
    /// lives under exactly one of them.
    pub strip_root: BTreeSet<String>,
    pub max_file_size: u64,
    pub max_total_size: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strip_root: BTreeSet::new(),
            max_file_size: MAX_DECOMPRESSED_FILE_SIZE,
            max_total_size: MAX_TOTAL_DECOMPRESSED_SIZE,
        }
    }
}

impl ExtractOptions {
    pub fn strip_root<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strip_root
            .extend(names.into_iter().map(Into::into).filter(|n| !n.is_empty()));
        self
    }
}

/// Summary of a successful extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Regular files written to disk.
    pub files: usize,
    /// Entries ignored because their path escaped the destination.
    pub skipped: usize,
    /// Top-level folder removed from every extracted path, if any.
    pub stripped_root: Option<String>,
}

/// Extracts `archive_path` into `dest`, preserving the archive's directory
/// structure.
pub fn extract_archive(
    archive_path: &Path,
    dest: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport, ArchiveError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(ArchiveError::Open)?;

    let stripped_root = common_root(&mut archive, &options.strip_root)?;
    let mut report = ExtractReport {
        stripped_root: stripped_root.clone(),
        ..Default::default()
    };

    fs::create_dir_all(dest)?;
    let mut total: u64 = 0;

    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(ArchiveError::Entry)?;

        let Some(name) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping archive entry outside destination");
            report.skipped += 1;
            continue;
        };

        let relative = match &stripped_root {
            Some(root) => match name.strip_prefix(root) {
                Ok(rest) => rest.to_path_buf(),
                Err(_) => name,
            },
            None => name,
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let display_name = relative.to_string_lossy().to_string();
        let mut out = File::create(&target)?;
        let written = io::copy(&mut entry.take(options.max_file_size + 1), &mut out)?;

        if written > options.max_file_size {
            drop(out);
            let _ = fs::remove_file(&target);
            return Err(ArchiveError::EntryTooLarge {
                name: display_name,
                limit: options.max_file_size,
            });
        }

        total += written;
        if total > options.max_total_size {
            return Err(ArchiveError::TotalTooLarge {
                limit: options.max_total_size,
            });
        }

        debug!(entry = %display_name, bytes = written, "Extracted archive entry");
        report.files += 1;
    }

    Ok(report)
}

/// Extracts the archive, then deletes it whatever the outcome.
pub fn extract_and_remove(
    archive_path: &Path,
    dest: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport, ArchiveError> {
    let result = extract_archive(archive_path, dest, options);

    if let Err(e) = fs::remove_file(archive_path)
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %archive_path.display(), error = %e, "Failed to delete uploaded archive");
    }

    result
}

/// Returns the single top-level folder shared by every file entry, if it is
/// one of `candidates`.
fn common_root<R: Read + io::Seek>(
    archive: &mut ZipArchive<R>,
    candidates: &BTreeSet<String>,
) -> Result<Option<String>, ArchiveError> {
    if candidates.is_empty() {
        return Ok(None);
    }

    let mut root: Option<String> = None;
    let mut saw_file = false;

    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(ArchiveError::Entry)?;
        let Some(path) = entry.enclosed_name() else {
            continue;
        };
        if entry.is_dir() {
            continue;
        }
        saw_file = true;

        let first = match first_component(&path) {
            Some(first) if path.components().count() > 1 => first,
            _ => return Ok(None),
        };

        match &root {
            None => root = Some(first),
            Some(existing) if *existing == first => {}
            Some(_) => return Ok(None),
        }
    }

    Ok(root.filter(|r| saw_file && candidates.contains(r)))
}

fn first_component(path: &Path) -> Option<String> {
    match path.components().next()? {
        Component::Normal(part) => Some(part.to_string_lossy().to_string()),
        _ => None,
    }
}
