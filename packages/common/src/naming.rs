//! Names derived from an uploaded icon archive.
//!
//! Archives follow the `<digits>-<base-name>.zip` convention. The base name
//! becomes the extraction folder and the `upload_directory` metadata value;
//! the category label is the base name made human-readable.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::filename::{FilenameError, is_dot_segment, split_extension, validate_flat_filename};

/// The only accepted archive extension (case-sensitive).
pub const ARCHIVE_EXTENSION: &str = "zip";

static BASE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+-(.+)").expect("valid base name pattern"));

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-").expect("valid prefix pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("Invalid file type. Please upload a ZIP file.")]
    InvalidExtension,

    #[error("{}", .0.message())]
    InvalidFileName(FilenameError),
}

/// Parsed form of an uploaded archive's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    /// File name as uploaded, trimmed.
    pub file_name: String,
    /// File name without the `.zip` extension.
    pub stem: String,
    /// Text after the first `<digits>-` in the stem; empty when there is none.
    pub base_name: String,
    /// Display label for the category, e.g. `Space Rockets`.
    pub category_label: String,
}

impl ArchiveName {
    pub fn parse(file_name: &str) -> Result<Self, NamingError> {
        let file_name = validate_flat_filename(file_name).map_err(NamingError::InvalidFileName)?;

        let stem = match split_extension(file_name) {
            Some((stem, ARCHIVE_EXTENSION)) => stem,
            _ => return Err(NamingError::InvalidExtension),
        };

        let base_name = extract_base_name(stem);
        if is_dot_segment(&base_name) {
            return Err(NamingError::InvalidFileName(FilenameError::PathTraversal));
        }

        Ok(Self {
            file_name: file_name.to_string(),
            stem: stem.to_string(),
            category_label: format_label(&base_name),
            base_name,
        })
    }

    /// Whether the stem lacked the `<digits>-` prefix.
    pub fn has_empty_base_name(&self) -> bool {
        self.base_name.is_empty()
    }
}

/// Returns whatever follows the first `<digits>-` in the stem, or an empty
/// string. The prefix need not start the stem: `v2-icons` yields `icons`.
pub fn extract_base_name(stem: &str) -> String {
    BASE_NAME_PATTERN
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Replaces hyphens with spaces and capitalises every word.
pub fn format_label(name: &str) -> String {
    capitalize_words(&name.replace('-', " "))
}

/// Entry title for an image file stem: `01-rocket-ship` becomes `Rocket Ship`.
pub fn format_title(file_stem: &str) -> String {
    format_label(&NUMERIC_PREFIX.replace(file_stem, ""))
}

/// Upper-cases the first character of each whitespace-delimited word and
/// leaves the rest of the word untouched.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Normalises text into a lowercase, hyphen-separated slug.
///
/// Letters and digits are kept, whitespace and `-`, `_`, `.` act as
/// separators, anything else is dropped.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_separator = false;

    for c in s.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || matches!(c, '-' | '_' | '.') {
            pending_separator = true;
        }
    }

    slug
}
