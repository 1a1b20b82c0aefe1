use std::path::Path;

/// Reason an uploaded file name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename is `.` or `..`, or would resolve to one of them.
    PathTraversal,
    /// Filename contains null bytes.
    NullByte,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '.' and '..' are not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
        }
    }
}

/// Validates a flat filename (no directory components allowed).
///
/// Browsers may send a full client path in the multipart `filename`; callers
/// should pass the value through [`client_file_name`] first.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    if trimmed.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if is_dot_segment(trimmed) {
        return Err(FilenameError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}

/// Returns `true` for `.` and `..`.
pub fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Reduces a client-supplied upload name to its last path component.
///
/// Old browsers submit `C:\fakepath\12-icons.zip`; only `12-icons.zip` is
/// meaningful on the server.
pub fn client_file_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

/// Splits a file name into stem and extension at the last dot.
///
/// Returns `None` when there is no extension or the stem is empty.
pub fn split_extension(filename: &str) -> Option<(&str, &str)> {
    let filename = Path::new(filename).file_name()?.to_str()?;
    let (stem, ext) = filename.rsplit_once('.')?;

    if stem.is_empty() {
        return None;
    }

    Some((stem, ext))
}
