/// Longest stored original name, leaving room for derivative suffixes.
const MAX_STORED_LEN: usize = 160;

/// Why an uploaded filename was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename is `.` or `..`.
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
            Self::PathTraversal => "Invalid filename: '.' and '..' are not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
        }
    }
}

/// Turn a client-supplied upload name into the name an asset is stored under.
///
/// Any directory part is dropped, whitespace becomes `-` and everything
/// outside `[A-Za-z0-9._-]` becomes `_`. Overlong names are shortened,
/// keeping the extension.
pub fn normalize_upload_filename(raw: &str) -> Result<String, FilenameError> {
    if raw.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    // Reject ASCII control characters to prevent
    // HTTP header injection (e.g. CRLF in Content-Disposition).
    if raw.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    // Some browsers send the full client path.
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();

    if base.is_empty() {
        return Err(FilenameError::Empty);
    }
    if base == "." || base == ".." {
        return Err(FilenameError::PathTraversal);
    }
    if base.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    let normalized: String = base
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '-',
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => c,
            _ => '_',
        })
        .collect();

    Ok(shorten(normalized))
}

fn shorten(name: String) -> String {
    if name.len() <= MAX_STORED_LEN {
        return name;
    }
    // Normalized names are ASCII, so byte slicing is safe.
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() < 16 => {
            let keep = MAX_STORED_LEN - ext.len() - 1;
            format!("{}.{ext}", &stem[..keep.min(stem.len())])
        }
        _ => name[..MAX_STORED_LEN].to_string(),
    }
}
