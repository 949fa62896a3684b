use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use super::error::StorageError;

/// Location of one stored object: `<asset-id>/<file>`.
///
/// Every asset owns a directory, so an original and its derivatives can never
/// collide with another asset's files.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetKey {
    asset: Uuid,
    file: String,
}

impl AssetKey {
    /// Key for an arbitrary file inside an asset's directory.
    pub fn new(asset: Uuid, file: impl Into<String>) -> Result<Self, StorageError> {
        let file = file.into();
        validate_file_component(&file)?;
        Ok(Self { asset, file })
    }

    /// Key for a rendition of `original`: `<stem>-<derivative>.<extension>`.
    pub fn derivative(
        asset: Uuid,
        original: &str,
        derivative: &str,
        extension: &str,
    ) -> Result<Self, StorageError> {
        let stem = match original.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => original,
        };
        Self::new(asset, format!("{stem}-{derivative}.{extension}"))
    }

    pub fn asset(&self) -> Uuid {
        self.asset
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Path relative to a store's base directory.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.asset.to_string()).join(&self.file)
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asset, self.file)
    }
}

fn validate_file_component(file: &str) -> Result<(), StorageError> {
    if file.is_empty() {
        return Err(StorageError::InvalidKey("file name is empty".into()));
    }
    if file.len() > 255 {
        return Err(StorageError::InvalidKey(format!(
            "file name is {} bytes, max 255",
            file.len()
        )));
    }
    if file.contains(['/', '\\']) {
        return Err(StorageError::InvalidKey(format!(
            "'{file}' contains a path separator"
        )));
    }
    if file.starts_with('.') {
        return Err(StorageError::InvalidKey(format!(
            "'{file}' starts with a dot"
        )));
    }
    if file.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidKey(
            "file name contains control characters".into(),
        ));
    }
    Ok(())
}
