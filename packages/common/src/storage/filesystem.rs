use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufReader};
use uuid::Uuid;

use super::error::StorageError;
use super::hash::ContentHash;
use super::key::AssetKey;
use super::traits::{AssetStore, BoxReader, StoredObject};

/// Filesystem-backed asset store.
///
/// Objects live at `{base_path}/{asset id}/{file}`. Writes land in
/// `{base_path}/.tmp` first and are renamed into place, so readers never
/// observe a half-written rendition.
pub struct FilesystemAssetStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemAssetStore {
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn object_path(&self, key: &AssetKey) -> PathBuf {
        self.base_path.join(key.relative_path())
    }

    fn asset_dir(&self, asset: Uuid) -> PathBuf {
        self.base_path.join(asset.to_string())
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl AssetStore for FilesystemAssetStore {
    async fn put(&self, key: &AssetKey, data: &[u8]) -> Result<StoredObject, StorageError> {
        let size = data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let hash = ContentHash::compute(data);
        let temp_path = self.temp_path();

        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        let object_path = self.object_path(key);
        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(key = %key, size, "stored object");

        Ok(StoredObject {
            hash,
            size,
        })
    }

    async fn get_stream(&self, key: &AssetKey) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.object_path(key)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &AssetKey) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.object_path(key)).await?)
    }

    async fn delete(&self, key: &AssetKey) -> Result<bool, StorageError> {
        match fs::remove_file(self.object_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_asset(&self, asset: Uuid) -> Result<u64, StorageError> {
        let dir = self.asset_dir(asset);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            fs::remove_file(entry.path()).await?;
            removed += 1;
        }
        fs::remove_dir(&dir).await?;

        Ok(removed)
    }

    async fn size(&self, key: &AssetKey) -> Result<u64, StorageError> {
        match fs::metadata(self.object_path(key)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
