use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use uuid::Uuid;

use super::error::StorageError;
use super::hash::ContentHash;
use super::key::AssetKey;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Receipt for a completed write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub hash: ContentHash,
    pub size: u64,
}

/// Named object storage for uploaded originals and their derivatives.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store bytes under `key`, replacing any previous object.
    async fn put(&self, key: &AssetKey, data: &[u8]) -> Result<StoredObject, StorageError>;

    /// Retrieve all bytes stored under `key`.
    async fn get(&self, key: &AssetKey) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve an object as a streaming async reader.
    async fn get_stream(&self, key: &AssetKey) -> Result<BoxReader, StorageError>;

    async fn exists(&self, key: &AssetKey) -> Result<bool, StorageError>;

    /// Delete one object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &AssetKey) -> Result<bool, StorageError>;

    /// Delete every object belonging to `asset`, returning how many were removed.
    async fn delete_asset(&self, asset: Uuid) -> Result<u64, StorageError>;

    /// Get the size of an object in bytes.
    async fn size(&self, key: &AssetKey) -> Result<u64, StorageError>;
}
