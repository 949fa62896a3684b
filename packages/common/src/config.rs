use std::path::PathBuf;

use serde::Deserialize;

/// Asset storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Directory holding one sub-directory per asset. Default: "./media".
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Largest single object (original or derivative) in bytes. Default: 32 MiB.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: u64,
    /// URL prefix under which stored objects are served. Default: "/media".
    #[serde(default = "default_public_path")]
    pub public_path: String,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./media")
}
fn default_max_object_size() -> u64 {
    32 * 1024 * 1024
}
fn default_public_path() -> String {
    "/media".into()
}

impl StorageAppConfig {
    /// Public URL of an object, e.g. `/media/<asset>/<file>`.
    pub fn public_url(&self, key: &crate::storage::AssetKey) -> String {
        format!("{}/{}", self.public_path.trim_end_matches('/'), key)
    }
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            max_object_size: default_max_object_size(),
            public_path: default_public_path(),
        }
    }
}
