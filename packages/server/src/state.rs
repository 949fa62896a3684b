use std::sync::Arc;

use folio_common::storage::AssetStore;
use folio_common::storage::filesystem::FilesystemAssetStore;
use folio_media::DerivativePipeline;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::AppConfig;
use crate::database::init_db;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub assets: Arc<dyn AssetStore>,
    pub pipeline: Arc<DerivativePipeline>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connect the database, open the asset store and validate the
    /// derivative configuration.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let pipeline = config.media.build_pipeline()?;
        info!(
            derivatives = pipeline.set().len(),
            representative = %pipeline.set().representative().name,
            "derivative pipeline configured"
        );

        let assets = FilesystemAssetStore::new(
            config.storage.base_dir.clone(),
            config.storage.max_object_size,
        )
        .await?;
        info!(path = %config.storage.base_dir.display(), "asset store ready");

        let db = init_db(&config.database).await?;

        Ok(Self {
            db,
            assets: Arc::new(assets),
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
        })
    }
}
