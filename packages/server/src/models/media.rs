use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use folio_common::config::StorageAppConfig;
use folio_common::storage::AssetKey;
use serde::Serialize;
use uuid::Uuid;

use crate::entity::{media_asset, media_derivative};

pub use super::shared::{PageQuery, Pagination};

/// One stored rendition of an asset.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DerivativeResponse {
    pub filename: String,
    #[schema(example = "/media/0190f1c2-7f7e-7cc1-9d6b-1e0c7d9a2b10/cover-thumbnail.jpg")]
    pub url: String,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub size: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaResponse {
    pub id: Uuid,
    pub filename: String,
    /// URL of the original upload.
    pub url: String,
    pub mime_type: String,
    pub size: i64,
    pub content_hash: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// URL of the representative rendition, when it exists.
    pub thumbnail_url: Option<String>,
    /// Renditions keyed by derivative name.
    pub derivatives: BTreeMap<String, DerivativeResponse>,
    pub created_at: DateTime<Utc>,
}

impl MediaResponse {
    pub fn build(
        asset: media_asset::Model,
        derivatives: Vec<media_derivative::Model>,
        storage: &StorageAppConfig,
        representative: &str,
    ) -> Self {
        let url = object_url(storage, asset.id, &asset.filename);
        let derivatives: BTreeMap<_, _> = derivatives
            .into_iter()
            .map(|d| {
                let response = DerivativeResponse {
                    url: object_url(storage, asset.id, &d.filename),
                    filename: d.filename,
                    mime_type: d.mime_type,
                    width: d.width,
                    height: d.height,
                    size: d.size,
                };
                (d.name, response)
            })
            .collect();
        let thumbnail_url = derivatives.get(representative).map(|d| d.url.clone());

        Self {
            id: asset.id,
            filename: asset.filename,
            url,
            mime_type: asset.mime_type,
            size: asset.size,
            content_hash: asset.content_hash,
            width: asset.width,
            height: asset.height,
            thumbnail_url,
            derivatives,
            created_at: asset.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadMediaResponse {
    #[serde(flatten)]
    pub media: MediaResponse,
    /// Derivatives that could not be produced or stored, in declaration
    /// order. The asset itself was saved.
    pub failed_derivatives: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaListResponse {
    pub data: Vec<MediaResponse>,
    pub pagination: Pagination,
}

/// Public URL of a file stored for `asset`.
///
/// Stored filenames were validated on upload; should one ever fail key
/// validation the plain `<prefix>/<asset>/<file>` form is used.
pub fn object_url(storage: &StorageAppConfig, asset: Uuid, file: &str) -> String {
    match AssetKey::new(asset, file) {
        Ok(key) => storage.public_url(&key),
        Err(_) => format!(
            "{}/{asset}/{file}",
            storage.public_path.trim_end_matches('/')
        ),
    }
}
