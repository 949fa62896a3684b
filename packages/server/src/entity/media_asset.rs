use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_asset")]
pub struct Model {
    /// UUIDv7 primary key, also the asset's storage directory.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Normalized upload filename of the original.
    pub filename: String,
    pub mime_type: String,
    pub size: i64,
    /// SHA-256 of the original, hex encoded.
    pub content_hash: String,

    /// Pixel size of the original; NULL for non-images.
    pub width: Option<i32>,
    pub height: Option<i32>,

    #[sea_orm(has_many)]
    pub derivatives: HasMany<super::media_derivative::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
