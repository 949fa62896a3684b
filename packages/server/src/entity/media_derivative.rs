use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_derivative")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub asset_id: Uuid,
    #[sea_orm(belongs_to, from = "asset_id", to = "id")]
    pub asset: HasOne<super::media_asset::Entity>,

    /// Derivative spec name, e.g. "thumbnail".
    pub name: String,
    pub filename: String,
    pub mime_type: String,
    pub width: i32,
    pub height: i32,
    pub size: i64,
    pub content_hash: String,
}

impl ActiveModelBehavior for ActiveModel {}
