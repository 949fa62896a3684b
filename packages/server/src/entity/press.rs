use folio_common::{PressType, PublicationStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "press")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub publisher: String,
    pub date: Option<Date>,

    /// Media asset shown in lists and cards.
    pub thumbnail_id: Uuid,

    /// Which of `pdf_document_id` / `video_url` is meaningful.
    pub press_type: PressType,
    pub pdf_document_id: Option<Uuid>,
    pub video_url: Option<String>,

    /// Higher sorts first.
    pub priority: i32,

    /// NULL for items created before drafts existed; those stay public.
    pub status: Option<PublicationStatus>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
