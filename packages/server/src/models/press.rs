use chrono::{DateTime, NaiveDate, Utc};
use folio_common::{PressContent, PublicationStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::press;
use crate::error::AppError;

pub use super::shared::{PageQuery, Pagination};
use super::shared::{double_option, validate_text};

pub const DEFAULT_PRIORITY: i32 = 1;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePressRequest {
    #[schema(example = "Ein Porträt in Licht und Schatten")]
    pub title: String,
    #[schema(example = "Süddeutsche Zeitung")]
    pub publisher: String,
    /// Publication date of the article or broadcast.
    pub date: Option<NaiveDate>,
    /// Media asset shown as the item's picture.
    pub thumbnail: Uuid,
    /// Either `{"press_type": "pdf", "pdf_document": <asset>}` or
    /// `{"press_type": "video", "video_url": "https://..."}`.
    #[serde(flatten)]
    pub content: PressContent,
    /// Sort weight, higher first. Default: 1.
    pub priority: Option<i32>,
    /// Default: draft.
    pub status: Option<PublicationStatus>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdatePressRequest {
    pub title: Option<String>,
    pub publisher: Option<String>,
    /// `null` clears the date.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub date: Option<Option<NaiveDate>>,
    pub thumbnail: Option<Uuid>,
    /// Replaces the content variant as a whole.
    pub content: Option<PressContent>,
    pub priority: Option<i32>,
    pub status: Option<PublicationStatus>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PressResponse {
    pub id: i32,
    pub title: String,
    pub publisher: String,
    pub date: Option<NaiveDate>,
    pub thumbnail: Uuid,
    /// Representative rendition of the thumbnail, or the original when it
    /// has none.
    pub thumbnail_url: Option<String>,
    #[serde(flatten)]
    pub content: PressContent,
    pub priority: i32,
    /// Absent for items created before drafts existed.
    pub status: Option<PublicationStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PressResponse {
    pub fn from_model(model: press::Model, thumbnail_url: Option<String>) -> Result<Self, AppError> {
        let content =
            PressContent::from_columns(model.press_type, model.pdf_document_id, model.video_url)
                .map_err(|e| AppError::Internal(format!("press item {}: {e}", model.id)))?;

        Ok(Self {
            id: model.id,
            title: model.title,
            publisher: model.publisher,
            date: model.date,
            thumbnail: model.thumbnail_id,
            thumbnail_url,
            content,
            priority: model.priority,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PressListResponse {
    pub data: Vec<PressResponse>,
    pub pagination: Pagination,
}

pub fn validate_create_press(req: &CreatePressRequest) -> Result<(), AppError> {
    validate_text("Title", &req.title, 256)?;
    validate_text("Publisher", &req.publisher, 256)?;
    req.content.validate()?;
    Ok(())
}

pub fn validate_update_press(req: &UpdatePressRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_text("Title", title, 256)?;
    }
    if let Some(ref publisher) = req.publisher {
        validate_text("Publisher", publisher, 256)?;
    }
    if let Some(ref content) = req.content {
        content.validate()?;
    }
    Ok(())
}
