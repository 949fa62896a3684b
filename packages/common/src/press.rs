#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Discriminant stored alongside a press item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum PressType {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pdf"))]
    Pdf,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "video"))]
    Video,
}

impl PressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for PressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one active content field of a press item.
///
/// Serialized with a `press_type` tag, so `{"press_type": "video", "video_url": "..."}`
/// is a complete value and a PDF item cannot carry a stray video URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "press_type", rename_all = "lowercase")]
pub enum PressContent {
    /// An uploaded document, referenced by asset ID.
    Pdf { pdf_document: Uuid },
    /// An external video page (YouTube, Vimeo, ...).
    Video { video_url: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PressContentError {
    #[error("pdf press items require a pdf_document")]
    MissingDocument,

    #[error("video press items require a video_url")]
    MissingVideoUrl,

    #[error("video_url must be an http(s) URL")]
    InvalidVideoUrl,
}

impl PressContent {
    pub fn press_type(&self) -> PressType {
        match self {
            Self::Pdf { .. } => PressType::Pdf,
            Self::Video { .. } => PressType::Video,
        }
    }

    /// Check the variant's payload.
    pub fn validate(&self) -> Result<(), PressContentError> {
        match self {
            Self::Pdf { .. } => Ok(()),
            Self::Video { video_url } => {
                let url = video_url.trim();
                if url.is_empty() {
                    return Err(PressContentError::MissingVideoUrl);
                }
                let rest = url
                    .strip_prefix("https://")
                    .or_else(|| url.strip_prefix("http://"))
                    .ok_or(PressContentError::InvalidVideoUrl)?;
                if rest.is_empty() || rest.chars().any(char::is_whitespace) {
                    return Err(PressContentError::InvalidVideoUrl);
                }
                Ok(())
            }
        }
    }

    /// Rebuild the variant from its stored columns.
    ///
    /// Columns belonging to the inactive variant are ignored.
    pub fn from_columns(
        press_type: PressType,
        pdf_document: Option<Uuid>,
        video_url: Option<String>,
    ) -> Result<Self, PressContentError> {
        match press_type {
            PressType::Pdf => pdf_document
                .map(|pdf_document| Self::Pdf { pdf_document })
                .ok_or(PressContentError::MissingDocument),
            PressType::Video => video_url
                .filter(|url| !url.trim().is_empty())
                .map(|video_url| Self::Video { video_url })
                .ok_or(PressContentError::MissingVideoUrl),
        }
    }

    /// Split into `(press_type, pdf_document, video_url)` columns.
    pub fn into_columns(self) -> (PressType, Option<Uuid>, Option<String>) {
        match self {
            Self::Pdf { pdf_document } => (PressType::Pdf, Some(pdf_document), None),
            Self::Video { video_url } => (PressType::Video, None, Some(video_url)),
        }
    }

    /// Asset referenced by this content, if any.
    pub fn document(&self) -> Option<Uuid> {
        match self {
            Self::Pdf { pdf_document } => Some(*pdf_document),
            Self::Video { .. } => None,
        }
    }
}
