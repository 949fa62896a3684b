#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};

/// Lifecycle flag of a versioned document.
///
/// Documents written before versioning was introduced carry no status at all;
/// callers model that as `Option<PublicationStatus>::None` rather than a third
/// variant, so the store can keep the column nullable.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    /// Visible to everyone.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "published"))]
    Published,
    /// Work in progress, visible to authenticated requesters only.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "draft"))]
    Draft,
}

impl PublicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }
}

impl Default for PublicationStatus {
    fn default() -> Self {
        Self::Draft
    }
}
