use folio_media::DerivativeSpec;
use serde::Serialize;

/// What the admin panel needs to render its navigation and upload form.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminOverview {
    /// Subject of the signed-in editor.
    pub editor: String,
    pub collections: Vec<CollectionInfo>,
    pub media: MediaSettings,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CollectionInfo {
    #[schema(example = "press")]
    pub slug: &'static str,
    #[schema(example = "Press Article")]
    pub singular: &'static str,
    #[schema(example = "Press Articles")]
    pub plural: &'static str,
    /// Field shown as each document's title.
    pub use_as_title: Option<&'static str>,
    /// Columns shown in the admin list view.
    pub default_columns: Vec<&'static str>,
    /// Whether documents have a draft/published status.
    pub drafts: bool,
    /// Whether documents are file uploads.
    pub upload: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MediaSettings {
    /// Derivative shown as the admin thumbnail.
    pub admin_thumbnail: String,
    pub mime_types: Vec<String>,
    /// Configured derivatives, in generation order.
    #[schema(value_type = Vec<Object>)]
    pub derivatives: Vec<DerivativeSpec>,
}

pub fn collections() -> Vec<CollectionInfo> {
    vec![
        CollectionInfo {
            slug: "press",
            singular: "Press Article",
            plural: "Press Articles",
            use_as_title: Some("title"),
            default_columns: vec!["title", "date", "priority"],
            drafts: true,
            upload: false,
        },
        CollectionInfo {
            slug: "media",
            singular: "Media",
            plural: "Media",
            use_as_title: Some("filename"),
            default_columns: vec!["filename", "mime_type", "size"],
            drafts: false,
            upload: true,
        },
    ]
}
