use serde::Deserialize;

use crate::error::MediaError;
use crate::pipeline::DerivativePipeline;
use crate::renderer::ResizeFilter;
use crate::spec::{DerivativeSet, DerivativeSpec, reference_specs};

/// Upload handling for the media collection.
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Mime patterns that receive derivatives. Default: `["image/*"]`.
    #[serde(default = "default_mime_types")]
    pub mime_types: Vec<String>,
    /// Derivative shown in list and admin views. Default: "thumbnail".
    #[serde(default = "default_admin_thumbnail")]
    pub admin_thumbnail: String,
    /// Resampling filter. Default: lanczos3.
    #[serde(default)]
    pub filter: ResizeFilter,
    /// Ordered derivative specs. Default: thumbnail, card, tablet.
    #[serde(default = "reference_specs")]
    pub derivatives: Vec<DerivativeSpec>,
}

fn default_mime_types() -> Vec<String> {
    vec!["image/*".into()]
}
fn default_admin_thumbnail() -> String {
    "thumbnail".into()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            mime_types: default_mime_types(),
            admin_thumbnail: default_admin_thumbnail(),
            filter: ResizeFilter::default(),
            derivatives: reference_specs(),
        }
    }
}

impl MediaConfig {
    /// Validate the derivative list and build the pipeline it describes.
    pub fn build_pipeline(&self) -> Result<DerivativePipeline, MediaError> {
        let set = DerivativeSet::new(self.derivatives.clone(), &self.admin_thumbnail)?;
        Ok(DerivativePipeline::new(
            set,
            self.mime_types.clone(),
            self.filter,
        ))
    }
}
