use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The upload is not an image this pipeline can rasterize. Not a failure:
    /// such assets simply have no derivatives.
    #[error("unsupported asset type: {0}")]
    UnsupportedAssetType(String),

    #[error("derivative '{name}' failed: {reason}")]
    DerivativeEncoding { name: String, reason: String },

    #[error("invalid derivative configuration: {0}")]
    InvalidConfig(String),
}

impl MediaError {
    pub(crate) fn encoding(name: &str, reason: impl ToString) -> Self {
        Self::DerivativeEncoding {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
