pub mod media_asset;
pub mod media_derivative;
pub mod press;
