//! Derivative generation for uploaded images.
//!
//! A [`DerivativeSet`] is the immutable, ordered list of renditions every
//! image upload receives. [`DerivativePipeline::generate`] walks that list in
//! order and isolates failures per spec, so one bad rendition never costs the
//! others.

pub mod config;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod renderer;
pub mod spec;

pub use config::MediaConfig;
pub use error::MediaError;
pub use geometry::Dimensions;
pub use pipeline::{Derivative, DerivativeFailure, DerivativePipeline, DerivativeReport, SourceImage};
pub use renderer::{ImageRenderer, OutputFormat, Renderer, Rendition, ResizeFilter};
pub use spec::{CropAnchor, DerivativeSet, DerivativeSpec};
