use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::geometry::{Dimensions, crop_window, output_dimensions};
use crate::spec::DerivativeSpec;

/// Encoding used for a source's renditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Renditions keep the source's format; animated GIFs become PNG stills.
    pub fn for_source(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png | ImageFormat::Gif => Some(Self::Png),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

/// Resampling filter for scaling renditions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// An encoded rendition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendition {
    pub dimensions: Dimensions,
    pub bytes: Vec<u8>,
}

/// Turns a decoded source into one encoded rendition.
pub trait Renderer: Send + Sync {
    fn render(
        &self,
        source: &DynamicImage,
        spec: &DerivativeSpec,
        format: OutputFormat,
    ) -> Result<Rendition, MediaError>;
}

/// Crop, scale and encode with the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageRenderer {
    filter: ResizeFilter,
}

impl ImageRenderer {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl Renderer for ImageRenderer {
    fn render(
        &self,
        source: &DynamicImage,
        spec: &DerivativeSpec,
        format: OutputFormat,
    ) -> Result<Rendition, MediaError> {
        let (width, height) = source.dimensions();
        let source_dims = Dimensions::new(width, height);
        let target = output_dimensions(source_dims, spec);
        let filter = FilterType::from(self.filter);

        let scaled = if spec.height.is_some() {
            let window = crop_window(source_dims, target, spec.anchor);
            source
                .crop_imm(window.x, window.y, window.width, window.height)
                .resize_exact(target.width, target.height, filter)
        } else {
            source.resize_exact(target.width, target.height, filter)
        };

        // JPEG has no alpha channel.
        let scaled = match format {
            OutputFormat::Jpeg => DynamicImage::ImageRgb8(scaled.to_rgb8()),
            OutputFormat::Png | OutputFormat::WebP => scaled,
        };

        let mut buf = Cursor::new(Vec::new());
        scaled
            .write_to(&mut buf, format.image_format())
            .map_err(|e| MediaError::encoding(&spec.name, e))?;

        let (width, height) = scaled.dimensions();
        Ok(Rendition {
            dimensions: Dimensions::new(width, height),
            bytes: buf.into_inner(),
        })
    }
}
