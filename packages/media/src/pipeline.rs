use std::collections::BTreeMap;

use image::{GenericImageView, ImageFormat};
use tracing::{debug, warn};

use crate::error::MediaError;
use crate::geometry::Dimensions;
use crate::renderer::{ImageRenderer, OutputFormat, Renderer, ResizeFilter};
use crate::spec::DerivativeSet;

/// An uploaded original as handed to the pipeline.
#[derive(Clone, Copy, Debug)]
pub struct SourceImage<'a> {
    pub bytes: &'a [u8],
    pub mime_type: &'a str,
}

/// One generated rendition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derivative {
    pub name: String,
    pub dimensions: Dimensions,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivativeFailure {
    pub name: String,
    pub error: MediaError,
}

/// Everything one upload produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivativeReport {
    pub derivatives: BTreeMap<String, Derivative>,
    /// Failed specs, in declaration order.
    pub failures: Vec<DerivativeFailure>,
    /// Pixel size of the original, when it could be decoded.
    pub source_dimensions: Option<Dimensions>,
    /// Whether the source was skipped as a non-image asset.
    pub skipped: bool,
}

impl DerivativeReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.name.as_str()).collect()
    }

    fn fail(&mut self, name: &str, error: MediaError) {
        warn!(derivative = name, error = %error, "derivative generation failed");
        self.failures.push(DerivativeFailure {
            name: name.to_string(),
            error,
        });
    }
}

/// Produces the configured renditions for uploaded images.
pub struct DerivativePipeline<R = ImageRenderer> {
    set: DerivativeSet,
    mime_types: Vec<String>,
    renderer: R,
}

impl DerivativePipeline<ImageRenderer> {
    pub fn new(set: DerivativeSet, mime_types: Vec<String>, filter: ResizeFilter) -> Self {
        Self::with_renderer(set, mime_types, ImageRenderer::new(filter))
    }
}

impl<R: Renderer> DerivativePipeline<R> {
    pub fn with_renderer(set: DerivativeSet, mime_types: Vec<String>, renderer: R) -> Self {
        Self {
            set,
            mime_types,
            renderer,
        }
    }

    pub fn set(&self) -> &DerivativeSet {
        &self.set
    }

    pub fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    /// Output format for `mime_type`, or `UnsupportedAssetType` when the
    /// upload gets no derivatives.
    pub fn classify(&self, mime_type: &str) -> Result<OutputFormat, MediaError> {
        let essence = mime_essence(mime_type);
        let unsupported = || MediaError::UnsupportedAssetType(essence.clone());

        if !self
            .mime_types
            .iter()
            .any(|pattern| mime_matches(pattern, &essence))
        {
            return Err(unsupported());
        }

        ImageFormat::from_mime_type(&essence)
            .and_then(OutputFormat::for_source)
            .ok_or_else(unsupported)
    }

    /// Render every spec, in declaration order.
    ///
    /// Never fails as a whole: non-image sources yield an empty, skipped
    /// report, and a spec that cannot be rendered is recorded in
    /// [`DerivativeReport::failures`] while the remaining specs still run.
    pub fn generate(&self, source: &SourceImage<'_>) -> DerivativeReport {
        let format = match self.classify(source.mime_type) {
            Ok(format) => format,
            Err(e) => {
                debug!(error = %e, "skipping derivative generation");
                return DerivativeReport::skipped();
            }
        };

        let mut report = DerivativeReport::default();

        let image = match image::load_from_memory(source.bytes) {
            Ok(image) => image,
            Err(e) => {
                for spec in self.set.iter() {
                    report.fail(&spec.name, MediaError::encoding(&spec.name, &e));
                }
                return report;
            }
        };

        let (width, height) = image.dimensions();
        report.source_dimensions = Some(Dimensions::new(width, height));

        for spec in self.set.iter() {
            match self.renderer.render(&image, spec, format) {
                Ok(rendition) => {
                    debug!(
                        derivative = %spec.name,
                        width = rendition.dimensions.width,
                        height = rendition.dimensions.height,
                        "rendered derivative"
                    );
                    report.derivatives.insert(
                        spec.name.clone(),
                        Derivative {
                            name: spec.name.clone(),
                            dimensions: rendition.dimensions,
                            format,
                            bytes: rendition.bytes,
                        },
                    );
                }
                Err(e) => report.fail(&spec.name, e),
            }
        }

        report
    }
}

/// `type/subtype` without parameters, lowercased.
fn mime_essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Match `essence` against `image/png`-style or `image/*`-style patterns.
fn mime_matches(pattern: &str, essence: &str) -> bool {
    let pattern = pattern.trim().to_ascii_lowercase();
    match pattern.strip_suffix("/*") {
        Some(top_level) => essence
            .split_once('/')
            .is_some_and(|(kind, sub)| kind == top_level && !sub.is_empty()),
        None => pattern == essence,
    }
}
