use serde::Serialize;

use crate::spec::{CropAnchor, DerivativeSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Region of the source kept before scaling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Size of the rendition `spec` produces from a `source`-sized image.
///
/// A missing spec height is derived from the source aspect ratio, rounded to
/// the nearest pixel and never below 1.
pub fn output_dimensions(source: Dimensions, spec: &DerivativeSpec) -> Dimensions {
    let height = match spec.height {
        Some(height) => height,
        None => rounded_ratio(source.height, spec.width, source.width),
    };
    Dimensions::new(spec.width, height)
}

/// Largest region of `source` with the aspect ratio of `target`, placed by
/// `anchor`. Scaling that region to `target` fills it exactly.
pub fn crop_window(source: Dimensions, target: Dimensions, anchor: CropAnchor) -> CropWindow {
    let source_wider = u64::from(source.width) * u64::from(target.height)
        > u64::from(source.height) * u64::from(target.width);

    let (width, height) = if source_wider {
        let width = rounded_ratio(source.height, target.width, target.height).min(source.width);
        (width, source.height)
    } else {
        let height = rounded_ratio(source.width, target.height, target.width).min(source.height);
        (source.width, height)
    };

    let (hx, hy) = anchor.halves();
    CropWindow {
        x: (source.width - width) * hx / 2,
        y: (source.height - height) * hy / 2,
        width,
        height,
    }
}

/// `round(value * num / den)`, at least 1.
fn rounded_ratio(value: u32, num: u32, den: u32) -> u32 {
    let (value, num, den) = (u64::from(value), u64::from(num), u64::from(den.max(1)));
    let rounded = (2 * value * num + den) / (2 * den);
    u32::try_from(rounded).unwrap_or(u32::MAX).max(1)
}
