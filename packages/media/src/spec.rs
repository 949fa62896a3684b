use serde::{Deserialize, Serialize};

use crate::error::MediaError;

/// Which part of the source survives when a fixed-size rendition has to trim
/// excess width or height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropAnchor {
    #[default]
    #[serde(alias = "center")]
    Centre,
    Top,
    RightTop,
    Right,
    RightBottom,
    Bottom,
    LeftBottom,
    Left,
    LeftTop,
}

impl CropAnchor {
    /// Share of the excess trimmed before the retained region, in halves
    /// (`0` = keep the start, `1` = split evenly, `2` = keep the end), as `(x, y)`.
    pub(crate) fn halves(self) -> (u32, u32) {
        match self {
            Self::Centre => (1, 1),
            Self::Top => (1, 0),
            Self::RightTop => (2, 0),
            Self::Right => (2, 1),
            Self::RightBottom => (2, 2),
            Self::Bottom => (1, 2),
            Self::LeftBottom => (0, 2),
            Self::Left => (0, 1),
            Self::LeftTop => (0, 0),
        }
    }
}

/// One named rendition to produce for every uploaded image.
///
/// With a `height` the rendition is exactly `width × height`, cropped around
/// `anchor`. Without one it is scaled to `width` and keeps the source's aspect
/// ratio.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivativeSpec {
    pub name: String,
    pub width: u32,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub anchor: CropAnchor,
}

impl DerivativeSpec {
    pub fn fixed(name: impl Into<String>, width: u32, height: u32, anchor: CropAnchor) -> Self {
        Self {
            name: name.into(),
            width,
            height: Some(height),
            anchor,
        }
    }

    pub fn width_only(name: impl Into<String>, width: u32, anchor: CropAnchor) -> Self {
        Self {
            name: name.into(),
            width,
            height: None,
            anchor,
        }
    }
}

/// Validated, ordered, immutable list of derivative specs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivativeSet {
    specs: Vec<DerivativeSpec>,
    representative: usize,
}

impl DerivativeSet {
    /// Build a set, checking names are unique and usable in file names, sizes
    /// are non-zero, and `representative` names one of the specs.
    pub fn new(specs: Vec<DerivativeSpec>, representative: &str) -> Result<Self, MediaError> {
        if specs.is_empty() {
            return Err(MediaError::InvalidConfig(
                "at least one derivative is required".into(),
            ));
        }

        for (i, spec) in specs.iter().enumerate() {
            validate_name(&spec.name)?;
            if spec.width == 0 || spec.height == Some(0) {
                return Err(MediaError::InvalidConfig(format!(
                    "derivative '{}' has a zero dimension",
                    spec.name
                )));
            }
            if specs[..i].iter().any(|other| other.name == spec.name) {
                return Err(MediaError::InvalidConfig(format!(
                    "duplicate derivative name '{}'",
                    spec.name
                )));
            }
        }

        let representative = specs
            .iter()
            .position(|spec| spec.name == representative)
            .ok_or_else(|| {
                MediaError::InvalidConfig(format!(
                    "representative derivative '{representative}' is not configured"
                ))
            })?;

        Ok(Self {
            specs,
            representative,
        })
    }

    /// `thumbnail` 400×300, `card` 768×1024 and `tablet` 1024×auto, all
    /// centred, with `thumbnail` as the representative.
    pub fn reference() -> Self {
        Self {
            specs: reference_specs(),
            representative: 0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivativeSpec> {
        self.specs.iter()
    }

    /// Rendition shown in list and admin views.
    pub fn representative(&self) -> &DerivativeSpec {
        &self.specs[self.representative]
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

pub(crate) fn reference_specs() -> Vec<DerivativeSpec> {
    vec![
        DerivativeSpec::fixed("thumbnail", 400, 300, CropAnchor::Centre),
        DerivativeSpec::fixed("card", 768, 1024, CropAnchor::Centre),
        DerivativeSpec::width_only("tablet", 1024, CropAnchor::Centre),
    ]
}

fn validate_name(name: &str) -> Result<(), MediaError> {
    if name.is_empty() || name.len() > 64 {
        return Err(MediaError::InvalidConfig(format!(
            "derivative name '{name}' must be 1-64 characters"
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
    {
        return Err(MediaError::InvalidConfig(format!(
            "derivative name '{name}' may only contain a-z, 0-9, '_' and '-'"
        )));
    }
    Ok(())
}
