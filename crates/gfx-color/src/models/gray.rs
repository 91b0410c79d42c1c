//! Single-channel grayscale with selectable reduction method.

use std::str::FromStr;

use gfx_core::{Error, REC601_LUMA, REC709_LUMA, RGBA64};

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb};

/// How RGB collapses to one gray value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GrayMethod {
    /// BT.601 luma weights (0.299, 0.587, 0.114)
    #[default]
    Bt601,
    /// Plain mean of R, G and B
    Average,
    /// Mean of the largest and smallest channel
    Lightness,
    /// BT.709 luma weights (0.2126, 0.7152, 0.0722)
    Bt709,
}

impl GrayMethod {
    /// All methods, default first.
    pub const ALL: [GrayMethod; 4] = [Self::Bt601, Self::Average, Self::Lightness, Self::Bt709];

    /// Lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bt601 => "bt601",
            Self::Average => "average",
            Self::Lightness => "lightness",
            Self::Bt709 => "bt709",
        }
    }

    /// Reduces straight sRGB to a gray value.
    pub fn reduce(&self, r: f64, g: f64, b: f64) -> f64 {
        match self {
            Self::Bt601 => r * REC601_LUMA[0] + g * REC601_LUMA[1] + b * REC601_LUMA[2],
            Self::Average => (r + g + b) / 3.0,
            Self::Lightness => (r.max(g).max(b) + r.min(g).min(b)) / 2.0,
            Self::Bt709 => r * REC709_LUMA[0] + g * REC709_LUMA[1] + b * REC709_LUMA[2],
        }
    }
}

impl FromStr for GrayMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_argument(format!("unknown grayscale method '{s}'")))
    }
}

/// Gray level with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grayscale {
    /// Gray level [0, 1]
    pub value: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

impl Grayscale {
    /// Reduces a pixel with an explicit method.
    pub fn from_rgba64_with(px: &RGBA64, method: GrayMethod) -> Self {
        let [r, g, b, a] = read_srgb(px);
        Self {
            value: method.reduce(r, g, b).clamp(0.0, 1.0),
            alpha: a,
        }
    }
}

static GRAY_META: ModelMeta = ModelMeta {
    name: "Grayscale",
    description: "Single gray level, BT.601 reduction by default",
    channels: &[ChannelMeta::new("Value", 0.0, 1.0, "", "Gray level"), ChannelMeta::alpha()],
};

impl ColorModel for Grayscale {
    const META: &'static ModelMeta = &GRAY_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        Self::from_rgba64_with(px, GrayMethod::default())
    }

    fn to_rgba64(&self) -> RGBA64 {
        RGBA64::new(self.value, self.value, self.value, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            value: v[0],
            alpha: v[1],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.value, self.alpha]
    }
}
