//! The [`ColorModel`] trait and shared conversion helpers.
//!
//! A color model is a small `Copy` value with model-specific channels. All
//! conversions go through the canonical [`RGBA64`] pixel: models read straight
//! sRGB and produce straight sRGB.
//!
//! ```rust
//! use gfx_color::{ColorModel, Hsl, Lab, convert};
//! use gfx_core::RGBA64;
//!
//! let red = RGBA64::new(1.0, 0.0, 0.0, 1.0);
//! let hsl = Hsl::from_rgba64(&red);
//! assert_eq!(hsl.h, 0.0);
//! let lab: Lab = convert(&hsl);
//! assert!((lab.l - 53.24).abs() < 0.01);
//! ```

use gfx_core::{RGBA64, Result};

use crate::meta::ModelMeta;

/// A color representation convertible to and from [`RGBA64`].
///
/// Implementors guarantee `from_rgba64(&m.to_rgba64()) ≈ m` for every color
/// the model can represent inside the sRGB gamut.
pub trait ColorModel: Copy + Sized {
    /// Static model descriptor.
    const META: &'static ModelMeta;

    /// Converts from the canonical pixel (any state).
    fn from_rgba64(px: &RGBA64) -> Self;

    /// Converts to a straight sRGB pixel.
    fn to_rgba64(&self) -> RGBA64;

    /// Builds the model from channel values in [`ModelMeta`] order.
    ///
    /// Values are assumed valid; use [`ColorModel::from_slice`] for checked
    /// construction.
    fn from_channels(values: &[f64]) -> Self;

    /// Channel values in [`ModelMeta`] order.
    fn to_vec(&self) -> Vec<f64>;

    /// Validates `values` against the metadata and builds the model.
    fn from_slice(values: &[f64]) -> Result<Self> {
        Self::META.validate(values)?;
        Ok(Self::from_channels(values))
    }

    /// Instance access to [`ColorModel::META`].
    fn meta(&self) -> &'static ModelMeta {
        Self::META
    }

    /// Channel value by name (case-insensitive).
    fn channel(&self, name: &str) -> Option<f64> {
        Self::META.channel_index(name).map(|i| self.to_vec()[i])
    }
}

/// Converts between two models through the canonical pixel.
pub fn convert<A: ColorModel, B: ColorModel>(from: &A) -> B {
    B::from_rgba64(&from.to_rgba64())
}

/// Reads a pixel as clamped straight sRGB `[r, g, b, a]`.
pub(crate) fn read_srgb(px: &RGBA64) -> [f64; 4] {
    let mut p = *px;
    p.process(true, false, |p| {
        let c = p.clamp();
        [c.r, c.g, c.b, c.a]
    })
}

/// Wraps a hue into [0, 360).
#[inline]
pub fn wrap_hue(h: f64) -> f64 {
    let w = h.rem_euclid(360.0);
    if w >= 360.0 { 0.0 } else { w }
}
