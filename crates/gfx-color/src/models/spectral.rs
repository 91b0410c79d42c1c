//! Wavelength-based models: LSL (wavelength, saturation, lightness) and LSB
//! (wavelength, saturation, brightness).
//!
//! Hue maps to a dominant wavelength through a piecewise-linear, invertible
//! curve over the visible bands:
//!
//! ```text
//! hue   0 ->  60 : 620 -> 590 nm   red    -> yellow
//! hue  60 -> 120 : 590 -> 530 nm   yellow -> green
//! hue 120 -> 180 : 530 -> 495 nm   green  -> cyan
//! hue 180 -> 240 : 495 -> 450 nm   cyan   -> blue
//! hue 240 -> 300 : 450 -> 415 nm   blue   -> violet
//! hue 300 -> 360 : 415 -> 380 nm   violet
//! ```
//!
//! Wavelengths at or above 620 nm are red. An achromatic color has no
//! dominant wavelength and is canonicalized to 380 nm.

use gfx_core::RGBA64;

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb, wrap_hue};
use crate::models::hsl::{ACHROMATIC_EPSILON, hsb_to_rgb, hsl_to_rgb, rgb_to_hsb, rgb_to_hsl};

/// Shortest wavelength handled, nm.
pub const MIN_WAVELENGTH: f64 = 380.0;
/// Longest wavelength handled, nm.
pub const MAX_WAVELENGTH: f64 = 750.0;

/// (hue, wavelength) knots, hue ascending, wavelength descending.
const KNOTS: [(f64, f64); 7] = [
    (0.0, 620.0),
    (60.0, 590.0),
    (120.0, 530.0),
    (180.0, 495.0),
    (240.0, 450.0),
    (300.0, 415.0),
    (360.0, 380.0),
];

/// Dominant wavelength in nm for a hue in degrees.
pub fn hue_to_wavelength(hue: f64) -> f64 {
    let h = wrap_hue(hue);
    for pair in KNOTS.windows(2) {
        let ((h0, w0), (h1, w1)) = (pair[0], pair[1]);
        if h <= h1 {
            return w0 + (h - h0) / (h1 - h0) * (w1 - w0);
        }
    }
    MIN_WAVELENGTH
}

/// Hue in degrees [0, 360) for a wavelength in nm.
pub fn wavelength_to_hue(nm: f64) -> f64 {
    if nm >= KNOTS[0].1 {
        return 0.0;
    }
    for pair in KNOTS.windows(2) {
        let ((h0, w0), (h1, w1)) = (pair[0], pair[1]);
        if nm >= w1 {
            return wrap_hue(h0 + (w0 - nm) / (w0 - w1) * (h1 - h0));
        }
    }
    0.0
}

fn canonical_wavelength(hue: f64, s: f64) -> f64 {
    if s < ACHROMATIC_EPSILON { MIN_WAVELENGTH } else { hue_to_wavelength(hue) }
}

const WAVELENGTH: ChannelMeta = ChannelMeta::new(
    "Wavelength",
    MIN_WAVELENGTH,
    MAX_WAVELENGTH,
    "nm",
    "Dominant wavelength of the hue",
);

/// Wavelength, saturation, lightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lsl {
    /// Dominant wavelength, nm
    pub wavelength: f64,
    /// Saturation [0, 1]
    pub s: f64,
    /// Lightness [0, 1]
    pub l: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static LSL_META: ModelMeta = ModelMeta {
    name: "LSL",
    description: "Dominant wavelength with HSL saturation and lightness",
    channels: &[
        WAVELENGTH,
        ChannelMeta::new("Saturation", 0.0, 1.0, "", "HSL saturation"),
        ChannelMeta::new("Lightness", 0.0, 1.0, "", "HSL lightness"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Lsl {
    const META: &'static ModelMeta = &LSL_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let (h, s, l) = rgb_to_hsl(r, g, b);
        Self {
            wavelength: canonical_wavelength(h, s),
            s,
            l,
            alpha: a,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let (r, g, b) = hsl_to_rgb(wavelength_to_hue(self.wavelength), self.s, self.l);
        RGBA64::new(r, g, b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            wavelength: v[0],
            s: v[1],
            l: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.wavelength, self.s, self.l, self.alpha]
    }
}

/// Wavelength, saturation, brightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lsb {
    /// Dominant wavelength, nm
    pub wavelength: f64,
    /// Saturation [0, 1]
    pub s: f64,
    /// Brightness [0, 1]
    pub b: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static LSB_META: ModelMeta = ModelMeta {
    name: "LSB",
    description: "Dominant wavelength with HSB saturation and brightness",
    channels: &[
        WAVELENGTH,
        ChannelMeta::new("Saturation", 0.0, 1.0, "", "HSB saturation"),
        ChannelMeta::new("Brightness", 0.0, 1.0, "", "HSB brightness"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Lsb {
    const META: &'static ModelMeta = &LSB_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let (h, s, v) = rgb_to_hsb(r, g, b);
        Self {
            wavelength: canonical_wavelength(h, s),
            s,
            b: v,
            alpha: a,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let (r, g, b) = hsb_to_rgb(wavelength_to_hue(self.wavelength), self.s, self.b);
        RGBA64::new(r, g, b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            wavelength: v[0],
            s: v[1],
            b: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.wavelength, self.s, self.b, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_primary_wavelengths() {
        assert_eq!(hue_to_wavelength(0.0), 620.0);
        assert_eq!(hue_to_wavelength(120.0), 530.0);
        assert_eq!(hue_to_wavelength(240.0), 450.0);
        assert_abs_diff_eq!(hue_to_wavelength(330.0), 397.5, epsilon = 1e-12);
    }

    #[test]
    fn test_mapping_inverts() {
        for i in 0..360 {
            let h = i as f64;
            assert_abs_diff_eq!(wavelength_to_hue(hue_to_wavelength(h)), h, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_long_wavelengths_are_red() {
        assert_eq!(wavelength_to_hue(700.0), 0.0);
        assert_eq!(wavelength_to_hue(750.0), 0.0);
        assert_eq!(wavelength_to_hue(380.0), 0.0);
    }

    #[test]
    fn test_gray_canonical() {
        let c = Lsl::from_rgba64(&RGBA64::gray(0.3));
        assert_eq!(c.wavelength, MIN_WAVELENGTH);
        assert_eq!(c.s, 0.0);
        let back = c.to_rgba64();
        assert!(back.approx_eq(&RGBA64::gray(0.3), 1e-12));
    }

    #[test]
    fn test_lsb_roundtrip_cyan() {
        let px = RGBA64::new(0.0, 1.0, 1.0, 1.0);
        let c = Lsb::from_rgba64(&px);
        assert_abs_diff_eq!(c.wavelength, 495.0, epsilon = 1e-9);
        assert!(c.to_rgba64().approx_eq(&px, 1e-9));
    }
}
