//! Cylindrical RGB models: HSL and HSB.
//!
//! Hue is in degrees [0, 360) and wraps; saturation, lightness and brightness
//! are in [0, 1]. An achromatic color (saturation below `1e-10`) has hue 0.
//!
//! The free functions [`rgb_to_hsl`] and [`hsl_to_rgb`] are shared with the
//! blend modes and color filters.

use gfx_core::RGBA64;

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb, wrap_hue};

/// Chroma below this is treated as gray.
pub const ACHROMATIC_EPSILON: f64 = 1e-10;

fn hue_of(r: f64, g: f64, b: f64, max: f64, d: f64) -> f64 {
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    wrap_hue(h * 60.0)
}

/// Converts straight sRGB to (hue, saturation, lightness).
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d < ACHROMATIC_EPSILON {
        return (0.0, 0.0, l);
    }
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    (hue_of(r, g, b, max, d), s.clamp(0.0, 1.0), l)
}

fn hue_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Converts (hue, saturation, lightness) to straight sRGB.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s < ACHROMATIC_EPSILON {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = wrap_hue(h) / 360.0;
    (
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    )
}

/// Converts straight sRGB to (hue, saturation, brightness).
pub fn rgb_to_hsb(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    if d < ACHROMATIC_EPSILON || max <= 0.0 {
        return (0.0, 0.0, max);
    }
    (hue_of(r, g, b, max, d), d / max, max)
}

/// Converts (hue, saturation, brightness) to straight sRGB.
pub fn hsb_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s < ACHROMATIC_EPSILON {
        return (v, v, v);
    }
    let h = wrap_hue(h) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Hue, saturation, lightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees [0, 360)
    pub h: f64,
    /// Saturation [0, 1]
    pub s: f64,
    /// Lightness [0, 1]
    pub l: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

impl Hsl {
    /// Creates a color, wrapping the hue.
    pub fn new(h: f64, s: f64, l: f64, alpha: f64) -> Self {
        Self {
            h: wrap_hue(h),
            s,
            l,
            alpha,
        }
    }
}

static HSL_META: ModelMeta = ModelMeta {
    name: "HSL",
    description: "Hue, saturation and lightness",
    channels: &[
        ChannelMeta::new("Hue", 0.0, 360.0, "deg", "Hue angle, wraps at 360"),
        ChannelMeta::new("Saturation", 0.0, 1.0, "", "Colorfulness relative to lightness"),
        ChannelMeta::new("Lightness", 0.0, 1.0, "", "0 black, 0.5 pure hue, 1 white"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Hsl {
    const META: &'static ModelMeta = &HSL_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let (h, s, l) = rgb_to_hsl(r, g, b);
        Self::new(h, s, l, a)
    }

    fn to_rgba64(&self) -> RGBA64 {
        let (r, g, b) = hsl_to_rgb(self.h, self.s, self.l);
        RGBA64::new(r, g, b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.h, self.s, self.l, self.alpha]
    }
}

/// Hue, saturation, brightness (also known as HSV).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    /// Hue in degrees [0, 360)
    pub h: f64,
    /// Saturation [0, 1]
    pub s: f64,
    /// Brightness [0, 1]
    pub b: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

impl Hsb {
    /// Creates a color, wrapping the hue.
    pub fn new(h: f64, s: f64, b: f64, alpha: f64) -> Self {
        Self {
            h: wrap_hue(h),
            s,
            b,
            alpha,
        }
    }
}

static HSB_META: ModelMeta = ModelMeta {
    name: "HSB",
    description: "Hue, saturation and brightness",
    channels: &[
        ChannelMeta::new("Hue", 0.0, 360.0, "deg", "Hue angle, wraps at 360"),
        ChannelMeta::new("Saturation", 0.0, 1.0, "", "Colorfulness relative to brightness"),
        ChannelMeta::new("Brightness", 0.0, 1.0, "", "Value of the strongest channel"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Hsb {
    const META: &'static ModelMeta = &HSB_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let (h, s, v) = rgb_to_hsb(r, g, b);
        Self::new(h, s, v, a)
    }

    fn to_rgba64(&self) -> RGBA64 {
        let (r, g, b) = hsb_to_rgb(self.h, self.s, self.b);
        RGBA64::new(r, g, b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.h, self.s, self.b, self.alpha]
    }
}
