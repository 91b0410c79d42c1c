//! Subtractive models: CMY and CMYK, channels as fractions in [0, 1].

use gfx_core::RGBA64;

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb};

/// Cyan, magenta, yellow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmy {
    /// Cyan [0, 1]
    pub c: f64,
    /// Magenta [0, 1]
    pub m: f64,
    /// Yellow [0, 1]
    pub y: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static CMY_META: ModelMeta = ModelMeta {
    name: "CMY",
    description: "Subtractive cyan, magenta, yellow",
    channels: &[
        ChannelMeta::new("Cyan", 0.0, 1.0, "", "Cyan ink coverage"),
        ChannelMeta::new("Magenta", 0.0, 1.0, "", "Magenta ink coverage"),
        ChannelMeta::new("Yellow", 0.0, 1.0, "", "Yellow ink coverage"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Cmy {
    const META: &'static ModelMeta = &CMY_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        Self {
            c: 1.0 - r,
            m: 1.0 - g,
            y: 1.0 - b,
            alpha: a,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        RGBA64::new(1.0 - self.c, 1.0 - self.m, 1.0 - self.y, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            c: v[0],
            m: v[1],
            y: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.c, self.m, self.y, self.alpha]
    }
}

/// Cyan, magenta, yellow, key (black).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmyk {
    /// Cyan [0, 1]
    pub c: f64,
    /// Magenta [0, 1]
    pub m: f64,
    /// Yellow [0, 1]
    pub y: f64,
    /// Key [0, 1]
    pub k: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static CMYK_META: ModelMeta = ModelMeta {
    name: "CMYK",
    description: "Subtractive cyan, magenta, yellow with black key",
    channels: &[
        ChannelMeta::new("Cyan", 0.0, 1.0, "", "Cyan ink coverage"),
        ChannelMeta::new("Magenta", 0.0, 1.0, "", "Magenta ink coverage"),
        ChannelMeta::new("Yellow", 0.0, 1.0, "", "Yellow ink coverage"),
        ChannelMeta::new("Key", 0.0, 1.0, "", "Black ink coverage"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Cmyk {
    const META: &'static ModelMeta = &CMYK_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let k = 1.0 - r.max(g).max(b);
        if k >= 1.0 - 1e-10 {
            return Self {
                c: 0.0,
                m: 0.0,
                y: 0.0,
                k: 1.0,
                alpha: a,
            };
        }
        let inv = 1.0 - k;
        Self {
            c: (1.0 - r - k) / inv,
            m: (1.0 - g - k) / inv,
            y: (1.0 - b - k) / inv,
            k,
            alpha: a,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let inv = 1.0 - self.k;
        RGBA64::new((1.0 - self.c) * inv, (1.0 - self.m) * inv, (1.0 - self.y) * inv, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            c: v[0],
            m: v[1],
            y: v[2],
            k: v[3],
            alpha: v[4],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.c, self.m, self.y, self.k, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_black_has_pure_key() {
        let c = Cmyk::from_rgba64(&RGBA64::black());
        assert_eq!(c.to_vec(), vec![0.0, 0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_orange() {
        let c = Cmyk::from_rgba64(&RGBA64::new(1.0, 0.5, 0.0, 1.0));
        assert_abs_diff_eq!(c.c, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.m, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.k, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cmy_inverts() {
        let c = Cmy::from_rgba64(&RGBA64::new(0.25, 0.5, 1.0, 0.5));
        assert_eq!(c.to_vec(), vec![0.75, 0.5, 0.0, 0.5]);
    }
}
