//! Luma/chroma models on BT.601 luma weights: YUV, YIQ, YCbCr.
//!
//! All three operate directly on gamma-encoded sRGB. Inverses are exact, so
//! in-gamut colors round-trip to float precision.

use std::sync::LazyLock;

use glam::{DMat3, DVec3};
use gfx_core::{REC601_LUMA, RGBA64};

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb};

const KR: f64 = REC601_LUMA[0];
const KG: f64 = REC601_LUMA[1];
const KB: f64 = REC601_LUMA[2];

/// BT.601 U scale.
pub const U_SCALE: f64 = 0.492111;
/// BT.601 V scale.
pub const V_SCALE: f64 = 0.877283;

#[inline]
fn luma(r: f64, g: f64, b: f64) -> f64 {
    KR * r + KG * g + KB * b
}

#[inline]
fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Analog PAL luma and color difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Yuv {
    /// Luma [0, 1]
    pub y: f64,
    /// Blue difference
    pub u: f64,
    /// Red difference
    pub v: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static YUV_META: ModelMeta = ModelMeta {
    name: "YUV",
    description: "BT.601 luma with scaled blue and red differences",
    channels: &[
        ChannelMeta::new("Y", 0.0, 1.0, "", "Luma"),
        ChannelMeta::new("U", -0.437, 0.437, "", "Scaled blue minus luma"),
        ChannelMeta::new("V", -0.615, 0.615, "", "Scaled red minus luma"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Yuv {
    const META: &'static ModelMeta = &YUV_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let y = luma(r, g, b);
        Self {
            y,
            u: U_SCALE * (b - y),
            v: V_SCALE * (r - y),
            alpha: a,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let b = self.y + self.u / U_SCALE;
        let r = self.y + self.v / V_SCALE;
        let g = (self.y - KR * r - KB * b) / KG;
        RGBA64::new(clamp01(r), clamp01(g), clamp01(b), self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            y: v[0],
            u: v[1],
            v: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.y, self.u, self.v, self.alpha]
    }
}

static RGB_TO_YIQ: LazyLock<DMat3> = LazyLock::new(|| {
    DMat3::from_cols_array(&[
        0.299, 0.587, 0.114, //
        0.595716, -0.274453, -0.321263, //
        0.211456, -0.522591, 0.311135,
    ])
    .transpose()
});

static YIQ_TO_RGB: LazyLock<DMat3> = LazyLock::new(|| RGB_TO_YIQ.inverse());

/// NTSC luma, in-phase and quadrature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Yiq {
    /// Luma [0, 1]
    pub y: f64,
    /// In-phase (orange-blue)
    pub i: f64,
    /// Quadrature (purple-green)
    pub q: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static YIQ_META: ModelMeta = ModelMeta {
    name: "YIQ",
    description: "NTSC luma with in-phase and quadrature chroma",
    channels: &[
        ChannelMeta::new("Y", 0.0, 1.0, "", "Luma"),
        ChannelMeta::new("I", -0.5958, 0.5958, "", "Orange to blue axis"),
        ChannelMeta::new("Q", -0.5226, 0.5226, "", "Purple to green axis"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Yiq {
    const META: &'static ModelMeta = &YIQ_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let v = *RGB_TO_YIQ * DVec3::new(r, g, b);
        Self {
            y: v.x,
            i: v.y,
            q: v.z,
            alpha: a,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let rgb = (*YIQ_TO_RGB * DVec3::new(self.y, self.i, self.q)).clamp(DVec3::ZERO, DVec3::ONE);
        RGBA64::new(rgb.x, rgb.y, rgb.z, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            y: v[0],
            i: v[1],
            q: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.y, self.i, self.q, self.alpha]
    }
}

/// Full-range digital luma and chroma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YCbCr {
    /// Luma [0, 1]
    pub y: f64,
    /// Blue difference [-0.5, 0.5]
    pub cb: f64,
    /// Red difference [-0.5, 0.5]
    pub cr: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static YCBCR_META: ModelMeta = ModelMeta {
    name: "YCbCr",
    description: "Full-range BT.601 luma with blue and red chroma",
    channels: &[
        ChannelMeta::new("Y", 0.0, 1.0, "", "Luma"),
        ChannelMeta::new("Cb", -0.5, 0.5, "", "Blue chroma"),
        ChannelMeta::new("Cr", -0.5, 0.5, "", "Red chroma"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for YCbCr {
    const META: &'static ModelMeta = &YCBCR_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let y = luma(r, g, b);
        Self {
            y,
            cb: (b - y) / (2.0 * (1.0 - KB)),
            cr: (r - y) / (2.0 * (1.0 - KR)),
            alpha: a,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let b = self.y + 2.0 * (1.0 - KB) * self.cb;
        let r = self.y + 2.0 * (1.0 - KR) * self.cr;
        let g = (self.y - KR * r - KB * b) / KG;
        RGBA64::new(clamp01(r), clamp01(g), clamp01(b), self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            y: v[0],
            cb: v[1],
            cr: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.y, self.cb, self.cr, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_yuv_white_has_no_chroma() {
        let c = Yuv::from_rgba64(&RGBA64::white());
        assert_abs_diff_eq!(c.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.u, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.v, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ycbcr_extremes() {
        let blue = YCbCr::from_rgba64(&RGBA64::new(0.0, 0.0, 1.0, 1.0));
        assert_abs_diff_eq!(blue.cb, 0.5, epsilon = 1e-12);
        let red = YCbCr::from_rgba64(&RGBA64::new(1.0, 0.0, 0.0, 1.0));
        assert_abs_diff_eq!(red.cr, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_yiq_roundtrip() {
        let px = RGBA64::new(0.2, 0.7, 0.4, 0.9);
        let back = Yiq::from_rgba64(&px).to_rgba64();
        assert!(back.approx_eq(&px, 1e-9));
    }

    #[test]
    fn test_yuv_ranges_cover_gamut() {
        for px in [
            RGBA64::new(0.0, 0.0, 1.0, 1.0),
            RGBA64::new(1.0, 1.0, 0.0, 1.0),
            RGBA64::new(1.0, 0.0, 0.0, 1.0),
            RGBA64::new(0.0, 1.0, 1.0, 1.0),
        ] {
            let v = Yuv::from_rgba64(&px).to_vec();
            assert!(Yuv::META.validate(&v).is_ok(), "{v:?}");
        }
    }
}
