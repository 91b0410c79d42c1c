//! CIE models: XYZ, L*a*b*, its polar forms LCH and HCL, and L*u*v*.
//!
//! All models use the D65 reference white. XYZ is derived from linear sRGB
//! with the standard sRGB/D65 matrix; the reverse direction uses its exact
//! numeric inverse, so the only error source in a round trip is rounding.
//!
//! # Constants
//!
//! ```text
//! white  = (0.95047, 1.0, 1.08883)
//! ε      = 216 / 24389
//! κ      = 24389 / 27
//! ```

use std::sync::LazyLock;

use glam::{DMat3, DVec3};
use gfx_core::RGBA64;
use gfx_core::transfer::{eotf, oetf};

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb, wrap_hue};

/// D65 reference white in XYZ.
pub const WHITE_D65: [f64; 3] = [0.95047, 1.0, 1.08883];

/// CIE ε.
pub const EPSILON: f64 = 216.0 / 24389.0;

/// CIE κ.
pub const KAPPA: f64 = 24389.0 / 27.0;

/// Chroma below this forces hue to 0.
const CHROMA_EPSILON: f64 = 1e-10;

// Y row sums to exactly 1 so neutral grays land on a* = b* = 0.
static SRGB_TO_XYZ: LazyLock<DMat3> = LazyLock::new(|| {
    DMat3::from_cols_array(&[
        0.4124564, 0.3575761, 0.1804375, //
        0.2126729, 0.7151521, 0.0721750, //
        0.0193339, 0.1191920, 0.9503041,
    ])
    .transpose()
});

static XYZ_TO_SRGB: LazyLock<DMat3> = LazyLock::new(|| SRGB_TO_XYZ.inverse());

/// Straight sRGB to CIE XYZ.
pub fn srgb_to_xyz(r: f64, g: f64, b: f64) -> [f64; 3] {
    (*SRGB_TO_XYZ * DVec3::new(eotf(r), eotf(g), eotf(b))).to_array()
}

/// CIE XYZ to straight sRGB, clipped to the gamut in linear light.
pub fn xyz_to_srgb(x: f64, y: f64, z: f64) -> [f64; 3] {
    let lin = (*XYZ_TO_SRGB * DVec3::new(x, y, z)).clamp(DVec3::ZERO, DVec3::ONE);
    [oetf(lin.x), oetf(lin.y), oetf(lin.z)]
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON { t.cbrt() } else { (KAPPA * t + 16.0) / 116.0 }
}

#[inline]
fn lab_f_inv(f: f64) -> f64 {
    let f3 = f * f * f;
    if f3 > EPSILON { f3 } else { (116.0 * f - 16.0) / KAPPA }
}

/// CIE XYZ to L*a*b*.
pub fn xyz_to_lab(x: f64, y: f64, z: f64) -> [f64; 3] {
    let fx = lab_f(x / WHITE_D65[0]);
    let fy = lab_f(y / WHITE_D65[1]);
    let fz = lab_f(z / WHITE_D65[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// L*a*b* to CIE XYZ.
pub fn lab_to_xyz(l: f64, a: f64, b: f64) -> [f64; 3] {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    let yr = if l > KAPPA * EPSILON { fy * fy * fy } else { l / KAPPA };
    [lab_f_inv(fx) * WHITE_D65[0], yr * WHITE_D65[1], lab_f_inv(fz) * WHITE_D65[2]]
}

fn to_polar(a: f64, b: f64) -> (f64, f64) {
    let c = (a * a + b * b).sqrt();
    if c < CHROMA_EPSILON {
        return (0.0, 0.0);
    }
    (c, wrap_hue(b.atan2(a).to_degrees()))
}

fn from_polar(c: f64, h: f64) -> (f64, f64) {
    let rad = h.to_radians();
    (c * rad.cos(), c * rad.sin())
}

/// CIE 1931 XYZ tristimulus values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    /// X
    pub x: f64,
    /// Y (luminance)
    pub y: f64,
    /// Z
    pub z: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static XYZ_META: ModelMeta = ModelMeta {
    name: "XYZ",
    description: "CIE 1931 XYZ tristimulus values, D65",
    channels: &[
        ChannelMeta::new("X", 0.0, 0.95047, "", "Mix of cone responses"),
        ChannelMeta::new("Y", 0.0, 1.0, "", "Relative luminance"),
        ChannelMeta::new("Z", 0.0, 1.08883, "", "Quasi-equal to blue stimulation"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Xyz {
    const META: &'static ModelMeta = &XYZ_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let [x, y, z] = srgb_to_xyz(r, g, b);
        Self { x, y, z, alpha: a }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let [r, g, b] = xyz_to_srgb(self.x, self.y, self.z);
        RGBA64::new(r, g, b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.x, self.y, self.z, self.alpha]
    }
}

/// CIE L*a*b*.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness [0, 100]
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static LAB_META: ModelMeta = ModelMeta {
    name: "LAB",
    description: "CIE L*a*b* perceptual model, D65",
    channels: &[
        ChannelMeta::new("L", 0.0, 100.0, "", "Perceptual lightness"),
        ChannelMeta::new("A", -128.0, 128.0, "", "Green (negative) to red (positive)"),
        ChannelMeta::new("B", -128.0, 128.0, "", "Blue (negative) to yellow (positive)"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Lab {
    const META: &'static ModelMeta = &LAB_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, alpha] = read_srgb(px);
        let [x, y, z] = srgb_to_xyz(r, g, b);
        let [l, a, b] = xyz_to_lab(x, y, z);
        Self { l, a, b, alpha }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let [x, y, z] = lab_to_xyz(self.l, self.a, self.b);
        let [r, g, b] = xyz_to_srgb(x, y, z);
        RGBA64::new(r, g, b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            l: v[0],
            a: v[1],
            b: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.l, self.a, self.b, self.alpha]
    }
}

/// Cylindrical L*a*b*: lightness, chroma, hue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    /// Lightness [0, 100]
    pub l: f64,
    /// Chroma
    pub c: f64,
    /// Hue in degrees [0, 360)
    pub h: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static LCH_META: ModelMeta = ModelMeta {
    name: "LCH",
    description: "Polar CIE L*a*b*: lightness, chroma, hue",
    channels: &[
        ChannelMeta::new("L", 0.0, 100.0, "", "Perceptual lightness"),
        ChannelMeta::new("C", 0.0, 150.0, "", "Chroma, distance from the neutral axis"),
        ChannelMeta::new("H", 0.0, 360.0, "deg", "Hue angle in the a*b* plane"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Lch {
    const META: &'static ModelMeta = &LCH_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let lab = Lab::from_rgba64(px);
        let (c, h) = to_polar(lab.a, lab.b);
        Self {
            l: lab.l,
            c,
            h,
            alpha: lab.alpha,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        let (a, b) = from_polar(self.c, self.h);
        Lab {
            l: self.l,
            a,
            b,
            alpha: self.alpha,
        }
        .to_rgba64()
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            l: v[0],
            c: v[1],
            h: wrap_hue(v[2]),
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.l, self.c, self.h, self.alpha]
    }
}

/// [`Lch`] with hue-first channel order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hcl {
    /// Hue in degrees [0, 360)
    pub h: f64,
    /// Chroma
    pub c: f64,
    /// Lightness [0, 100]
    pub l: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static HCL_META: ModelMeta = ModelMeta {
    name: "HCL",
    description: "Polar CIE L*a*b* in hue, chroma, lightness order",
    channels: &[
        ChannelMeta::new("H", 0.0, 360.0, "deg", "Hue angle in the a*b* plane"),
        ChannelMeta::new("C", 0.0, 150.0, "", "Chroma, distance from the neutral axis"),
        ChannelMeta::new("L", 0.0, 100.0, "", "Perceptual lightness"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Hcl {
    const META: &'static ModelMeta = &HCL_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let lch = Lch::from_rgba64(px);
        Self {
            h: lch.h,
            c: lch.c,
            l: lch.l,
            alpha: lch.alpha,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        Lch {
            l: self.l,
            c: self.c,
            h: self.h,
            alpha: self.alpha,
        }
        .to_rgba64()
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            h: wrap_hue(v[0]),
            c: v[1],
            l: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.h, self.c, self.l, self.alpha]
    }
}

/// CIE L*u*v*.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Luv {
    /// Lightness [0, 100]
    pub l: f64,
    /// u* chromaticity
    pub u: f64,
    /// v* chromaticity
    pub v: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

static LUV_META: ModelMeta = ModelMeta {
    name: "LUV",
    description: "CIE L*u*v* perceptual model, D65",
    channels: &[
        ChannelMeta::new("L", 0.0, 100.0, "", "Perceptual lightness"),
        ChannelMeta::new("U", -134.0, 224.0, "", "Green to red chromaticity"),
        ChannelMeta::new("V", -140.0, 122.0, "", "Blue to yellow chromaticity"),
        ChannelMeta::alpha(),
    ],
};

fn uv_prime(x: f64, y: f64, z: f64) -> (f64, f64) {
    let d = x + 15.0 * y + 3.0 * z;
    if d <= 0.0 {
        return (0.0, 0.0);
    }
    (4.0 * x / d, 9.0 * y / d)
}

impl ColorModel for Luv {
    const META: &'static ModelMeta = &LUV_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, alpha] = read_srgb(px);
        let [x, y, z] = srgb_to_xyz(r, g, b);
        let yr = y / WHITE_D65[1];
        let l = if yr > EPSILON { 116.0 * yr.cbrt() - 16.0 } else { KAPPA * yr };
        if l <= 0.0 {
            return Self {
                l: 0.0,
                u: 0.0,
                v: 0.0,
                alpha,
            };
        }
        let (up, vp) = uv_prime(x, y, z);
        let (un, vn) = uv_prime(WHITE_D65[0], WHITE_D65[1], WHITE_D65[2]);
        Self {
            l,
            u: 13.0 * l * (up - un),
            v: 13.0 * l * (vp - vn),
            alpha,
        }
    }

    fn to_rgba64(&self) -> RGBA64 {
        if self.l <= 1e-10 {
            return RGBA64::new(0.0, 0.0, 0.0, self.alpha);
        }
        let (un, vn) = uv_prime(WHITE_D65[0], WHITE_D65[1], WHITE_D65[2]);
        let up = self.u / (13.0 * self.l) + un;
        let vp = self.v / (13.0 * self.l) + vn;
        let y = if self.l > KAPPA * EPSILON {
            ((self.l + 16.0) / 116.0).powi(3)
        } else {
            self.l / KAPPA
        } * WHITE_D65[1];
        if vp.abs() < 1e-12 {
            return RGBA64::new(0.0, 0.0, 0.0, self.alpha);
        }
        let x = y * 9.0 * up / (4.0 * vp);
        let z = y * (12.0 - 3.0 * up - 20.0 * vp) / (4.0 * vp);
        let [r, g, b] = xyz_to_srgb(x, y, z);
        RGBA64::new(r, g, b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self {
            l: v[0],
            u: v[1],
            v: v[2],
            alpha: v[3],
        }
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.l, self.u, self.v, self.alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_white_point() {
        let [x, y, z] = srgb_to_xyz(1.0, 1.0, 1.0);
        assert_abs_diff_eq!(x, 0.95047, epsilon = 1e-4);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(z, 1.08883, epsilon = 1e-3);
    }

    #[test]
    fn test_matrix_inverse_exact() {
        let m = *SRGB_TO_XYZ * *XYZ_TO_SRGB;
        assert!(m.abs_diff_eq(DMat3::IDENTITY, 1e-12));
    }

    #[test]
    fn test_lab_reference_values() {
        let red = Lab::from_rgba64(&RGBA64::new(1.0, 0.0, 0.0, 1.0));
        assert_abs_diff_eq!(red.l, 53.24, epsilon = 0.01);
        assert_abs_diff_eq!(red.a, 80.09, epsilon = 0.05);
        assert_abs_diff_eq!(red.b, 67.20, epsilon = 0.05);
        let white = Lab::from_rgba64(&RGBA64::white());
        assert_abs_diff_eq!(white.l, 100.0, epsilon = 0.01);
        assert_abs_diff_eq!(white.a, 0.0, epsilon = 0.01);
    }

    #[test]
    fn test_lch_gray_hue_zero() {
        let c = Lch::from_rgba64(&RGBA64::gray(0.5));
        assert_eq!((c.c, c.h), (0.0, 0.0));
        let black = Lch::from_rgba64(&RGBA64::black());
        assert_eq!((black.c, black.h), (0.0, 0.0));
    }

    #[test]
    fn test_luv_black() {
        let c = Luv::from_rgba64(&RGBA64::black());
        assert_eq!(c.to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(c.to_rgba64().rgb(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_luv_roundtrip_blue() {
        let px = RGBA64::new(0.0, 0.0, 1.0, 1.0);
        let back = Luv::from_rgba64(&px).to_rgba64();
        assert!(back.approx_eq(&px, 0.01));
    }
}
