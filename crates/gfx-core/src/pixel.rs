//! Canonical pixel representation.
//!
//! [`RGBA64`] is the interchange type of the whole workspace: color models
//! convert to and from it, blend functions consume and produce it, and the
//! image buffer quantizes it at its boundary.
//!
//! # State
//!
//! Every pixel carries two state bits next to its four `f64` channels:
//!
//! - `linear` - channels are linear light (`true`) or sRGB encoded (`false`)
//! - `premultiplied` - RGB is multiplied by alpha
//!
//! Arithmetic never clamps. Clamping and quantization happen only in
//! [`RGBA64::clamp`], [`RGBA64::to_u8`] and [`RGBA64::to_u16`].
//!
//! # Scoped State
//!
//! [`RGBA64::process`] switches a pixel into a working state, runs a closure
//! and restores the original state on every exit path, including early
//! `Err` returns and panics:
//!
//! ```rust
//! use gfx_core::RGBA64;
//!
//! let mut px = RGBA64::new(0.5, 0.5, 0.5, 1.0);
//! let lum = px.process(true, true, |p| p.r);
//! assert!((lum - 0.214).abs() < 0.01);
//! assert!(!px.linear);
//! ```

use crate::transfer;

/// Alpha values at or below this are treated as fully transparent.
pub const ALPHA_EPSILON: f64 = 1e-8;

/// Rec.709 luma coefficients.
pub const REC709_LUMA: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Rec.601 luma coefficients.
pub const REC601_LUMA: [f64; 3] = [0.299, 0.587, 0.114];

/// Canonical floating point RGBA pixel with explicit encoding state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBA64 {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
    /// Alpha
    pub a: f64,
    /// Channels are linear light
    pub linear: bool,
    /// RGB is premultiplied by alpha
    pub premultiplied: bool,
}

impl Default for RGBA64 {
    fn default() -> Self {
        Self::transparent()
    }
}

impl RGBA64 {
    /// Creates a straight-alpha sRGB pixel.
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a,
            linear: false,
            premultiplied: false,
        }
    }

    /// Creates a straight-alpha linear-light pixel.
    #[inline]
    pub const fn new_linear(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a,
            linear: true,
            premultiplied: false,
        }
    }

    /// Opaque gray in sRGB.
    #[inline]
    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v, 1.0)
    }

    /// Fully transparent black.
    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Opaque black.
    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Opaque white.
    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    /// Builds a straight sRGB pixel from 8-bit channels.
    #[inline]
    pub fn from_u8(px: [u8; 4]) -> Self {
        Self::new(
            px[0] as f64 / 255.0,
            px[1] as f64 / 255.0,
            px[2] as f64 / 255.0,
            px[3] as f64 / 255.0,
        )
    }

    /// Builds a straight sRGB pixel from 16-bit channels.
    #[inline]
    pub fn from_u16(px: [u16; 4]) -> Self {
        Self::new(
            px[0] as f64 / 65535.0,
            px[1] as f64 / 65535.0,
            px[2] as f64 / 65535.0,
            px[3] as f64 / 65535.0,
        )
    }

    /// RGB channels as an array.
    #[inline]
    pub fn rgb(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// All four channels as an array.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns `true` when alpha is indistinguishable from zero.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a <= ALPHA_EPSILON
    }

    /// Returns a copy whose RGB is premultiplied by alpha.
    ///
    /// A transparent pixel gets RGB = 0.
    #[inline]
    pub fn premultiply(mut self) -> Self {
        self.premultiply_mut();
        self
    }

    /// Returns a copy with straight alpha.
    ///
    /// A transparent pixel gets RGB = 0; no division is performed.
    #[inline]
    pub fn unpremultiply(mut self) -> Self {
        self.unpremultiply_mut();
        self
    }

    /// Returns a linear-light copy, keeping premultiplication state.
    #[inline]
    pub fn to_linear(mut self) -> Self {
        self.set_state(true, self.premultiplied);
        self
    }

    /// Returns an sRGB-encoded copy, keeping premultiplication state.
    #[inline]
    pub fn to_srgb(mut self) -> Self {
        self.set_state(false, self.premultiplied);
        self
    }

    /// Straight sRGB copy, the form color models read.
    #[inline]
    pub fn straight(mut self) -> Self {
        self.set_state(false, false);
        self
    }

    /// Clamps alpha to [0, 1] and RGB to [0, A] (premultiplied) or [0, 1].
    pub fn clamp(mut self) -> Self {
        self.a = clamp01(self.a);
        let hi = if self.premultiplied { self.a } else { 1.0 };
        self.r = self.r.clamp(0.0, hi);
        self.g = self.g.clamp(0.0, hi);
        self.b = self.b.clamp(0.0, hi);
        self
    }

    /// sRGB, premultiplied and clamped: the form blend functions return.
    #[inline]
    pub fn canonical(mut self) -> Self {
        self.set_state(false, true);
        self.clamp()
    }

    /// Converts the pixel in place to the given state.
    pub fn set_state(&mut self, linear: bool, premultiplied: bool) {
        if self.linear == linear && self.premultiplied == premultiplied {
            return;
        }
        if self.linear != linear {
            let was_premul = self.premultiplied;
            self.unpremultiply_mut();
            let f: fn(f64) -> f64 = if linear { transfer::eotf } else { transfer::oetf };
            self.r = f(self.r);
            self.g = f(self.g);
            self.b = f(self.b);
            self.linear = linear;
            if was_premul {
                self.premultiply_mut();
            }
        }
        if premultiplied {
            self.premultiply_mut();
        } else {
            self.unpremultiply_mut();
        }
    }

    fn premultiply_mut(&mut self) {
        if self.premultiplied {
            return;
        }
        if self.is_transparent() {
            self.r = 0.0;
            self.g = 0.0;
            self.b = 0.0;
        } else {
            self.r *= self.a;
            self.g *= self.a;
            self.b *= self.a;
        }
        self.premultiplied = true;
    }

    fn unpremultiply_mut(&mut self) {
        if !self.premultiplied {
            return;
        }
        if self.is_transparent() {
            self.r = 0.0;
            self.g = 0.0;
            self.b = 0.0;
        } else {
            self.r /= self.a;
            self.g /= self.a;
            self.b /= self.a;
        }
        self.premultiplied = false;
    }

    /// Runs `f` with the pixel in the requested working state.
    ///
    /// `want_unpremul` selects straight alpha (`true`) or premultiplied
    /// (`false`); `want_linear` selects linear light or sRGB. The original
    /// state is restored when `f` returns, when it returns an error value, and
    /// when it panics. Whatever `f` returns is passed through.
    pub fn process<R>(&mut self, want_unpremul: bool, want_linear: bool, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut guard = StateGuard::enter(self, want_linear, !want_unpremul);
        f(&mut *guard.pixel)
    }

    /// Rec.709 luminance of the straight sRGB values.
    #[inline]
    pub fn luminance(&self) -> f64 {
        let s = self.straight();
        s.r * REC709_LUMA[0] + s.g * REC709_LUMA[1] + s.b * REC709_LUMA[2]
    }

    /// Quantizes to straight sRGB 8-bit channels (clamped, truncated).
    #[inline]
    pub fn to_u8(&self) -> [u8; 4] {
        let s = self.straight().clamp();
        [quantize(s.r, 255.0) as u8, quantize(s.g, 255.0) as u8, quantize(s.b, 255.0) as u8, quantize(s.a, 255.0) as u8]
    }

    /// Quantizes to straight sRGB 16-bit channels (clamped, truncated).
    #[inline]
    pub fn to_u16(&self) -> [u16; 4] {
        let s = self.straight().clamp();
        [
            quantize(s.r, 65535.0) as u16,
            quantize(s.g, 65535.0) as u16,
            quantize(s.b, 65535.0) as u16,
            quantize(s.a, 65535.0) as u16,
        ]
    }

    /// Compares channels after bringing `other` into this pixel's state.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        let mut o = *other;
        o.set_state(self.linear, self.premultiplied);
        (self.r - o.r).abs() <= eps
            && (self.g - o.g).abs() <= eps
            && (self.b - o.b).abs() <= eps
            && (self.a - o.a).abs() <= eps
    }
}

/// Truncating quantizer that absorbs float noise like `254.99999999`.
#[inline]
fn quantize(v: f64, scale: f64) -> f64 {
    (v * scale + 1e-6).floor().clamp(0.0, scale)
}

#[inline]
fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Restores a pixel's state when dropped.
struct StateGuard<'a> {
    pixel: &'a mut RGBA64,
    linear: bool,
    premultiplied: bool,
}

impl<'a> StateGuard<'a> {
    fn enter(pixel: &'a mut RGBA64, linear: bool, premultiplied: bool) -> Self {
        let saved = (pixel.linear, pixel.premultiplied);
        pixel.set_state(linear, premultiplied);
        Self {
            pixel,
            linear: saved.0,
            premultiplied: saved.1,
        }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.pixel.set_state(self.linear, self.premultiplied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_involution() {
        for i in 0..=100 {
            let v = i as f64 / 100.0;
            let px = RGBA64::new(v, 1.0 - v, v * 0.5, 0.7);
            let back = px.to_linear().to_srgb();
            assert!(back.approx_eq(&px, 1e-9));
            assert!(!back.linear);
        }
    }

    #[test]
    fn test_premultiply_involution() {
        let px = RGBA64::new(0.3, 0.6, 0.9, 0.25);
        let back = px.premultiply().unpremultiply();
        assert_abs_diff_eq!(back.r, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(back.g, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(back.b, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_alpha_forces_black() {
        let px = RGBA64::new(0.3, 0.6, 0.9, 0.0).premultiply();
        assert_eq!(px.rgb(), [0.0, 0.0, 0.0]);
        let mut raw = RGBA64::new(0.3, 0.6, 0.9, 0.0);
        raw.premultiplied = true;
        assert_eq!(raw.unpremultiply().rgb(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_premultiplied_transfer() {
        let px = RGBA64::new(0.5, 0.5, 0.5, 0.5).premultiply();
        let lin = px.to_linear();
        assert!(lin.premultiplied);
        assert_abs_diff_eq!(lin.r, transfer::eotf(0.5) * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_clamp_premultiplied() {
        let mut px = RGBA64::new(0.9, -0.2, 0.3, 0.5);
        px.premultiplied = true;
        let c = px.clamp();
        assert_eq!(c.r, 0.5);
        assert_eq!(c.g, 0.0);
        assert_eq!(c.b, 0.3);
        let s = RGBA64::new(1.5, 0.5, 0.2, 2.0).clamp();
        assert_eq!(s.to_array(), [1.0, 0.5, 0.2, 1.0]);
    }

    #[test]
    fn test_process_restores_state() {
        let mut px = RGBA64::new(0.5, 0.25, 0.75, 0.5).premultiply();
        let before = px;
        let seen = px.process(true, true, |p| (p.linear, p.premultiplied));
        assert_eq!(seen, (true, false));
        assert!(px.approx_eq(&before, 1e-12));
        assert!(px.premultiplied && !px.linear);
    }

    #[test]
    fn test_process_restores_on_error() {
        let mut px = RGBA64::new(0.5, 0.5, 0.5, 1.0);
        let res: Result<(), &str> = px.process(false, true, |p| {
            p.r = 0.1;
            Err("boom")
        });
        assert!(res.is_err());
        assert!(!px.linear && !px.premultiplied);
        assert_abs_diff_eq!(px.r, transfer::oetf(0.1), epsilon = 1e-12);
    }

    #[test]
    fn test_process_restores_on_panic() {
        let mut px = RGBA64::new(0.5, 0.5, 0.5, 1.0);
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            px.process(true, true, |_| panic!("inner"));
        }));
        assert!(caught.is_err());
        assert!(!px.linear);
        assert_abs_diff_eq!(px.r, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(RGBA64::white().to_u8(), [255, 255, 255, 255]);
        assert_eq!(RGBA64::new(0.5, 0.0, 1.2, 1.0).to_u8(), [127, 0, 255, 255]);
        for v in [0u16, 1, 3, 1000, 32768, 65534, 65535] {
            let px = RGBA64::from_u16([v, v, v, v]);
            assert_eq!(px.to_u16(), [v, v, v, v]);
        }
        for v in 0..=255u8 {
            assert_eq!(RGBA64::from_u8([v, v, v, 255]).to_u8()[0], v);
        }
    }

    #[test]
    fn test_quantize_premultiplied_input() {
        let px = RGBA64::new(1.0, 0.0, 0.0, 0.5).premultiply();
        assert_eq!(px.to_u8(), [255, 0, 0, 127]);
    }

    #[test]
    fn test_luminance() {
        assert_abs_diff_eq!(RGBA64::white().luminance(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(RGBA64::new(0.0, 1.0, 0.0, 1.0).luminance(), 0.7152, epsilon = 1e-12);
    }
}
