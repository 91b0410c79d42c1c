//! Color manipulation helpers on [`RGBA64`].
//!
//! All operations go through HSL (or straight sRGB for mixing) and return a
//! new straight sRGB pixel; the input is never touched.
//!
//! ```rust
//! use gfx_color::ColorAdjust;
//! use gfx_core::RGBA64;
//!
//! let red = RGBA64::new(1.0, 0.0, 0.0, 1.0);
//! let pink = red.lighten(0.25);
//! assert!(pink.g > 0.4);
//! assert!(red.rotate_hue(120.0).approx_eq(&RGBA64::new(0.0, 1.0, 0.0, 1.0), 1e-9));
//! ```

use gfx_core::RGBA64;

use crate::model::wrap_hue;
use crate::models::hsl::{hsl_to_rgb, rgb_to_hsl};

fn with_hsl(px: &RGBA64, f: impl FnOnce(f64, f64, f64) -> (f64, f64, f64)) -> RGBA64 {
    let s = px.straight();
    let (h, sat, l) = rgb_to_hsl(s.r.clamp(0.0, 1.0), s.g.clamp(0.0, 1.0), s.b.clamp(0.0, 1.0));
    let (h, sat, l) = f(h, sat, l);
    let (r, g, b) = hsl_to_rgb(h, sat.clamp(0.0, 1.0), l.clamp(0.0, 1.0));
    RGBA64::new(r, g, b, s.a)
}

/// Non-destructive adjustments of a pixel's color.
pub trait ColorAdjust {
    /// Raises HSL lightness by `amount`, clamped to 1.
    fn lighten(&self, amount: f64) -> RGBA64;
    /// Lowers HSL lightness by `amount`, clamped to 0.
    fn darken(&self, amount: f64) -> RGBA64;
    /// Raises HSL saturation by `amount`, clamped to 1.
    fn saturate(&self, amount: f64) -> RGBA64;
    /// Lowers HSL saturation by `amount`, clamped to 0.
    fn desaturate(&self, amount: f64) -> RGBA64;
    /// Rotates hue by `degrees`, wrapping.
    fn rotate_hue(&self, degrees: f64) -> RGBA64;
    /// Hue rotated by 180 degrees.
    fn complement(&self) -> RGBA64;
    /// Each RGB channel replaced by `1 - c`; alpha kept.
    fn invert(&self) -> RGBA64;
    /// Linear interpolation of straight sRGB channels and alpha.
    fn mix(&self, other: &RGBA64, ratio: f64) -> RGBA64;
    /// Euclidean RGB distance in straight sRGB.
    fn distance(&self, other: &RGBA64) -> f64;
    /// `distance(other) <= tolerance`.
    fn is_similar(&self, other: &RGBA64, tolerance: f64) -> bool;
}

impl ColorAdjust for RGBA64 {
    fn lighten(&self, amount: f64) -> RGBA64 {
        with_hsl(self, |h, s, l| (h, s, (l + amount).min(1.0)))
    }

    fn darken(&self, amount: f64) -> RGBA64 {
        with_hsl(self, |h, s, l| (h, s, (l - amount).max(0.0)))
    }

    fn saturate(&self, amount: f64) -> RGBA64 {
        with_hsl(self, |h, s, l| (h, (s + amount).min(1.0), l))
    }

    fn desaturate(&self, amount: f64) -> RGBA64 {
        with_hsl(self, |h, s, l| (h, (s - amount).max(0.0), l))
    }

    fn rotate_hue(&self, degrees: f64) -> RGBA64 {
        with_hsl(self, |h, s, l| (wrap_hue(h + degrees), s, l))
    }

    fn complement(&self) -> RGBA64 {
        self.rotate_hue(180.0)
    }

    fn invert(&self) -> RGBA64 {
        let s = self.straight();
        RGBA64::new(1.0 - s.r, 1.0 - s.g, 1.0 - s.b, s.a)
    }

    fn mix(&self, other: &RGBA64, ratio: f64) -> RGBA64 {
        let (a, b) = (self.straight(), other.straight());
        let t = ratio.clamp(0.0, 1.0);
        let lerp = |x: f64, y: f64| x * (1.0 - t) + y * t;
        RGBA64::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
    }

    fn distance(&self, other: &RGBA64) -> f64 {
        let (a, b) = (self.straight(), other.straight());
        ((a.r - b.r).powi(2) + (a.g - b.g).powi(2) + (a.b - b.b).powi(2)).sqrt()
    }

    fn is_similar(&self, other: &RGBA64, tolerance: f64) -> bool {
        self.distance(other) <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lighten_darken_clamp() {
        let c = RGBA64::new(0.2, 0.4, 0.6, 0.5);
        assert!(c.lighten(2.0).approx_eq(&RGBA64::new(1.0, 1.0, 1.0, 0.5), 1e-12));
        assert!(c.darken(2.0).approx_eq(&RGBA64::new(0.0, 0.0, 0.0, 0.5), 1e-12));
    }

    #[test]
    fn test_desaturate_to_gray() {
        let g = RGBA64::new(1.0, 0.0, 0.0, 1.0).desaturate(1.0);
        assert_abs_diff_eq!(g.r, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(g.g, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_complement_of_blue_is_yellow() {
        let y = RGBA64::new(0.0, 0.0, 1.0, 1.0).complement();
        assert!(y.approx_eq(&RGBA64::new(1.0, 1.0, 0.0, 1.0), 1e-9));
    }

    #[test]
    fn test_mix_and_distance() {
        let m = RGBA64::black().mix(&RGBA64::white(), 0.25);
        assert_abs_diff_eq!(m.r, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(RGBA64::black().distance(&RGBA64::white()), 3f64.sqrt(), epsilon = 1e-12);
        assert!(m.is_similar(&RGBA64::gray(0.26), 0.02));
    }

    #[test]
    fn test_input_untouched() {
        let c = RGBA64::new(0.3, 0.2, 0.1, 1.0).premultiply();
        let before = c;
        let _ = c.lighten(0.1);
        assert_eq!(c, before);
    }
}
