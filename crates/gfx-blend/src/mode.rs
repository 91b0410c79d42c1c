//! Blend mode descriptors and the shared compositing step.
//!
//! Every built-in mode is a per-channel (or per-color) formula `B(a, b)`
//! wrapped by [`separable`] or [`nonseparable`], which perform W3C separable
//! compositing on straight operands:
//!
//! ```text
//! as   = alpha * A_top
//! Cs'  = (1 - A_bot) * b + A_bot * B(a, b)
//! C    = as * Cs' + A_bot * a * (1 - as)      (premultiplied)
//! A    = A_bot + as * (1 - A_bot)
//! ```
//!
//! The result is always returned in canonical form: sRGB, premultiplied,
//! clamped.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use gfx_core::{ALPHA_EPSILON, Error, RGBA64, Result};
use serde::Serialize;

/// Effective top alpha below which a blend returns the bottom unchanged.
pub const ALPHA_CUTOFF: f64 = 1e-4;

/// Blend mode family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// normal, erase
    Basic,
    /// Result is never lighter than either operand
    Darken,
    /// Result is never darker than either operand
    Lighten,
    /// Darkens or lightens depending on the operands
    Contrast,
    /// Differences between operands
    Comparative,
    /// Mixes HSL components
    Component,
    /// Everything else
    Special,
}

impl Category {
    /// All categories in documentation order.
    pub const ALL: [Category; 7] = [
        Category::Basic,
        Category::Darken,
        Category::Lighten,
        Category::Contrast,
        Category::Comparative,
        Category::Component,
        Category::Special,
    ];

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::Contrast => "contrast",
            Self::Comparative => "comparative",
            Self::Component => "component",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_argument(format!("unknown blend category '{s}'")))
    }
}

/// Color space a formula runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    /// sRGB-encoded values
    Srgb,
    /// Linear light
    Linear,
}

impl Space {
    #[inline]
    fn is_linear(self) -> bool {
        self == Space::Linear
    }
}

/// Descriptive part of a blend mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendMeta {
    /// Registry name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Family
    pub category: Category,
}

/// Full blend function: `(bottom, top, alpha) -> result`.
///
/// Called only with `alpha` already validated and clamped to [0, 1].
pub type BlendFn = Arc<dyn Fn(&RGBA64, &RGBA64, f64) -> RGBA64 + Send + Sync>;

/// A registered blend mode.
#[derive(Clone)]
pub struct BlendMode {
    meta: BlendMeta,
    func: BlendFn,
}

impl BlendMode {
    /// Builds a mode. Fails on an empty name or description.
    pub fn new(name: impl Into<String>, description: impl Into<String>, category: Category, func: BlendFn) -> Result<Self> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_argument("blend mode name must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(Error::invalid_argument(format!("blend mode '{name}' needs a description")));
        }
        Ok(Self {
            meta: BlendMeta {
                name,
                description,
                category,
            },
            func,
        })
    }

    /// Metadata.
    pub fn meta(&self) -> &BlendMeta {
        &self.meta
    }

    /// Registry name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Family.
    pub fn category(&self) -> Category {
        self.meta.category
    }

    /// Blends `top` onto `bottom` at opacity `alpha`.
    ///
    /// Neither input is modified. The result is canonical (sRGB,
    /// premultiplied, clamped).
    ///
    /// # Errors
    ///
    /// InvalidArgument if `alpha` is NaN or outside [0, 1] by more than
    /// [`ALPHA_EPSILON`].
    pub fn blend(&self, bottom: &RGBA64, top: &RGBA64, alpha: f64) -> Result<RGBA64> {
        let alpha = check_alpha(alpha)?;
        Ok((self.func)(bottom, top, alpha).canonical())
    }
}

impl fmt::Debug for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlendMode").field("meta", &self.meta).finish_non_exhaustive()
    }
}

/// Validates a blend opacity and clamps it into [0, 1].
pub fn check_alpha(alpha: f64) -> Result<f64> {
    if alpha.is_nan() || alpha < -ALPHA_EPSILON || alpha > 1.0 + ALPHA_EPSILON {
        return Err(Error::invalid_argument(format!("blend alpha {alpha} is outside [0, 1]")));
    }
    Ok(alpha.clamp(0.0, 1.0))
}

/// Straight copy of `px` in the working space.
#[inline]
fn working(px: &RGBA64, space: Space) -> RGBA64 {
    let mut p = *px;
    p.set_state(space.is_linear(), false);
    p
}

/// Separable compositing of a color-level formula `mix(a, b)`.
pub fn composite(
    bottom: &RGBA64,
    top: &RGBA64,
    alpha: f64,
    space: Space,
    mix: impl FnOnce([f64; 3], [f64; 3]) -> [f64; 3],
) -> RGBA64 {
    let a_s = alpha * top.straight().a;
    if a_s < ALPHA_CUTOFF {
        return bottom.canonical();
    }
    let a = working(bottom, space);
    let b = working(top, space);
    let ab = a.a.clamp(0.0, 1.0);
    let ca = a.rgb().map(|v| v.clamp(0.0, 1.0));
    let cb = b.rgb().map(|v| v.clamp(0.0, 1.0));
    let mixed = mix(ca, cb).map(|v| v.clamp(0.0, 1.0));

    let mut out = [0.0; 3];
    for i in 0..3 {
        let cs = (1.0 - ab) * cb[i] + ab * mixed[i];
        out[i] = a_s * cs + ab * ca[i] * (1.0 - a_s);
    }
    let out_a = ab + a_s * (1.0 - ab);
    let mut px = RGBA64::new(out[0], out[1], out[2], out_a);
    px.linear = space.is_linear();
    px.premultiplied = true;
    px.canonical()
}

/// Wraps a per-channel formula into a blend function.
pub fn separable(space: Space, f: fn(f64, f64) -> f64) -> BlendFn {
    Arc::new(move |bottom: &RGBA64, top: &RGBA64, alpha: f64| {
        composite(bottom, top, alpha, space, |a, b| [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2])])
    })
}

/// Wraps a whole-color formula (sRGB) into a blend function.
pub fn nonseparable(f: fn([f64; 3], [f64; 3]) -> [f64; 3]) -> BlendFn {
    Arc::new(move |bottom: &RGBA64, top: &RGBA64, alpha: f64| composite(bottom, top, alpha, Space::Srgb, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn normal() -> BlendMode {
        BlendMode::new("n", "normal", Category::Basic, separable(Space::Srgb, |_, b| b)).unwrap()
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Darken".parse::<Category>().unwrap(), Category::Darken);
        assert!("shiny".parse::<Category>().unwrap_err().is_invalid_argument());
        for c in Category::ALL {
            assert_eq!(c.to_string().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn test_alpha_validation() {
        let m = normal();
        let px = RGBA64::white();
        assert!(m.blend(&px, &px, 1.5).unwrap_err().is_invalid_argument());
        assert!(m.blend(&px, &px, -0.1).unwrap_err().is_invalid_argument());
        assert!(m.blend(&px, &px, f64::NAN).unwrap_err().is_invalid_argument());
        assert!(m.blend(&px, &px, 1.0 + 1e-9).is_ok());
    }

    #[test]
    fn test_half_white_over_gray() {
        let out = normal()
            .blend(&RGBA64::gray(0.5), &RGBA64::new(1.0, 1.0, 1.0, 0.5), 1.0)
            .unwrap()
            .straight();
        assert_abs_diff_eq!(out.r, 0.75, epsilon = 1e-9);
        assert_abs_diff_eq!(out.a, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cutoff_returns_bottom() {
        let bottom = RGBA64::new(0.2, 0.4, 0.6, 0.7);
        let out = normal().blend(&bottom, &RGBA64::white(), 0.00005).unwrap();
        assert!(out.approx_eq(&bottom, 1e-12));
        assert!(out.premultiplied);
    }

    #[test]
    fn test_over_transparent_bottom() {
        let out = normal()
            .blend(&RGBA64::transparent(), &RGBA64::new(1.0, 0.0, 0.0, 0.5), 1.0)
            .unwrap()
            .straight();
        assert_abs_diff_eq!(out.r, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.a, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_name_rejected() {
        let f = separable(Space::Srgb, |a, _| a);
        assert!(BlendMode::new(" ", "x", Category::Basic, f.clone()).is_err());
        assert!(BlendMode::new("x", "", Category::Basic, f).is_err());
    }
}
