//! sRGB transfer function.
//!
//! The sRGB standard uses a piecewise function combining a linear segment
//! near black with a power curve (approximately gamma 2.2) for the rest.
//! Both directions operate on straight (non-premultiplied) channel values.
//!
//! # Range
//!
//! - Input/Output: [0, 1]. Values below zero follow the linear segment, so
//!   out-of-gamut intermediates never turn into NaN.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

/// Encoded threshold below which the linear segment applies.
pub const SRGB_THRESHOLD: f64 = 0.04045;
/// Linear-light threshold below which the linear segment applies.
pub const LINEAR_THRESHOLD: f64 = 0.0031308;

/// sRGB EOTF: decodes an sRGB encoded value to linear light.
///
/// # Formula
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use gfx_core::transfer::eotf;
///
/// let linear = eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn eotf(v: f64) -> f64 {
    if v <= SRGB_THRESHOLD {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: encodes linear light to sRGB.
///
/// # Formula
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn oetf(l: f64) -> f64 {
    if l <= LINEAR_THRESHOLD {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for i in 0..=1000 {
            let v = i as f64 / 1000.0;
            let back = oetf(eotf(v));
            assert!((v - back).abs() < 1e-9, "v={v}, back={back}");
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(eotf(0.0), 0.0);
        assert!((eotf(1.0) - 1.0).abs() < 1e-12);
        assert_eq!(oetf(0.0), 0.0);
        assert!((oetf(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_stays_finite() {
        assert!(eotf(-0.5).is_finite());
        assert!(oetf(-0.5).is_finite());
    }
}
