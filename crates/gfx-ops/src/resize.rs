//! Image resize and resampling.
//!
//! # Methods
//!
//! - [`ResizeMethod::Nearest`] - no interpolation, samples `floor((x + 0.5) * sx)`
//! - [`ResizeMethod::Bilinear`] - four neighbors around the mapped pixel center
//! - [`ResizeMethod::Bicubic`] - separable Mitchell-Netravali (B = C = 1/3)
//! - [`ResizeMethod::Lanczos`] - separable Lanczos-3
//!
//! # Example
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//! use gfx_ops::resize::{resize, ResizeMethod};
//!
//! let src = Image::filled(16, 16, RGBA64::gray(0.5)).unwrap();
//! let dst = resize(&src, 32, 8, ResizeMethod::Lanczos).unwrap();
//! assert_eq!(dst.dimensions(), (32, 8));
//! ```

use std::fmt;
use std::str::FromStr;

use gfx_core::{Error, Image, Result};
use rayon::prelude::*;
use tracing::trace;

use crate::sample::{Buffer, CLEAR, Px};
use crate::transform::inherit;

/// Resampling method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMethod {
    /// Nearest neighbor.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Mitchell-Netravali cubic.
    Bicubic,
    /// Lanczos with three lobes.
    Lanczos,
}

impl ResizeMethod {
    /// All methods.
    pub const ALL: [ResizeMethod; 4] = [Self::Nearest, Self::Bilinear, Self::Bicubic, Self::Lanczos];

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Lanczos => "lanczos",
        }
    }

    /// Kernel support radius.
    #[inline]
    pub fn support(&self) -> f64 {
        match self {
            Self::Nearest => 0.5,
            Self::Bilinear => 1.0,
            Self::Bicubic => 2.0,
            Self::Lanczos => 3.0,
        }
    }

    /// Kernel weight at distance `x`.
    #[inline]
    pub fn weight(&self, x: f64) -> f64 {
        match self {
            Self::Nearest => {
                if x.abs() < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Bilinear => (1.0 - x.abs()).max(0.0),
            Self::Bicubic => mitchell(x),
            Self::Lanczos => lanczos(x, 3.0),
        }
    }
}

impl fmt::Display for ResizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            "bicubic" | "cubic" | "mitchell" => Ok(Self::Bicubic),
            "lanczos" | "lanczos3" => Ok(Self::Lanczos),
            _ => Err(Error::invalid_argument(format!("unknown resize method '{s}'"))),
        }
    }
}

#[inline]
fn mitchell(x: f64) -> f64 {
    const B: f64 = 1.0 / 3.0;
    const C: f64 = 1.0 / 3.0;
    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax + (6.0 - 2.0 * B)) / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax + (6.0 * B + 30.0 * C) * ax * ax + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos(x: f64, a: f64) -> f64 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f64::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Resizes to `width` x `height`.
///
/// Resizing to the current size returns a clone. Metadata is copied and
/// `transform.resize` is recorded.
pub fn resize(src: &Image, width: u32, height: u32, method: ResizeMethod) -> Result<Image> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "resize target must be non-zero"));
    }
    let (sw, sh) = src.dimensions();
    trace!(sw, sh, width, height, method = method.as_str(), "resize::resize");
    let out = if (sw, sh) == (width, height) {
        src.clone()
    } else {
        match method {
            ResizeMethod::Nearest => nearest(src, width, height)?,
            ResizeMethod::Bilinear => bilinear(src, width, height)?,
            ResizeMethod::Bicubic | ResizeMethod::Lanczos => separable(src, width, height, method)?,
        }
    };
    Ok(inherit(src, out, "transform.resize", format!("{width}x{height} {method}")))
}

/// Scales both axes by `factor`, rounding to at least one pixel.
pub fn scale(src: &Image, factor: f64, method: ResizeMethod) -> Result<Image> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(Error::invalid_argument(format!("scale factor must be positive, got {factor}")));
    }
    let (w, h) = src.dimensions();
    let nw = ((w as f64 * factor).round() as u32).max(1);
    let nh = ((h as f64 * factor).round() as u32).max(1);
    let out = resize(src, nw, nh, method)?;
    out.annotate("transform.scale", factor.to_string());
    Ok(out)
}

fn nearest(src: &Image, width: u32, height: u32) -> Result<Image> {
    src.view(|view| {
        let v = &view;
        let sx = v.width() as f64 / width as f64;
        let sy = v.height() as f64 / height as f64;
        let pixels: Vec<[u16; 4]> = (0..height)
            .into_par_iter()
            .flat_map_iter(|y| {
                let yy = (((y as f64 + 0.5) * sy).floor() as u32).min(v.height() - 1);
                (0..width).map(move |x| {
                    let xx = (((x as f64 + 0.5) * sx).floor() as u32).min(v.width() - 1);
                    v.raw(xx, yy)
                })
            })
            .collect();
        Image::from_raw(width, height, pixels)
    })
}

fn bilinear(src: &Image, width: u32, height: u32) -> Result<Image> {
    let buf = Buffer::from_image(src);
    let sx = buf.width as f64 / width as f64;
    let sy = buf.height as f64 / height as f64;
    let mut data = vec![CLEAR; width as usize * height as usize];
    data.par_chunks_mut(width as usize).enumerate().for_each(|(y, row)| {
        let fy = (y as f64 + 0.5) * sy - 0.5;
        for (x, out) in row.iter_mut().enumerate() {
            *out = buf.bilinear((x as f64 + 0.5) * sx - 0.5, fy);
        }
    });
    Buffer {
        width: width as usize,
        height: height as usize,
        data,
    }
    .into_image()
}

/// Two-pass kernel resampling: horizontal then vertical.
fn separable(src: &Image, width: u32, height: u32, method: ResizeMethod) -> Result<Image> {
    let buf = Buffer::from_image(src);
    let tmp = pass(&buf, width as usize, buf.height, method, Axis::X);
    let out = pass(&tmp, width as usize, height as usize, method, Axis::Y);
    out.into_image()
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn pass(src: &Buffer, dst_w: usize, dst_h: usize, method: ResizeMethod, axis: Axis) -> Buffer {
    let (src_len, dst_len) = match axis {
        Axis::X => (src.width, dst_w),
        Axis::Y => (src.height, dst_h),
    };
    let scale = src_len as f64 / dst_len as f64;
    let stretch = scale.max(1.0);
    let support = method.support() * stretch;

    // Per output coordinate: first source index and normalized weights.
    let taps: Vec<(usize, Vec<f64>)> = (0..dst_len)
        .map(|i| {
            let center = (i as f64 + 0.5) * scale - 0.5;
            let lo = ((center - support).floor().max(0.0)) as usize;
            let hi = ((center + support).ceil() as usize).min(src_len - 1);
            let mut w: Vec<f64> = (lo..=hi).map(|s| method.weight((s as f64 - center) / stretch)).collect();
            let sum: f64 = w.iter().sum();
            if sum.abs() > 1e-12 {
                w.iter_mut().for_each(|v| *v /= sum);
            }
            (lo, w)
        })
        .collect();

    let mut data = vec![CLEAR; dst_w * dst_h];
    data.par_chunks_mut(dst_w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc: Px = CLEAR;
            match axis {
                Axis::X => {
                    let (lo, w) = &taps[x];
                    for (k, wk) in w.iter().enumerate() {
                        let p = src.at(lo + k, y);
                        acc.iter_mut().zip(p).for_each(|(a, c)| *a += c * wk);
                    }
                }
                Axis::Y => {
                    let (lo, w) = &taps[y];
                    for (k, wk) in w.iter().enumerate() {
                        let p = src.at(x, lo + k);
                        acc.iter_mut().zip(p).for_each(|(a, c)| *a += c * wk);
                    }
                }
            }
            // Negative lobes can overshoot; keep the premultiplied invariant.
            acc[3] = acc[3].clamp(0.0, 1.0);
            for c in 0..3 {
                acc[c] = acc[c].clamp(0.0, acc[3]);
            }
            *out = acc;
        }
    });
    Buffer {
        width: dst_w,
        height: dst_h,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfx_core::RGBA64;

    fn gradient() -> Image {
        Image::from_fn(8, 6, |x, y| RGBA64::new(x as f64 / 7.0, y as f64 / 5.0, 0.5, 1.0)).unwrap()
    }

    #[test]
    fn test_kernel_weights() {
        assert!((ResizeMethod::Nearest.weight(0.0) - 1.0).abs() < 1e-12);
        assert!(ResizeMethod::Nearest.weight(0.6).abs() < 1e-12);
        assert!((ResizeMethod::Bilinear.weight(0.5) - 0.5).abs() < 1e-12);
        assert!((ResizeMethod::Lanczos.weight(0.0) - 1.0).abs() < 1e-12);
        assert!(ResizeMethod::Bicubic.weight(2.5).abs() < 1e-12);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("Lanczos3".parse::<ResizeMethod>().unwrap(), ResizeMethod::Lanczos);
        assert!("sinc".parse::<ResizeMethod>().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_same_size_is_clone() {
        let src = gradient();
        for m in ResizeMethod::ALL {
            assert_eq!(resize(&src, 8, 6, m).unwrap(), src);
        }
    }

    #[test]
    fn test_zero_target() {
        assert!(resize(&gradient(), 0, 4, ResizeMethod::Bilinear).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_constant_stays_constant() {
        let src = Image::filled(5, 5, RGBA64::new(0.25, 0.5, 0.75, 1.0)).unwrap();
        for m in ResizeMethod::ALL {
            let dst = resize(&src, 11, 3, m).unwrap();
            let px = dst.get_pixel(5, 1).unwrap();
            assert!(px.approx_eq(&RGBA64::new(0.25, 0.5, 0.75, 1.0), 1e-3), "{m}: {px:?}");
        }
    }

    #[test]
    fn test_nearest_upscale_duplicates() {
        let src = Image::from_fn(2, 1, |x, _| if x == 0 { RGBA64::black() } else { RGBA64::white() }).unwrap();
        let dst = resize(&src, 4, 1, ResizeMethod::Nearest).unwrap();
        let row: Vec<u8> = (0..4).map(|x| dst.get_pixel(x, 0).unwrap().to_u8()[0]).collect();
        assert_eq!(row, vec![0, 0, 255, 255]);
    }

    #[test]
    fn test_scale_and_metadata() {
        let src = gradient();
        src.annotate("origin", "test");
        let dst = scale(&src, 0.5, ResizeMethod::Bicubic).unwrap();
        assert_eq!(dst.dimensions(), (4, 3));
        let meta = dst.metadata();
        assert_eq!(meta.get("origin"), Some("test"));
        assert_eq!(meta.get("transform.resize"), Some("4x3 bicubic"));
        assert!(scale(&src, 0.0, ResizeMethod::Nearest).is_err());
    }
}
