//! Neighborhood filters: blur, sharpen, enhance and kernel convolution.
//!
//! Out-of-range neighbors are clamped to the nearest edge pixel. Blurring
//! works on premultiplied values so transparent pixels do not tint their
//! neighbors; the other kernels work on straight color and keep the source
//! alpha.

use gfx_core::{Error, Image, RGBA64, Result};
use rayon::prelude::*;
use tracing::trace;

use super::{Filter, FilterArg, builtin};
use crate::sample::{Buffer, Px};

/// Square convolution kernel with odd side.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Row-major weights
    pub data: Vec<f64>,
    /// Side length
    pub size: usize,
}

impl Kernel {
    /// Builds a kernel from matrix rows.
    ///
    /// # Errors
    ///
    /// InvalidArgument unless the matrix is square with an odd side.
    pub fn new(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        if size % 2 == 0 {
            return Err(Error::invalid_argument(format!("kernel side must be odd, got {size}")));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != size) {
            return Err(Error::invalid_argument(format!(
                "kernel must be square: {size} rows but a row of {}",
                bad.len()
            )));
        }
        Ok(Self {
            data: rows.concat(),
            size,
        })
    }

    /// `[0,-1,0; -1,5,-1; 0,-1,0]`
    pub fn sharpen() -> Self {
        Self {
            data: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
            size: 3,
        }
    }

    /// Laplacian.
    pub fn edge_detect() -> Self {
        Self {
            data: vec![0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0],
            size: 3,
        }
    }

    /// Emboss toward the lower right.
    pub fn emboss() -> Self {
        Self {
            data: vec![-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0],
            size: 3,
        }
    }

    /// Local contrast: `c + (c - mean3x3) * amount`.
    pub fn enhance(amount: f64) -> Self {
        let ring = -amount / 9.0;
        let mut data = vec![ring; 9];
        data[4] = 1.0 + amount + ring;
        Self { data, size: 3 }
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Half the side length.
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }
}

/// Normalized 1D Gaussian taps for `radius`, sigma = radius / 2.
fn gaussian_taps(radius: usize) -> Vec<f64> {
    let sigma = radius as f64 / 2.0;
    let two_s2 = 2.0 * sigma * sigma;
    let r = radius as i64;
    let taps: Vec<f64> = (-r..=r).map(|i| (-((i * i) as f64) / two_s2).exp()).collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

fn straight(img: &Image) -> Buffer {
    img.view(|v| Buffer {
        width: v.width() as usize,
        height: v.height() as usize,
        data: v.as_slice().iter().map(|p| RGBA64::from_u16(*p).to_array()).collect(),
    })
}

fn from_straight(src: &Image, buf: Buffer) -> Result<Image> {
    let w = buf.width;
    let out = Image::from_fn(buf.width as u32, buf.height as u32, |x, y| {
        let [r, g, b, a] = buf.data[y as usize * w + x as usize];
        RGBA64::new(r, g, b, a).clamp()
    })?;
    out.set_metadata(src.metadata());
    Ok(out)
}

/// One separable pass; `horizontal` picks the axis.
fn blur_pass(src: &Buffer, taps: &[f64], horizontal: bool) -> Buffer {
    let (w, h) = (src.width, src.height);
    let r = (taps.len() / 2) as i64;
    let mut data = vec![[0.0; 4]; w * h];
    data.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = [0.0; 4];
            for (k, t) in taps.iter().enumerate() {
                let d = k as i64 - r;
                let p = if horizontal {
                    src.clamped(x as i64 + d, y as i64)
                } else {
                    src.clamped(x as i64, y as i64 + d)
                };
                for c in 0..4 {
                    acc[c] += p[c] * t;
                }
            }
            *out = acc;
        }
    });
    Buffer { width: w, height: h, data }
}

/// Gaussian blur with the given integer radius.
pub(crate) fn blur(src: &Image, radius: usize) -> Result<Image> {
    trace!(radius, "filter::blur");
    if radius == 0 {
        return Ok(src.clone());
    }
    let taps = gaussian_taps(radius);
    let buf = Buffer::from_image(src);
    let out = blur_pass(&blur_pass(&buf, &taps, true), &taps, false).into_image()?;
    out.set_metadata(src.metadata());
    Ok(out)
}

/// Convolves straight RGB with `kernel`; alpha is copied from the source.
///
/// Each weighted sum is divided by `divisor` and shifted by `offset`.
pub(crate) fn convolve(src: &Image, kernel: &Kernel, divisor: f64, offset: f64) -> Result<Image> {
    if divisor == 0.0 {
        return Err(Error::invalid_argument("convolution divisor must not be zero"));
    }
    trace!(size = kernel.size, divisor, offset, "filter::convolve");
    let buf = straight(src);
    let (w, h) = (buf.width, buf.height);
    let r = kernel.radius() as i64;
    let mut data: Vec<Px> = vec![[0.0; 4]; w * h];
    data.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = [0.0; 3];
            for ky in 0..kernel.size {
                for kx in 0..kernel.size {
                    let kw = kernel.data[ky * kernel.size + kx];
                    let p = buf.clamped(x as i64 + kx as i64 - r, y as i64 + ky as i64 - r);
                    for c in 0..3 {
                        acc[c] += p[c] * kw;
                    }
                }
            }
            let a = buf.at(x, y)[3];
            *out = [acc[0] / divisor + offset, acc[1] / divisor + offset, acc[2] / divisor + offset, a];
        }
    });
    from_straight(src, Buffer { width: w, height: h, data })
}

/// Divisor used when the caller passes 0: the weight sum, or 1 if that is 0.
fn auto_divisor(kernel: &Kernel) -> f64 {
    let s = kernel.sum();
    if s.abs() < 1e-12 { 1.0 } else { s }
}

pub(super) fn filters() -> Vec<Result<Filter>> {
    vec![
        builtin(
            "blur",
            "Separable Gaussian blur, sigma = radius / 2",
            "blur 4",
            vec![FilterArg::int("radius", "blur radius in pixels", 0, 64, 2)],
            |img, a| blur(img, a.int("radius")? as usize),
        ),
        builtin(
            "sharpen",
            "3x3 sharpen kernel mixed with the source by amount",
            "sharpen 0.5",
            vec![FilterArg::float("amount", "mix with the sharpened image", 0.0, 1.0, 0.5)],
            |img, a| {
                let k = a.float("amount")?;
                let sharp = convolve(img, &Kernel::sharpen(), 1.0, 0.0)?;
                let mixed = img.clone();
                let top = straight(&sharp);
                mixed.process_parallel(|x, y, px| {
                    let t = top.at(x as usize, y as usize);
                    let lerp = |a: f64, b: f64| a + (b - a) * k;
                    Ok(RGBA64::new(lerp(px.r, t[0]), lerp(px.g, t[1]), lerp(px.b, t[2]), px.a))
                })?;
                Ok(mixed)
            },
        ),
        builtin(
            "convolution",
            "Arbitrary odd square kernel",
            "convolution [[0,0,0],[0,1,0],[0,0,0]] 0 0",
            vec![
                FilterArg::matrix("matrix", "square kernel with odd side"),
                FilterArg::float("divisor", "0 means the weight sum (or 1)", -1000.0, 1000.0, 0.0),
                FilterArg::float("offset", "added after division", -1.0, 1.0, 0.0),
            ],
            |img, a| {
                let kernel = Kernel::new(a.matrix("matrix")?)?;
                let divisor = match a.float("divisor")? {
                    d if d == 0.0 => auto_divisor(&kernel),
                    d => d,
                };
                convolve(img, &kernel, divisor, a.float("offset")?)
            },
        ),
        builtin(
            "enhance",
            "Pushes each pixel away from its 3x3 neighborhood mean",
            "enhance 0.5",
            vec![FilterArg::float("amount", "local contrast gain", -1.0, 1.0, 0.5)],
            |img, a| convolve(img, &Kernel::enhance(a.float("amount")?), 1.0, 0.0),
        ),
        builtin("edge_detect", "Laplacian edge detection", "edge_detect", vec![], |img, _| {
            convolve(img, &Kernel::edge_detect(), 1.0, 0.0)
        }),
        builtin("emboss", "Directional emboss", "emboss", vec![], |img, _| {
            convolve(img, &Kernel::emboss(), 1.0, 0.0)
        }),
    ]
}
