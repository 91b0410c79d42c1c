//! Geometric transforms.
//!
//! Every operation returns a new image carrying the source metadata plus a
//! `transform.*` annotation.
//!
//! - [`crop`] - extract a region
//! - [`rotate`] - arbitrary angle, bilinear, grows the canvas
//! - [`flip_h`] / [`flip_v`] - mirrors
//! - [`translate`] / [`translate_wrap`] - integer shifts
//! - [`crop_circle`] - clear everything outside a circle
//! - [`to_polar`] - wrap the image around its center
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//! use gfx_ops::transform::{rotate, flip_h, flip_v};
//!
//! let img = Image::from_fn(5, 3, |x, y| RGBA64::gray((x + y) as f64 / 6.0)).unwrap();
//! assert_eq!(rotate(&img, 90.0).unwrap().dimensions(), (3, 5));
//! assert_eq!(rotate(&img, 180.0).unwrap(), flip_v(&flip_h(&img).unwrap()).unwrap());
//! ```

use gfx_core::{Error, Image, Rect, Result};
use glam::DVec2;
use rayon::prelude::*;
use tracing::trace;

use crate::sample::{Buffer, CLEAR};

/// Copies metadata from `src` into `out` and records one annotation.
pub(crate) fn inherit(src: &Image, out: Image, key: &str, value: impl Into<String>) -> Image {
    out.set_metadata(src.metadata());
    out.annotate(key, value);
    out
}

/// Snaps values within 1e-12 of -1, 0 or 1.
#[inline]
fn snap(v: f64) -> f64 {
    for t in [-1.0, 0.0, 1.0] {
        if (v - t).abs() < 1e-12 {
            return t;
        }
    }
    v
}

/// Extracts the region `(x, y, width, height)`.
///
/// # Errors
///
/// InvalidRegion if the region is empty or not fully inside the image.
pub fn crop(src: &Image, x: i64, y: i64, width: u32, height: u32) -> Result<Image> {
    let (sw, sh) = src.dimensions();
    let region = Rect::new(x, y, width, height);
    if region.is_empty() || !src.bounds().contains_rect(&region) {
        return Err(Error::invalid_region(x, y, width, height, sw, sh));
    }
    trace!(x, y, width, height, "transform::crop");
    let pixels = src.view(|v| {
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for row in y as u32..y as u32 + height {
            let start = row as usize * sw as usize + x as usize;
            out.extend_from_slice(&v.as_slice()[start..start + width as usize]);
        }
        out
    });
    let out = Image::from_raw(width, height, pixels)?;
    Ok(inherit(src, out, "transform.crop", format!("{x},{y},{width},{height}")))
}

/// Output canvas size for a rotation by `degrees`.
pub fn rotated_size(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let t = degrees.to_radians();
    let (s, c) = (snap(t.sin()).abs(), snap(t.cos()).abs());
    let (w, h) = (width as f64, height as f64);
    let nw = (w * c + h * s - 1e-9).ceil().max(1.0);
    let nh = (w * s + h * c - 1e-9).ceil().max(1.0);
    (nw as u32, nh as u32)
}

/// Rotates counter-clockwise by `degrees` about the image center.
///
/// The canvas grows to hold the whole rotated image; uncovered pixels are
/// transparent. Sampling is bilinear with pixel centers on `i + 0.5`.
pub fn rotate(src: &Image, degrees: f64) -> Result<Image> {
    if !degrees.is_finite() {
        return Err(Error::invalid_argument(format!("rotation angle must be finite, got {degrees}")));
    }
    let (sw, sh) = src.dimensions();
    let (nw, nh) = rotated_size(sw, sh, degrees);
    trace!(sw, sh, nw, nh, degrees, "transform::rotate");

    let t = degrees.to_radians();
    let (sin, cos) = (snap(t.sin()), snap(t.cos()));
    let buf = Buffer::from_image(src);
    let src_center = DVec2::new(sw as f64, sh as f64) * 0.5;
    let dst_center = DVec2::new(nw as f64, nh as f64) * 0.5;

    let mut data = vec![CLEAR; nw as usize * nh as usize];
    data.par_chunks_mut(nw as usize).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            // Inverse rotation; y grows downward so the visual turn is counter-clockwise.
            let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - dst_center;
            let s = DVec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y) + src_center;
            *out = buf.sample(s.x, s.y).unwrap_or(CLEAR);
        }
    });
    let out = Buffer {
        width: nw as usize,
        height: nh as usize,
        data,
    }
    .into_image()?;
    Ok(inherit(src, out, "transform.rotate", degrees.to_string()))
}

fn remap(src: &Image, key: &str, value: String, map: impl Fn(u32, u32, u32, u32) -> Option<(u32, u32)> + Sync) -> Result<Image> {
    let (w, h) = src.dimensions();
    let pixels = src.view(|v| {
        let mut out = vec![[0u16; 4]; w as usize * h as usize];
        out.par_chunks_mut(w as usize).enumerate().for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                if let Some((sx, sy)) = map(x as u32, y as u32, w, h) {
                    *px = v.raw(sx, sy);
                }
            }
        });
        out
    });
    let out = Image::from_raw(w, h, pixels)?;
    Ok(inherit(src, out, key, value))
}

/// Mirrors left to right.
pub fn flip_h(src: &Image) -> Result<Image> {
    trace!("transform::flip_h");
    remap(src, "transform.flip", "horizontal".into(), |x, y, w, _| Some((w - 1 - x, y)))
}

/// Mirrors top to bottom.
pub fn flip_v(src: &Image) -> Result<Image> {
    trace!("transform::flip_v");
    remap(src, "transform.flip", "vertical".into(), |x, y, _, h| Some((x, h - 1 - y)))
}

/// Shifts content by (dx, dy). Exposed pixels are transparent.
pub fn translate(src: &Image, dx: i64, dy: i64) -> Result<Image> {
    trace!(dx, dy, "transform::translate");
    remap(src, "transform.translate", format!("{dx},{dy}"), |x, y, w, h| {
        let sx = x as i64 - dx;
        let sy = y as i64 - dy;
        (sx >= 0 && sy >= 0 && sx < w as i64 && sy < h as i64).then(|| (sx as u32, sy as u32))
    })
}

/// Shifts content by (dx, dy), wrapping around the edges.
pub fn translate_wrap(src: &Image, dx: i64, dy: i64) -> Result<Image> {
    trace!(dx, dy, "transform::translate_wrap");
    remap(src, "transform.translate", format!("{dx},{dy} wrap"), |x, y, w, h| {
        let sx = (x as i64 - dx).rem_euclid(w as i64);
        let sy = (y as i64 - dy).rem_euclid(h as i64);
        Some((sx as u32, sy as u32))
    })
}

/// Keeps the disc of `radius * max(w, h)` pixels around the offset center
/// and clears everything outside it. The canvas size is unchanged.
///
/// Offsets are fractions of the half size: `(0, 0)` is the image center,
/// `(1, 1)` the bottom-right corner.
///
/// # Errors
///
/// InvalidArgument if `radius` is negative or an offset is outside [-1, 1].
pub fn crop_circle(src: &Image, radius: f64, offset_x: f64, offset_y: f64) -> Result<Image> {
    if !(radius >= 0.0 && radius.is_finite()) {
        return Err(Error::invalid_argument(format!("circle radius must be non-negative, got {radius}")));
    }
    if !(-1.0..=1.0).contains(&offset_x) || !(-1.0..=1.0).contains(&offset_y) {
        return Err(Error::invalid_argument(format!(
            "circle offset ({offset_x}, {offset_y}) outside [-1, 1]"
        )));
    }
    trace!(radius, offset_x, offset_y, "transform::crop_circle");
    let (w, h) = src.dimensions();
    let (hw, hh) = (w as f64 / 2.0, h as f64 / 2.0);
    let (cx, cy) = ((hw + offset_x * hw) as i128, (hh + offset_y * hh) as i128);
    let r = (radius * w.max(h) as f64) as i128;
    remap(src, "transform.crop_circle", format!("{radius},{offset_x},{offset_y}"), |x, y, _, _| {
        let (dx, dy) = (x as i128 - cx, y as i128 - cy);
        (dx * dx + dy * dy <= r * r).then_some((x, y))
    })
}

/// Wraps the image around its center: source columns become angles and
/// source rows become distance from the center.
///
/// Angles are degrees in [0, 360], measured clockwise from the +X axis
/// (Y grows downward). When `angle_end < angle_start` the sweep crosses
/// 0 degrees; equal angles sweep the full turn. Pixels outside the sweep are
/// transparent. `rotation` turns the result and `fisheye` bends the radius
/// as `r^(1 / (1 + fisheye))`.
///
/// # Errors
///
/// InvalidArgument for angles outside [0, 360] or `fisheye <= -1`.
pub fn to_polar(src: &Image, angle_start: f64, angle_end: f64, rotation: f64, fisheye: f64) -> Result<Image> {
    for (name, v) in [("start", angle_start), ("end", angle_end)] {
        if !(0.0..=360.0).contains(&v) {
            return Err(Error::invalid_argument(format!("polar {name} angle {v} outside [0, 360]")));
        }
    }
    if !rotation.is_finite() || !(fisheye > -1.0 && fisheye.is_finite()) {
        return Err(Error::invalid_argument(format!(
            "polar rotation {rotation} / fisheye {fisheye} out of range"
        )));
    }
    trace!(angle_start, angle_end, rotation, fisheye, "transform::to_polar");
    let span = match angle_end - angle_start {
        d if d > 0.0 => d,
        d if d < 0.0 => 360.0 + d,
        _ => 360.0,
    };
    let (sin, cos) = rotation.to_radians().sin_cos();
    let value = format!("{angle_start},{angle_end},{rotation},{fisheye}");
    remap(src, "transform.to_polar", value, |x, y, w, h| {
        let center = DVec2::new(w as f64 / 2.0, h as f64 / 2.0);
        let max_r = center.x.min(center.y);
        let t = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - center;
        let d = DVec2::new(cos * t.x + sin * t.y, -sin * t.x + cos * t.y);
        let mut norm = d.length() / max_r;
        if fisheye != 0.0 {
            norm = norm.powf(1.0 / (1.0 + fisheye));
        }
        let theta = d.y.atan2(d.x).to_degrees().rem_euclid(360.0);
        let sweep = (theta - angle_start).rem_euclid(360.0);
        if sweep > span {
            return None;
        }
        let sx = ((sweep / span) * (w - 1) as f64) as u32;
        let sy = (norm * (h - 1) as f64).min((h - 1) as f64) as u32;
        Some((sx.min(w - 1), sy))
    })
}
