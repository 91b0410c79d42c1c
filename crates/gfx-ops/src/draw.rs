//! Drawing primitives.
//!
//! Shapes are rasterized into a coverage mask first and every covered pixel
//! is blended exactly once, so overlapping brush stamps never double up.
//! A pixel whose blend fails is left unchanged.
//!
//! ```rust
//! use gfx_core::{Image, Rect, RGBA64};
//! use gfx_ops::draw::{self, Brush};
//!
//! let img = Image::filled(32, 32, RGBA64::white()).unwrap();
//! let pen = Brush::new(RGBA64::new(1.0, 0.0, 0.0, 1.0)).with_width(3);
//! draw::line(&img, 2, 2, 29, 20, &pen).unwrap();
//! draw::circle(&img, 16, 16, 10, Some(&pen), None).unwrap();
//! draw::rect(&img, Rect::new(4, 4, 8, 8), None, Some(&Brush::new(RGBA64::black()))).unwrap();
//! ```

use gfx_blend::{check_alpha, registry as blend_registry};
use gfx_core::{Error, Image, RGBA64, Rect, Result};
use rayon::prelude::*;
use tracing::trace;

/// Stroke and fill settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    /// Paint color.
    pub color: RGBA64,
    /// Side of the square stamp, in pixels.
    pub width: u32,
    /// Blend mode name.
    pub mode: String,
    /// Opacity in [0, 1].
    pub alpha: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: RGBA64::black(),
            width: 1,
            mode: "normal".into(),
            alpha: 1.0,
        }
    }
}

impl Brush {
    /// One pixel wide `normal` brush of the given color.
    pub fn new(color: RGBA64) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Sets the stamp width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Sets the blend mode.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Sets the opacity.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Coverage mask over an image.
///
/// Shapes are clipped to the canvas before they are walked, so the cost
/// follows the visible part of a shape rather than its full extent.
struct Mask {
    width: i128,
    height: i128,
    bits: Vec<bool>,
}

impl Mask {
    fn new(img: &Image) -> Self {
        let (w, h) = img.dimensions();
        Self {
            width: w as i128,
            height: h as i128,
            bits: vec![false; w as usize * h as usize],
        }
    }

    /// Marks `x0..=x1` on row `y`, clipped to the canvas.
    fn span(&mut self, y: i128, x0: i128, x1: i128) {
        if y < 0 || y >= self.height {
            return;
        }
        let (x0, x1) = (x0.max(0), x1.min(self.width - 1));
        if x0 > x1 {
            return;
        }
        let row = (y * self.width) as usize;
        self.bits[row + x0 as usize..=row + x1 as usize].fill(true);
    }

    /// Square stamp of side `size` centered on (x, y).
    fn stamp(&mut self, x: i128, y: i128, size: u32) {
        let lo = -((size as i128 - 1) / 2);
        let hi = lo + size as i128 - 1;
        let (y0, y1) = ((y + lo).max(0), (y + hi).min(self.height - 1));
        for row in y0..=y1 {
            self.span(row, x + lo, x + hi);
        }
    }

    /// Bresenham line: one stamp per step along the major axis, the minor
    /// coordinate rounded to the nearest pixel. Steps whose major coordinate
    /// falls outside the canvas plus half a stamp are skipped outright.
    fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, size: u32) {
        let (x0, y0, x1, y1) = (x0 as i128, y0 as i128, x1 as i128, y1 as i128);
        let (adx, ady) = ((x1 - x0).abs(), (y1 - y0).abs());
        let (sx, sy) = (if x1 < x0 { -1 } else { 1 }, if y1 < y0 { -1 } else { 1 });
        let x_major = adx >= ady;
        let (steps, minor, start, dir, limit) = if x_major {
            (adx, ady, x0, sx, self.width)
        } else {
            (ady, adx, y0, sy, self.height)
        };
        let pad = size as i128 / 2 + 1;
        let (lo, hi) = if dir > 0 {
            (-pad - start, limit + pad - 1 - start)
        } else {
            (start - limit - pad + 1, start + pad)
        };
        for k in lo.max(0)..=hi.min(steps) {
            let m = scale_round(k, minor, steps);
            let (x, y) = if x_major { (x0 + sx * k, y0 + sy * m) } else { (x0 + sx * m, y0 + sy * k) };
            self.stamp(x, y, size);
        }
    }

    /// Paints every covered pixel with `brush`.
    fn paint(&self, img: &Image, brush: &Brush) -> Result<()> {
        let mode = blend_registry::get(&brush.mode)?;
        let alpha = check_alpha(brush.alpha)?;
        let color = brush.color;
        img.with_pixels_mut(|w, _, pixels| {
            pixels
                .par_chunks_mut(w as usize)
                .zip(self.bits.par_chunks(w as usize))
                .for_each(|(row, mask)| {
                    for (px, _) in row.iter_mut().zip(mask).filter(|(_, m)| **m) {
                        if let Ok(out) = mode.blend(&RGBA64::from_u16(*px), &color, alpha) {
                            *px = out.to_u16();
                        }
                    }
                });
        });
        Ok(())
    }
}

fn check_width(brush: &Brush) -> Result<()> {
    if brush.width == 0 {
        return Err(Error::invalid_argument("brush width must be at least 1"));
    }
    Ok(())
}

/// `round(k * num / den)` for `0 <= k <= den`, `0 <= num <= den`, exact
/// for any span between two `i64` endpoints.
fn scale_round(k: i128, num: i128, den: i128) -> i128 {
    if den == 0 {
        return 0;
    }
    // Split `num` so no partial product exceeds 2^98.
    let (hi, lo) = (num >> 32, num & 0xffff_ffff);
    let a = k * hi;
    let b = ((a % den) << 32) + k * lo;
    let (q, r) = (((a / den) << 32) + b / den, b % den);
    if 2 * r >= den { q + 1 } else { q }
}

/// Largest `s` with `s * s <= n`.
fn isqrt(n: i128) -> i128 {
    let mut s = (n as f64).sqrt() as i128;
    while s * s > n {
        s -= 1;
    }
    while (s + 1) * (s + 1) <= n {
        s += 1;
    }
    s
}

/// Values of `t >= 0` for which `c + t` or `c - t` lies within `[-pad, len + pad)`.
fn visible_offsets(c: i128, len: i128, pad: i128) -> [(i128, i128); 2] {
    [(-pad - c, len + pad - 1 - c), (c - len - pad + 1, c + pad)]
}

/// Bresenham line from (x0, y0) to (x1, y1), both ends included.
pub fn line(img: &Image, x0: i64, y0: i64, x1: i64, y1: i64, brush: &Brush) -> Result<()> {
    check_width(brush)?;
    trace!(x0, y0, x1, y1, width = brush.width, "draw::line");
    let mut mask = Mask::new(img);
    mask.line(x0, y0, x1, y1, brush.width);
    mask.paint(img, brush)
}

/// Rectangle with an optional outline and an optional fill.
///
/// The fill is painted first, then the four edges.
pub fn rect(img: &Image, area: Rect, stroke: Option<&Brush>, fill: Option<&Brush>) -> Result<()> {
    if area.is_empty() {
        return Err(Error::invalid_argument(format!(
            "rectangle {}x{} has no area",
            area.width, area.height
        )));
    }
    trace!(x = area.x, y = area.y, width = area.width, height = area.height, "draw::rect");
    let (x0, y0, x1, y1) = (area.x, area.y, area.right() - 1, area.bottom() - 1);
    if let Some(fill) = fill {
        let mut mask = Mask::new(img);
        if let Some(clip) = area.intersect(&img.bounds()) {
            for y in clip.y..clip.bottom() {
                mask.span(y as i128, clip.x as i128, clip.right() as i128 - 1);
            }
        }
        mask.paint(img, fill)?;
    }
    if let Some(stroke) = stroke {
        check_width(stroke)?;
        let mut mask = Mask::new(img);
        let s = stroke.width;
        mask.line(x0, y0, x1, y0, s);
        mask.line(x1, y0, x1, y1, s);
        mask.line(x1, y1, x0, y1, s);
        mask.line(x0, y1, x0, y0, s);
        mask.paint(img, stroke)?;
    }
    Ok(())
}

/// Circle of `radius` around (cx, cy): midpoint outline and/or disc fill.
pub fn circle(img: &Image, cx: i64, cy: i64, radius: u32, stroke: Option<&Brush>, fill: Option<&Brush>) -> Result<()> {
    if radius == 0 {
        return Err(Error::invalid_argument("circle radius must be at least 1"));
    }
    trace!(cx, cy, radius, "draw::circle");
    let (cx, cy, r) = (cx as i128, cy as i128, radius as i128);
    if let Some(fill) = fill {
        let mut mask = Mask::new(img);
        for y in (cy - r).max(0)..=(cy + r).min(mask.height - 1) {
            let half = isqrt(r * r - (y - cy) * (y - cy));
            mask.span(y, cx - half, cx + half);
        }
        mask.paint(img, fill)?;
    }
    if let Some(stroke) = stroke {
        check_width(stroke)?;
        let mut mask = Mask::new(img);
        let pad = stroke.width as i128 / 2 + 1;
        // Octant walk over t; each of the eight mirrored points has one
        // coordinate at c +/- t, so only t near the canvas can paint.
        let mut ranges = visible_offsets(cy, mask.height, pad).to_vec();
        ranges.extend(visible_offsets(cx, mask.width, pad));
        for (lo, hi) in ranges {
            for t in lo.max(0)..=hi.min(r) {
                // Midpoint criterion: (x - 1/2)^2 + t^2 <= r^2.
                let x = (isqrt(4 * (r * r - t * t)) + 1) / 2;
                if t > x {
                    break;
                }
                for (px, py) in [(x, t), (t, x), (-t, x), (-x, t), (-x, -t), (-t, -x), (t, -x), (x, -t)] {
                    mask.stamp(cx + px, cy + py, stroke.width);
                }
            }
        }
        mask.paint(img, stroke)?;
    }
    Ok(())
}

/// Draws `src` onto `dst` with its top-left corner at (x, y).
///
/// The draw is clipped to `dst`; fully transparent source pixels are
/// skipped.
pub fn blit(dst: &Image, src: &Image, x: i64, y: i64, mode: &str, alpha: f64) -> Result<()> {
    let mode = blend_registry::get(mode)?;
    let alpha = check_alpha(alpha)?;
    let (sw, sh) = src.dimensions();
    let Some(area) = dst.bounds().intersect(&Rect::new(x, y, sw, sh)) else {
        return Ok(());
    };
    trace!(x, y, sw, sh, mode = mode.name(), "draw::blit");
    // Snapshot first: `src` may be `dst`.
    let top = src.view(|v| v.as_slice().to_vec());
    dst.with_pixels_mut(|w, _, pixels| {
        pixels
            .par_chunks_mut(w as usize)
            .enumerate()
            .skip(area.y as usize)
            .take(area.height as usize)
            .for_each(|(dy, row)| {
                let sy = (dy as i64 - y) as usize;
                for dx in area.x..area.right() {
                    let s = top[sy * sw as usize + (dx - x) as usize];
                    if s[3] == 0 {
                        continue;
                    }
                    let px = &mut row[dx as usize];
                    if let Ok(out) = mode.blend(&RGBA64::from_u16(*px), &RGBA64::from_u16(s), alpha) {
                        *px = out.to_u16();
                    }
                }
            });
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Image {
        Image::filled(20, 20, RGBA64::white()).unwrap()
    }

    fn is_black(img: &Image, x: u32, y: u32) -> bool {
        img.get_pixel(x, y).unwrap().to_u8() == [0, 0, 0, 255]
    }

    #[test]
    fn test_line_endpoints_and_width() {
        let img = canvas();
        line(&img, 2, 3, 12, 3, &Brush::default().with_width(3)).unwrap();
        assert!(is_black(&img, 2, 3));
        assert!(is_black(&img, 12, 3));
        assert!(is_black(&img, 7, 2));
        assert!(is_black(&img, 7, 4));
        assert!(!is_black(&img, 7, 5));
        assert!(!is_black(&img, 14, 3));
    }

    #[test]
    fn test_diagonal_line() {
        let img = canvas();
        line(&img, 0, 0, 5, 5, &Brush::default()).unwrap();
        for i in 0..=5 {
            assert!(is_black(&img, i, i));
        }
        assert!(!is_black(&img, 1, 0));
    }

    #[test]
    fn test_overlapping_stamps_blend_once() {
        let img = canvas();
        let brush = Brush::default().with_width(5).with_alpha(0.5);
        line(&img, 5, 5, 10, 5, &brush).unwrap();
        let a = img.get_pixel(7, 5).unwrap().to_u8()[0];
        let b = img.get_pixel(5, 7).unwrap().to_u8()[0];
        assert_eq!(a, b);
        assert!((126..=128).contains(&a), "{a}");
    }

    #[test]
    fn test_rect_fill_and_outline() {
        let img = canvas();
        let red = Brush::new(RGBA64::new(1.0, 0.0, 0.0, 1.0));
        rect(&img, Rect::new(2, 2, 6, 4), Some(&Brush::default()), Some(&red)).unwrap();
        assert!(is_black(&img, 2, 2));
        assert!(is_black(&img, 7, 5));
        assert_eq!(img.get_pixel(4, 3).unwrap().to_u8(), [255, 0, 0, 255]);
        assert!(!is_black(&img, 8, 2));
        assert!(rect(&img, Rect::new(0, 0, 0, 3), None, None).is_err());
    }

    #[test]
    fn test_circle() {
        let img = canvas();
        circle(&img, 10, 10, 5, Some(&Brush::default()), None).unwrap();
        assert!(is_black(&img, 15, 10));
        assert!(is_black(&img, 10, 5));
        assert!(!is_black(&img, 10, 10));
        let filled = canvas();
        circle(&filled, 10, 10, 5, None, Some(&Brush::default())).unwrap();
        assert!(is_black(&filled, 10, 10));
        assert!(is_black(&filled, 13, 14));
        assert!(!is_black(&filled, 14, 14));
    }

    #[test]
    fn test_shapes_clip_to_canvas() {
        let small = Image::filled(4, 4, RGBA64::white()).unwrap();
        let fill = Brush::default();
        rect(&small, Rect::new(-20_000_000, -20_000_000, 40_000_000, 40_000_000), None, Some(&fill)).unwrap();
        assert!((0..4).all(|y| (0..4).all(|x| is_black(&small, x, y))));

        let ring = Image::filled(4, 4, RGBA64::white()).unwrap();
        circle(&ring, 2, 2, u32::MAX, Some(&fill), Some(&Brush::new(RGBA64::new(1.0, 0.0, 0.0, 1.0)))).unwrap();
        assert_eq!(ring.get_pixel(0, 0).unwrap().to_u8(), [255, 0, 0, 255]);

        let far = canvas();
        line(&far, -1_000_000_000_000, 10, 1_000_000_000_000, 10, &fill).unwrap();
        assert!((0..20).all(|x| is_black(&far, x, 10)));
        assert!(!is_black(&far, 0, 9));
        line(&far, i64::MIN, i64::MIN, i64::MAX, i64::MAX, &fill).unwrap();
        assert!(is_black(&far, 0, 0));
        assert!(is_black(&far, 19, 19));
    }

    #[test]
    fn test_circle_outline_partly_off_canvas() {
        let img = canvas();
        circle(&img, 0, 0, 10, Some(&Brush::default()), None).unwrap();
        assert!(is_black(&img, 10, 0));
        assert!(is_black(&img, 0, 10));
        assert!(is_black(&img, 7, 7));
        assert!(!is_black(&img, 3, 3));
    }

    #[test]
    fn test_unknown_mode() {
        let err = line(&canvas(), 0, 0, 1, 1, &Brush::default().with_mode("sparkle")).unwrap_err();
        assert!(err.is_unknown_name());
    }

    #[test]
    fn test_blit_clips_and_skips_transparent() {
        let dst = canvas();
        let src = Image::from_fn(4, 4, |x, _| if x == 0 { RGBA64::transparent() } else { RGBA64::black() }).unwrap();
        blit(&dst, &src, 18, -2, "normal", 1.0).unwrap();
        assert!(!is_black(&dst, 18, 0));
        assert!(is_black(&dst, 19, 0));
        assert!(is_black(&dst, 19, 1));
        assert!(!is_black(&dst, 19, 2));
        blit(&dst, &src, 100, 100, "normal", 1.0).unwrap();
    }
}
