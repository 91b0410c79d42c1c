//! Premultiplied float buffers for resampling.
//!
//! Interpolating premultiplied values keeps transparent neighbors from
//! bleeding their (meaningless) color into the result.

use gfx_core::{Image, RGBA64, Result};

/// Premultiplied sRGB RGBA.
pub(crate) type Px = [f64; 4];

pub(crate) const CLEAR: Px = [0.0; 4];

pub(crate) struct Buffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Px>,
}

impl Buffer {
    pub fn from_image(img: &Image) -> Self {
        img.view(|v| Self {
            width: v.width() as usize,
            height: v.height() as usize,
            data: v
                .as_slice()
                .iter()
                .map(|p| RGBA64::from_u16(*p).premultiply().to_array())
                .collect(),
        })
    }

    pub fn into_image(self) -> Result<Image> {
        let w = self.width;
        Image::from_fn(self.width as u32, self.height as u32, |x, y| {
            unpack(self.data[y as usize * w + x as usize])
        })
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Px {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn clamped(&self, x: i64, y: i64) -> Px {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        self.at(cx, cy)
    }

    /// Bilinear sample at index coordinates (pixel centers on integers),
    /// clamping at the edges.
    pub fn bilinear(&self, fx: f64, fy: f64) -> Px {
        let x0 = fx.floor();
        let y0 = fy.floor();
        let (tx, ty) = (fx - x0, fy - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);
        let p00 = self.clamped(x0, y0);
        let p10 = self.clamped(x0 + 1, y0);
        let p01 = self.clamped(x0, y0 + 1);
        let p11 = self.clamped(x0 + 1, y0 + 1);
        let mut out = CLEAR;
        for c in 0..4 {
            let top = p00[c] + (p10[c] - p00[c]) * tx;
            let bottom = p01[c] + (p11[c] - p01[c]) * tx;
            out[c] = top + (bottom - top) * ty;
        }
        out
    }

    /// Bilinear sample at continuous coordinates (pixel centers on `i + 0.5`).
    /// `None` outside the image rectangle.
    pub fn sample(&self, sx: f64, sy: f64) -> Option<Px> {
        if !(0.0..=self.width as f64).contains(&sx) || !(0.0..=self.height as f64).contains(&sy) {
            return None;
        }
        Some(self.bilinear(sx - 0.5, sy - 0.5))
    }
}

/// Premultiplied sRGB array back to a pixel.
#[inline]
pub(crate) fn unpack(p: Px) -> RGBA64 {
    RGBA64 {
        r: p[0],
        g: p[1],
        b: p[2],
        a: p[3],
        linear: false,
        premultiplied: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bilinear_midpoint() {
        let img = Image::from_fn(2, 1, |x, _| if x == 0 { RGBA64::black() } else { RGBA64::white() }).unwrap();
        let buf = Buffer::from_image(&img);
        assert_abs_diff_eq!(buf.bilinear(0.5, 0.0)[0], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(buf.bilinear(-3.0, 0.0)[0], 0.0, epsilon = 1e-9);
        assert!(buf.sample(2.5, 0.5).is_none());
    }

    #[test]
    fn test_roundtrip_exact() {
        let img = Image::from_fn(3, 2, |x, y| RGBA64::new(x as f64 / 3.0, y as f64 / 2.0, 0.3, 0.6)).unwrap();
        assert_eq!(Buffer::from_image(&img).into_image().unwrap(), img);
    }
}
