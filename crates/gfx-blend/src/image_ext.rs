//! Image-level blending.

use gfx_core::{Error, Image, RGBA64, Result};
use tracing::debug;

use crate::mode::check_alpha;
use crate::registry;

/// Blends whole images through a named mode.
pub trait ImageBlendExt {
    /// Blends `top` onto `self` in place.
    ///
    /// Both images must have the same dimensions. Rows are processed in
    /// parallel and every result pixel is stored back as straight sRGB.
    ///
    /// # Errors
    ///
    /// UnknownName for an unregistered mode, InvalidArgument for a bad alpha
    /// or mismatched sizes.
    fn blend(&self, top: &Image, mode: &str, alpha: f64) -> Result<()>;
}

impl ImageBlendExt for Image {
    fn blend(&self, top: &Image, mode: &str, alpha: f64) -> Result<()> {
        let blend_mode = registry::get(mode)?;
        check_alpha(alpha)?;
        let (w, h) = self.dimensions();
        let (tw, th) = top.dimensions();
        if (w, h) != (tw, th) {
            return Err(Error::invalid_argument(format!(
                "cannot blend {tw}x{th} onto {w}x{h}: sizes differ"
            )));
        }
        debug!(width = w, height = h, mode, alpha, "blend::image");
        // Snapshot first so blending an image onto itself does not deadlock.
        let src = top.view(|v| v.as_slice().to_vec());
        self.process_parallel(|x, y, px| {
            let t = RGBA64::from_u16(src[y as usize * w as usize + x as usize]);
            blend_mode.blend(&px, &t, alpha)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_multiply() {
        let bottom = Image::filled(4, 3, RGBA64::white()).unwrap();
        let top = Image::filled(4, 3, RGBA64::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        bottom.blend(&top, "multiply", 1.0).unwrap();
        assert_eq!(bottom.get_pixel(3, 2).unwrap().to_u8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_size_mismatch() {
        let a = Image::new(4, 4).unwrap();
        let b = Image::new(4, 5).unwrap();
        assert!(a.blend(&b, "normal", 1.0).unwrap_err().is_invalid_argument());
        assert!(a.blend(&a.clone(), "nope", 1.0).unwrap_err().is_unknown_name());
    }

    #[test]
    fn test_self_blend() {
        let img = Image::filled(2, 2, RGBA64::gray(0.5)).unwrap();
        img.blend(&img, "screen", 1.0).unwrap();
        assert_eq!(img.get_pixel(0, 0).unwrap().to_u8()[0], 191);
    }
}
