//! JPEG format support.
//!
//! Decodes RGB, 8- and 16-bit grayscale and CMYK baseline/progressive JPEGs.
//! Encodes RGB at a configurable quality; alpha is flattened over opaque
//! white since JPEG cannot store it.
//!
//! # Example
//!
//! ```rust,ignore
//! use gfx_io::jpeg::{JpegOptions, JpegWriter};
//! use gfx_io::FormatWriter;
//!
//! let writer = JpegWriter::with_options(JpegOptions { quality: 95 })?;
//! writer.write("preview.jpg", &img)?;
//! ```

use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use gfx_core::{Error, Image, RGBA64};
use tracing::debug;

use crate::traits::decoded_metadata;
use crate::{FormatReader, FormatWriter, IoError, IoResult};

/// Default encoder quality.
pub const DEFAULT_QUALITY: u8 = 90;

/// JPEG encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// Quality 1 (smallest) to 100 (best).
    pub quality: u8,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

impl JpegOptions {
    /// Checks that quality lies in 1..=100.
    pub fn validate(&self) -> IoResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(Error::invalid_argument(format!("JPEG quality must be 1..=100, got {}", self.quality)).into());
        }
        Ok(())
    }
}

/// JPEG decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegReader;

impl JpegReader {
    fn decode<R: Read>(&self, input: R) -> IoResult<Image> {
        let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(input));
        let pixels = decoder.decode().map_err(IoError::decode)?;
        let info = decoder.info().ok_or_else(|| IoError::decode("missing JPEG info"))?;
        let (w, h) = (info.width as u32, info.height as u32);
        debug!(w, h, format = ?info.pixel_format, "jpeg::decode");

        use jpeg_decoder::PixelFormat;
        let img = match info.pixel_format {
            PixelFormat::RGB24 => {
                let rgba: Vec<u8> = pixels.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect();
                Image::from_rgba8(w, h, &rgba)?
            }
            PixelFormat::L8 => {
                let rgba: Vec<u8> = pixels.iter().flat_map(|&g| [g, g, g, 255]).collect();
                Image::from_rgba8(w, h, &rgba)?
            }
            PixelFormat::L16 => {
                let rgba: Vec<u16> = pixels
                    .chunks_exact(2)
                    .flat_map(|c| {
                        let g = u16::from_be_bytes([c[0], c[1]]);
                        [g, g, g, u16::MAX]
                    })
                    .collect();
                Image::from_rgba16(w, h, &rgba)?
            }
            PixelFormat::CMYK32 => Image::from_fn(w, h, |x, y| {
                let i = (y as usize * w as usize + x as usize) * 4;
                let [c, m, ye, k] = [0, 1, 2, 3].map(|j| pixels[i + j] as f64 / 255.0);
                RGBA64::new((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - ye) * (1.0 - k), 1.0)
            })?,
        };
        img.set_metadata(decoded_metadata("JPEG", format!("{:?}", info.pixel_format)));
        Ok(img)
    }
}

impl FormatReader for JpegReader {
    fn format_name(&self) -> &'static str {
        "JPEG"
    }

    fn can_read(&self, header: &[u8]) -> bool {
        header.starts_with(&[0xFF, 0xD8, 0xFF])
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<Image> {
        self.decode(Cursor::new(data))
    }
}

/// JPEG encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegWriter {
    options: JpegOptions,
}

impl JpegWriter {
    /// Writer at the default quality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with custom options.
    ///
    /// # Errors
    ///
    /// [`IoError::Core`] with an invalid-argument error if quality is
    /// outside 1..=100.
    pub fn with_options(options: JpegOptions) -> IoResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }
}

/// Straight RGBA8 flattened over opaque white, as packed RGB.
fn flatten_over_white(image: &Image) -> Vec<u8> {
    image
        .to_rgba8()
        .chunks_exact(4)
        .flat_map(|p| {
            let a = p[3] as u32;
            let over = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
            [over(p[0]), over(p[1]), over(p[2])]
        })
        .collect()
}

impl FormatWriter for JpegWriter {
    fn format_name(&self) -> &'static str {
        "JPEG"
    }

    fn write_to_memory(&self, image: &Image) -> IoResult<Vec<u8>> {
        self.options.validate()?;
        let (w, h) = image.dimensions();
        let (w16, h16) = match (u16::try_from(w), u16::try_from(h)) {
            (Ok(a), Ok(b)) => (a, b),
            _ => return Err(IoError::EncodeError(format!("{w}x{h} exceeds the JPEG limit of 65535"))),
        };
        let rgb = flatten_over_white(image);
        let mut out = Vec::new();
        jpeg_encoder::Encoder::new(&mut out, self.options.quality)
            .encode(&rgb, w16, h16, jpeg_encoder::ColorType::Rgb)
            .map_err(IoError::encode)?;
        debug!(w, h, quality = self.options.quality, bytes = out.len(), "jpeg::encode");
        Ok(out)
    }
}

/// Reads a JPEG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    JpegReader.read(path)
}

/// Writes a JPEG file at the default quality.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    JpegWriter::new().write(path, image)
}
