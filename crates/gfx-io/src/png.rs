//! PNG format support.
//!
//! Decodes 8- and 16-bit gray, gray+alpha, RGB and RGBA (palette and
//! sub-byte images are expanded to 8 bits first). Encodes RGBA at 8 bits by
//! default or 16 bits via [`PngOptions`].
//!
//! # Example
//!
//! ```rust,ignore
//! use gfx_io::png::{PngOptions, PngWriter};
//! use gfx_io::FormatWriter;
//!
//! let img = gfx_io::png::read("in.png")?;
//! PngWriter::with_options(PngOptions::sixteen_bit()).write("out.png", &img)?;
//! ```

use std::io::{BufReader, Cursor};
use std::path::Path;

use gfx_core::Image;
use tracing::debug;

use crate::traits::decoded_metadata;
use crate::{FormatReader, FormatWriter, IoError, IoResult};

/// Deflate effort for the PNG encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngCompression {
    /// Quick encode, larger files.
    Fast,
    /// The encoder's default trade-off.
    #[default]
    Balanced,
    /// Smallest files, slowest encode.
    High,
}

impl PngCompression {
    fn to_png(self) -> png::Compression {
        match self {
            Self::Fast => png::Compression::Fast,
            Self::Balanced => png::Compression::default(),
            Self::High => png::Compression::High,
        }
    }
}

/// PNG encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PngOptions {
    /// Write 16 bits per channel instead of 8.
    pub sixteen_bit: bool,
    /// Deflate effort.
    pub compression: PngCompression,
}

impl PngOptions {
    /// Default options with 16-bit output.
    pub fn sixteen_bit() -> Self {
        Self {
            sixteen_bit: true,
            ..Self::default()
        }
    }
}

/// PNG decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngReader;

impl PngReader {
    fn decode<R: std::io::BufRead + std::io::Seek>(&self, input: R) -> IoResult<Image> {
        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(png::Transformations::EXPAND);
        let mut reader = decoder.read_info().map_err(IoError::decode)?;
        let size = reader
            .output_buffer_size()
            .ok_or_else(|| IoError::decode("cannot determine output buffer size"))?;
        let mut buf = vec![0u8; size];
        let info = reader.next_frame(&mut buf).map_err(IoError::decode)?;
        let (w, h) = (info.width, info.height);
        let buf = &buf[..info.buffer_size()];
        debug!(w, h, color = ?info.color_type, depth = ?info.bit_depth, "png::decode");

        use png::{BitDepth, ColorType};
        let img = match (info.color_type, info.bit_depth) {
            (ColorType::Rgba, BitDepth::Eight) => Image::from_rgba8(w, h, buf)?,
            (ColorType::Rgb, BitDepth::Eight) => {
                let rgba: Vec<u8> = buf.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], 255]).collect();
                Image::from_rgba8(w, h, &rgba)?
            }
            (ColorType::Grayscale, BitDepth::Eight) => {
                let rgba: Vec<u8> = buf.iter().flat_map(|&g| [g, g, g, 255]).collect();
                Image::from_rgba8(w, h, &rgba)?
            }
            (ColorType::GrayscaleAlpha, BitDepth::Eight) => {
                let rgba: Vec<u8> = buf.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect();
                Image::from_rgba8(w, h, &rgba)?
            }
            (color, BitDepth::Sixteen) => {
                let s = bytes_to_u16(buf);
                let rgba: Vec<u16> = match color {
                    ColorType::Rgba => s,
                    ColorType::Rgb => s.chunks_exact(3).flat_map(|p| [p[0], p[1], p[2], u16::MAX]).collect(),
                    ColorType::Grayscale => s.iter().flat_map(|&g| [g, g, g, u16::MAX]).collect(),
                    ColorType::GrayscaleAlpha => s.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect(),
                    other => return Err(IoError::decode(format!("unsupported 16-bit color type {other:?}"))),
                };
                Image::from_rgba16(w, h, &rgba)?
            }
            (color, depth) => return Err(IoError::decode(format!("unsupported PNG layout {color:?} {depth:?}"))),
        };
        img.set_metadata(decoded_metadata(
            "PNG",
            format!("{:?} {:?}", info.color_type, info.bit_depth),
        ));
        Ok(img)
    }
}

impl FormatReader for PngReader {
    fn format_name(&self) -> &'static str {
        "PNG"
    }

    fn can_read(&self, header: &[u8]) -> bool {
        header.starts_with(&[0x89, b'P', b'N', b'G'])
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<Image> {
        self.decode(Cursor::new(data))
    }

    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<Image> {
        let path = path.as_ref();
        let img = self.decode(BufReader::new(std::fs::File::open(path)?))?;
        let mut meta = img.metadata();
        meta.source = Some(path.display().to_string());
        img.set_metadata(meta);
        Ok(img)
    }
}

/// PNG encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngWriter {
    options: PngOptions,
}

impl PngWriter {
    /// Writer with 8-bit defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer with custom options.
    pub fn with_options(options: PngOptions) -> Self {
        Self { options }
    }
}

impl FormatWriter for PngWriter {
    fn format_name(&self) -> &'static str {
        "PNG"
    }

    fn write_to_memory(&self, image: &Image) -> IoResult<Vec<u8>> {
        let (w, h) = image.dimensions();
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, w, h);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_compression(self.options.compression.to_png());
            encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);
            let data = if self.options.sixteen_bit {
                encoder.set_depth(png::BitDepth::Sixteen);
                image.to_rgba16().iter().flat_map(|v| v.to_be_bytes()).collect()
            } else {
                encoder.set_depth(png::BitDepth::Eight);
                image.to_rgba8()
            };
            let mut writer = encoder.write_header().map_err(IoError::encode)?;
            writer.write_image_data(&data).map_err(IoError::encode)?;
            writer.finish().map_err(IoError::encode)?;
        }
        debug!(w, h, sixteen_bit = self.options.sixteen_bit, bytes = out.len(), "png::encode");
        Ok(out)
    }
}

/// Reads a PNG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    PngReader.read(path)
}

/// Writes an 8-bit RGBA PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    PngWriter::new().write(path, image)
}

fn bytes_to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect()
}
