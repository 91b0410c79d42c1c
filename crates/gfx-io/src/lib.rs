//! # gfx-io
//!
//! PNG and JPEG reading and writing for [`gfx_core::Image`].
//!
//! - [`load`] / [`save`] - file I/O with format detection
//! - [`read_from_memory`] / [`write_to_memory`] - the same on byte buffers
//! - [`png`] / [`jpeg`] - format modules with their own options
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gfx_io::{load, save, Format};
//!
//! let img = load("input.png")?;
//! save("preview.jpg", &img, None)?;
//! save("no_extension", &img, Some(Format::Png))?;
//! ```
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Bit Depths | Notes |
//! |--------|------|-------|------------|-------|
//! | PNG | Yes | Yes | 8, 16 | Alpha preserved |
//! | JPEG | Yes | Yes | 8 (16 read) | Alpha flattened over white |
//!
//! Reading detects the format from magic bytes, falling back to the file
//! extension. Writing uses the extension unless a [`Format`] is given.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod format;
pub mod jpeg;
pub mod png;
mod traits;

use std::path::Path;

use gfx_core::Image;
use tracing::debug;

pub use error::{IoError, IoResult};
pub use format::Format;
pub use crate::jpeg::{JpegOptions, JpegReader, JpegWriter};
pub use crate::png::{PngCompression, PngOptions, PngReader, PngWriter};
pub use traits::{FormatReader, FormatWriter};

/// Reads an image file.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] if neither the header nor the extension
/// identifies PNG or JPEG; otherwise I/O or decode errors.
pub fn load<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = Format::detect(path)?;
    debug!(path = %path.display(), %format, "io::load");
    match format {
        Format::Png => PngReader.read(path),
        Format::Jpeg => JpegReader.read(path),
    }
}

/// Writes an image file.
///
/// With `format = None` the format comes from the extension (`.png`,
/// `.jpg`, `.jpeg`, any case). JPEG output uses the default quality.
pub fn save<P: AsRef<Path>>(path: P, image: &Image, format: Option<Format>) -> IoResult<()> {
    let path = path.as_ref();
    let format = match format {
        Some(f) => f,
        None => Format::for_path(path)?,
    };
    debug!(path = %path.display(), %format, "io::save");
    match format {
        Format::Png => PngWriter::new().write(path, image),
        Format::Jpeg => JpegWriter::new().write(path, image),
    }
}

/// Decodes an in-memory PNG or JPEG, sniffed from its magic bytes.
pub fn read_from_memory(data: &[u8]) -> IoResult<Image> {
    match Format::from_bytes(data) {
        Some(Format::Png) => PngReader.read_from_memory(data),
        Some(Format::Jpeg) => JpegReader.read_from_memory(data),
        None => Err(IoError::UnsupportedFormat("unrecognized header".into())),
    }
}

/// Encodes an image with default options for `format`.
pub fn write_to_memory(image: &Image, format: Format) -> IoResult<Vec<u8>> {
    match format {
        Format::Png => PngWriter::new().write_to_memory(image),
        Format::Jpeg => JpegWriter::new().write_to_memory(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfx_core::RGBA64;

    fn checker() -> Image {
        Image::from_fn(8, 8, |x, y| {
            if (x + y) % 2 == 0 {
                RGBA64::white()
            } else {
                RGBA64::new(0.0, 0.0, 1.0, 0.5)
            }
        })
        .unwrap()
    }

    #[test]
    fn test_save_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.PNG");
        save(&png, &checker(), None).unwrap();
        let back = load(&png).unwrap();
        assert_eq!(back.to_rgba8(), checker().to_rgba8());
        assert_eq!(back.metadata().get("format"), Some("PNG"));

        let jpg = dir.path().join("a.jpg");
        save(&jpg, &checker(), None).unwrap();
        let back = load(&jpg).unwrap();
        assert_eq!(back.dimensions(), (8, 8));
        assert_eq!(back.get_pixel(1, 0).unwrap().a, 1.0);
    }

    #[test]
    fn test_explicit_format_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.jpg");
        save(&path, &checker(), Some(Format::Png)).unwrap();
        assert_eq!(Format::detect(&path).unwrap(), Format::Png);
        assert_eq!(load(&path).unwrap().to_rgba8(), checker().to_rgba8());

        let bare = dir.path().join("noext");
        assert!(save(&bare, &checker(), None).unwrap_err().is_unsupported_format());
        save(&bare, &checker(), Some(Format::Jpeg)).unwrap();
        assert_eq!(Format::detect(&bare).unwrap(), Format::Jpeg);
    }

    #[test]
    fn test_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.gif");
        assert!(save(&path, &checker(), None).unwrap_err().is_unsupported_format());
        std::fs::write(&path, b"GIF89a").unwrap();
        assert!(load(&path).unwrap_err().is_unsupported_format());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(load("/nonexistent/gfx.png"), Err(IoError::Io(_))));
    }

    #[test]
    fn test_memory() {
        let png = write_to_memory(&checker(), Format::Png).unwrap();
        assert_eq!(Format::from_bytes(&png), Some(Format::Png));
        assert_eq!(read_from_memory(&png).unwrap(), read_from_memory(&png).unwrap());

        let jpg = write_to_memory(&checker(), Format::Jpeg).unwrap();
        assert_eq!(read_from_memory(&jpg).unwrap().dimensions(), (8, 8));

        assert!(read_from_memory(b"BM....").unwrap_err().is_unsupported_format());
        assert!(read_from_memory(&[]).unwrap_err().is_unsupported_format());
    }
}
