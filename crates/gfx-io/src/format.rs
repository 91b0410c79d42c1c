//! Format detection from magic bytes and file extensions.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{IoError, IoResult};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Portable Network Graphics.
    Png,
    /// JPEG/JFIF.
    Jpeg,
}

impl Format {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }

    /// Recognized file extensions, lowercase.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Png => &["png"],
            Self::Jpeg => &["jpg", "jpeg"],
        }
    }

    /// Format from the path extension, case-insensitive.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        [Self::Png, Self::Jpeg]
            .into_iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
    }

    /// Format from leading magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_MAGIC) {
            Some(Self::Png)
        } else if bytes.starts_with(&JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// Detects the format of an existing file: magic bytes first, then the
    /// extension.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let mut header = [0u8; 8];
        let n = File::open(path)?.read(&mut header)?;
        Self::from_bytes(&header[..n])
            .or_else(|| Self::from_extension(path))
            .ok_or_else(|| IoError::UnsupportedFormat(path.display().to_string()))
    }

    /// Format for writing `path`, from its extension.
    pub fn for_path<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        Self::from_extension(path).ok_or_else(|| {
            IoError::UnsupportedFormat(format!(
                "cannot infer format from '{}' (expected .png, .jpg or .jpeg)",
                path.display()
            ))
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("a.png"), Some(Format::Png));
        assert_eq!(Format::from_extension("a.PNG"), Some(Format::Png));
        assert_eq!(Format::from_extension("dir/a.JpEg"), Some(Format::Jpeg));
        assert_eq!(Format::from_extension("a.jpg"), Some(Format::Jpeg));
        assert_eq!(Format::from_extension("a.tif"), None);
        assert_eq!(Format::from_extension("noext"), None);
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(Format::from_bytes(&PNG_MAGIC), Some(Format::Png));
        assert_eq!(Format::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(Format::Jpeg));
        assert_eq!(Format::from_bytes(&[0x76, 0x2F, 0x31, 0x01]), None);
        assert_eq!(Format::from_bytes(&[0xFF]), None);
    }

    #[test]
    fn test_for_path() {
        assert!(Format::for_path("out.gif").unwrap_err().is_unsupported_format());
        assert!(Format::for_path("out").unwrap_err().is_unsupported_format());
        assert_eq!(Format::for_path("out.jpeg").unwrap(), Format::Jpeg);
    }
}
