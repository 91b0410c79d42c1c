//! Reader and writer traits implemented by each format.

use std::path::Path;

use gfx_core::{Image, Metadata};

use crate::IoResult;

/// A format that can decode into an [`Image`].
pub trait FormatReader {
    /// Format name, e.g. `"PNG"`.
    fn format_name(&self) -> &'static str;

    /// Returns `true` if `header` starts with this format's signature.
    fn can_read(&self, header: &[u8]) -> bool;

    /// Decodes an in-memory file.
    fn read_from_memory(&self, data: &[u8]) -> IoResult<Image>;

    /// Reads and decodes a file; the path is recorded as the image source.
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<Image> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let img = self.read_from_memory(&data)?;
        let mut meta = img.metadata();
        meta.source = Some(path.display().to_string());
        meta.attributes.insert("format".into(), self.format_name().into());
        img.set_metadata(meta);
        Ok(img)
    }
}

/// A format that can encode an [`Image`].
pub trait FormatWriter {
    /// Format name, e.g. `"JPEG"`.
    fn format_name(&self) -> &'static str;

    /// Encodes to a byte vector.
    fn write_to_memory(&self, image: &Image) -> IoResult<Vec<u8>>;

    /// Encodes and writes a file.
    fn write<P: AsRef<Path>>(&self, path: P, image: &Image) -> IoResult<()> {
        let data = self.write_to_memory(image)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }
}

/// Metadata stamped on freshly decoded images.
pub(crate) fn decoded_metadata(format: &str, detail: String) -> Metadata {
    let mut meta = Metadata::default();
    meta.attributes.insert("format".into(), format.into());
    meta.attributes.insert("decoded".into(), detail);
    meta
}
