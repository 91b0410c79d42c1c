//! Image buffer with shared-state locking and per-pixel processors.
//!
//! [`Image`] stores a W x H grid of straight-alpha sRGB pixels at 16 bits per
//! channel together with free-form [`Metadata`]. Pixels enter and leave the
//! buffer as [`RGBA64`]; quantization to 16 bits happens on every store.
//!
//! # Memory Layout
//!
//! Pixels are stored row-major, top-to-bottom, one `[u16; 4]` per pixel:
//!
//! ```text
//! [RGBA RGBA RGBA ...]  <- Row 0
//! [RGBA RGBA RGBA ...]  <- Row 1
//! ```
//!
//! # Concurrency
//!
//! The buffer sits behind one `RwLock`. Readers ([`Image::width`],
//! [`Image::get_pixel`], `clone`) share it; mutators ([`Image::set_pixel`],
//! the `process_*` family) hold it exclusively for their whole pass.
//!
//! # Usage
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//!
//! let img = Image::filled(4, 4, RGBA64::new(1.0, 0.0, 0.0, 1.0)).unwrap();
//! img.process(|_x, _y, px| Ok(RGBA64::new(px.g, px.r, px.b, px.a))).unwrap();
//! assert_eq!(img.get_pixel(0, 0).unwrap().to_u8(), [0, 255, 0, 255]);
//! ```
//!
//! # Dependencies
//!
//! - [`rayon`] - row-parallel processing
//! - [`serde`] - serializable [`Metadata`]
//! - [`tracing`] - pass-level trace events

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rayon::prelude::*;
use serde::Serialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::pixel::RGBA64;
use crate::rect::Rect;

/// Descriptive data carried alongside pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Where the pixels came from (file path, generator name).
    pub source: Option<String>,
    /// Free-form ordered key/value annotations.
    pub attributes: BTreeMap<String, String>,
}

impl Metadata {
    /// Metadata with only a source identifier.
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Looks up an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[derive(Clone)]
struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<[u16; 4]>,
    metadata: Metadata,
}

/// Lock-guarded 16-bit straight-alpha sRGB RGBA image.
pub struct Image {
    inner: RwLock<ImageData>,
}

/// Borrowed read-only access to an image's pixels.
///
/// Obtained through [`Image::view`]; the shared lock is held while it lives.
pub struct PixelView<'a> {
    width: u32,
    height: u32,
    data: &'a [[u16; 4]],
}

impl PixelView<'_> {
    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Stored 16-bit pixel. Caller guarantees bounds.
    #[inline]
    pub fn raw(&self, x: u32, y: u32) -> [u16; 4] {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Pixel at (x, y), or `None` outside the image.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<RGBA64> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(RGBA64::from_u16(self.raw(x as u32, y as u32)))
    }

    /// Pixel at (x, y) with coordinates clamped to the edge.
    #[inline]
    pub fn get_clamped(&self, x: i64, y: i64) -> RGBA64 {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        RGBA64::from_u16(self.raw(cx, cy))
    }

    /// All stored pixels, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[[u16; 4]] {
        self.data
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "width and height must be non-zero"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))
}

impl Image {
    /// Creates a transparent image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, RGBA64::transparent())
    }

    /// Creates an image where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: RGBA64) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        Ok(Self::from_parts(width, height, vec![color.to_u16(); len], Metadata::default()))
    }

    /// Wraps already quantized pixels. `pixels.len()` must equal `width * height`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<[u16; 4]>) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        if pixels.len() != len {
            return Err(Error::invalid_argument(format!(
                "expected {len} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self::from_parts(width, height, pixels, Metadata::default()))
    }

    /// Builds an image from interleaved 8-bit straight sRGB RGBA samples.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        if data.len() != len * 4 {
            return Err(Error::invalid_argument(format!(
                "expected {} bytes for {width}x{height} RGBA8, got {}",
                len * 4,
                data.len()
            )));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|c| [widen(c[0]), widen(c[1]), widen(c[2]), widen(c[3])])
            .collect();
        Ok(Self::from_parts(width, height, pixels, Metadata::default()))
    }

    /// Builds an image from interleaved 16-bit straight sRGB RGBA samples.
    pub fn from_rgba16(width: u32, height: u32, data: &[u16]) -> Result<Self> {
        let len = check_dimensions(width, height)?;
        if data.len() != len * 4 {
            return Err(Error::invalid_argument(format!(
                "expected {} samples for {width}x{height} RGBA16, got {}",
                len * 4,
                data.len()
            )));
        }
        let pixels = data.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]).collect();
        Ok(Self::from_parts(width, height, pixels, Metadata::default()))
    }

    /// Evaluates `f` for every pixel in parallel rows.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> RGBA64 + Sync + Send,
    {
        let len = check_dimensions(width, height)?;
        let mut pixels = vec![[0u16; 4]; len];
        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    *out = f(x as u32, y as u32).to_u16();
                }
            });
        Ok(Self::from_parts(width, height, pixels, Metadata::default()))
    }

    fn from_parts(width: u32, height: u32, pixels: Vec<[u16; 4]>, metadata: Metadata) -> Self {
        Self {
            inner: RwLock::new(ImageData {
                width,
                height,
                pixels,
                metadata,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ImageData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ImageData> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.read().width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.read().height
    }

    /// (width, height) read under one lock.
    pub fn dimensions(&self) -> (u32, u32) {
        let d = self.read();
        (d.width, d.height)
    }

    /// Rectangle covering the whole image.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.dimensions();
        Rect::from_size(w, h)
    }

    /// Pixel at (x, y) as straight sRGB.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<RGBA64> {
        let d = self.read();
        if x >= d.width || y >= d.height {
            return Err(Error::out_of_bounds(x, y, d.width, d.height));
        }
        Ok(RGBA64::from_u16(d.pixels[y as usize * d.width as usize + x as usize]))
    }

    /// Stores `px` at (x, y), quantizing to straight sRGB 16-bit.
    pub fn set_pixel(&self, x: u32, y: u32, px: RGBA64) -> Result<()> {
        let mut d = self.write();
        if x >= d.width || y >= d.height {
            return Err(Error::out_of_bounds(x, y, d.width, d.height));
        }
        let idx = y as usize * d.width as usize + x as usize;
        d.pixels[idx] = px.to_u16();
        Ok(())
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&self, color: RGBA64) {
        let q = color.to_u16();
        self.write().pixels.iter_mut().for_each(|p| *p = q);
    }

    /// Copy of the metadata.
    pub fn metadata(&self) -> Metadata {
        self.read().metadata.clone()
    }

    /// Replaces the metadata.
    pub fn set_metadata(&self, metadata: Metadata) {
        self.write().metadata = metadata;
    }

    /// Adds or replaces one metadata attribute.
    pub fn annotate(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().metadata.attributes.insert(key.into(), value.into());
    }

    /// Runs `f` with shared access to the pixels.
    pub fn view<R>(&self, f: impl FnOnce(PixelView<'_>) -> R) -> R {
        let d = self.read();
        f(PixelView {
            width: d.width,
            height: d.height,
            data: &d.pixels,
        })
    }

    /// Runs `f` with exclusive access to the raw row-major pixels.
    pub fn with_pixels_mut<R>(&self, f: impl FnOnce(u32, u32, &mut [[u16; 4]]) -> R) -> R {
        let mut d = self.write();
        let (w, h) = (d.width, d.height);
        f(w, h, &mut d.pixels)
    }

    /// Interleaved 8-bit straight sRGB RGBA samples.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let d = self.read();
        d.pixels.iter().flat_map(|p| p.map(narrow)).collect()
    }

    /// Interleaved 16-bit straight sRGB RGBA samples.
    pub fn to_rgba16(&self) -> Vec<u16> {
        let d = self.read();
        d.pixels.iter().flat_map(|p| *p).collect()
    }

    /// Applies `f` to every pixel. Equivalent to [`Image::process_parallel`].
    pub fn process<F>(&self, f: F) -> Result<()>
    where
        F: Fn(u32, u32, RGBA64) -> Result<RGBA64> + Sync + Send,
    {
        self.process_parallel(f)
    }

    /// Applies `f` to every pixel in row-major order.
    ///
    /// A pixel whose call fails keeps its value. The pass always completes
    /// and the last error seen is returned.
    pub fn process_sequential<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(u32, u32, RGBA64) -> Result<RGBA64>,
    {
        let mut d = self.write();
        let w = d.width as usize;
        trace!(width = d.width, height = d.height, "image::process_sequential");
        let mut last_err = None;
        for (i, px) in d.pixels.iter_mut().enumerate() {
            let (x, y) = ((i % w) as u32, (i / w) as u32);
            match f(x, y, RGBA64::from_u16(*px)) {
                Ok(out) => *px = out.to_u16(),
                Err(e) => last_err = Some(e),
            }
        }
        last_err.map_or(Ok(()), Err)
    }

    /// Applies `f` to every pixel with one rayon task per row.
    ///
    /// Workers read an immutable snapshot and write private destination rows;
    /// the destination replaces the buffer after the join. Failing pixels keep
    /// their source value and the last captured error is returned.
    pub fn process_parallel<F>(&self, f: F) -> Result<()>
    where
        F: Fn(u32, u32, RGBA64) -> Result<RGBA64> + Sync + Send,
    {
        let mut d = self.write();
        let w = d.width as usize;
        trace!(width = d.width, height = d.height, "image::process_parallel");
        let last_err: Mutex<Option<Error>> = Mutex::new(None);
        let src = &d.pixels;
        let mut dst = vec![[0u16; 4]; src.len()];
        dst.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            let src_row = &src[y * w..(y + 1) * w];
            for (x, (out, s)) in row.iter_mut().zip(src_row).enumerate() {
                *out = match f(x as u32, y as u32, RGBA64::from_u16(*s)) {
                    Ok(px) => px.to_u16(),
                    Err(e) => {
                        *last_err.lock().unwrap_or_else(PoisonError::into_inner) = Some(e);
                        *s
                    }
                };
            }
        });
        d.pixels = dst;
        match last_err.into_inner().unwrap_or_else(PoisonError::into_inner) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Clone for Image {
    /// Deep copy of pixels and metadata.
    fn clone(&self) -> Self {
        let d = self.read().clone();
        Self {
            inner: RwLock::new(d),
        }
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = self.read();
        f.debug_struct("Image")
            .field("width", &d.width)
            .field("height", &d.height)
            .field("metadata", &d.metadata)
            .finish()
    }
}

impl PartialEq for Image {
    /// Pixel-exact comparison; metadata is ignored.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let a = self.read();
        let b = other.read();
        a.width == b.width && a.height == b.height && a.pixels == b.pixels
    }
}

#[inline]
fn widen(v: u8) -> u16 {
    v as u16 * 257
}

#[inline]
fn narrow(v: u16) -> u8 {
    (v / 257) as u8
}
