//! # gfx-core
//!
//! Core types for raster compositing and color processing.
//!
//! This crate provides the foundation every other gfx crate builds on:
//!
//! - [`RGBA64`] - canonical `f64` pixel with explicit linear/sRGB and
//!   premultiplication state
//! - [`Image`] - lock-guarded 16-bit straight-alpha sRGB buffer with
//!   sequential and row-parallel per-pixel processors
//! - [`Registry`] - thread-safe name-keyed descriptor map used by the color,
//!   blend, filter and projection registries
//! - [`Rect`] - clipping rectangles
//! - [`Error`], [`Result`] - the shared error type
//!
//! ## Crate Structure
//!
//! ```text
//! gfx-core (this crate)
//!    ^
//!    |
//!    +-- gfx-color (color models)
//!    +-- gfx-blend (blend modes)
//!    +-- gfx-ops   (transforms, drawing, filters, projections, layers)
//!    +-- gfx-io    (PNG / JPEG)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;
pub mod registry;
pub mod transfer;

pub use error::{Error, Result};
pub use image::{Image, Metadata, PixelView};
pub use pixel::{ALPHA_EPSILON, REC601_LUMA, REC709_LUMA, RGBA64};
pub use rect::Rect;
pub use registry::Registry;

/// Prelude module for convenient imports.
///
/// ```
/// use gfx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, Metadata};
    pub use crate::pixel::RGBA64;
    pub use crate::rect::Rect;
}
