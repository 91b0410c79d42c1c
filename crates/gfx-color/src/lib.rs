//! # gfx-color
//!
//! Color models with lossless round-tripping through the canonical
//! [`RGBA64`](gfx_core::RGBA64) pixel.
//!
//! - [`ColorModel`] - trait every model implements
//! - [`models`] - the 20 built-in models (RGB, RGB8/16/32, HSL, HSB, CMY,
//!   CMYK, LAB, LCH, HCL, LUV, XYZ, YUV, YIQ, YCbCr, Grayscale, Hex, LSB, LSL)
//! - [`registry`] - process-wide lookup by model identifier
//! - [`ColorAdjust`] - lighten, darken, rotate hue, mix
//! - [`Palette`] - named color lists and harmony generators
//!
//! ## Round-Trip Contract
//!
//! For every in-gamut color, `M::from_rgba64(&m.to_rgba64())` reproduces `m`
//! within 0.001 per channel for device models and 0.01 for the perceptual
//! CIE models.
//!
//! ```rust
//! use gfx_color::{ColorModel, Cmyk};
//! use gfx_core::RGBA64;
//!
//! let px = RGBA64::new(0.2, 0.4, 0.6, 1.0);
//! let cmyk = Cmyk::from_rgba64(&px);
//! assert!(cmyk.to_rgba64().approx_eq(&px, 1e-12));
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - 3x3 matrices for XYZ and YIQ
//! - [`serde`] - serializable metadata

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod manipulate;
pub mod meta;
pub mod model;
pub mod models;
pub mod palette;
pub mod registry;

pub use manipulate::ColorAdjust;
pub use meta::{ChannelMeta, ModelMeta};
pub use model::{ColorModel, convert, wrap_hue};
pub use models::*;
pub use palette::Palette;
pub use registry::ModelDescriptor;
