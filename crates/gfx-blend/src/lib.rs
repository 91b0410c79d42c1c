//! # gfx-blend
//!
//! Named blend modes over [`RGBA64`](gfx_core::RGBA64) with one alpha
//! compositing rule shared by all of them.
//!
//! - [`registry`] - lookup, registration and category listing
//! - [`BlendMode`] - descriptor holding metadata and the blend function
//! - [`ImageBlendExt`] - whole-image blending with parallel rows
//!
//! ## Categories
//!
//! | Category | Modes |
//! |----------|-------|
//! | basic | normal, erase |
//! | darken | darken, multiply, colorburn, linearburn, darkercolor |
//! | lighten | lighten, screen, colordodge, add, lineardodge, lightercolor |
//! | contrast | overlay, softlight, hardlight, vividlight, linearlight, pinlight, hardmix |
//! | comparative | difference, exclusion, subtract, divide, negation, contrastnegate |
//! | component | hue, saturation, color, luminosity |
//! | special | reflect, glow, average |
//!
//! ## Example
//!
//! ```rust
//! use gfx_blend::ImageBlendExt;
//! use gfx_core::{Image, RGBA64};
//!
//! let base = Image::filled(8, 8, RGBA64::gray(0.5)).unwrap();
//! let paint = Image::filled(8, 8, RGBA64::new(1.0, 0.0, 0.0, 1.0)).unwrap();
//! base.blend(&paint, "overlay", 0.5).unwrap();
//! ```
//!
//! # Used By
//!
//! - `gfx-ops` - drawing, text and layer composition

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod image_ext;
pub mod mode;
mod modes;
pub mod registry;

pub use image_ext::ImageBlendExt;
pub use mode::{ALPHA_CUTOFF, BlendFn, BlendMeta, BlendMode, Category, Space, check_alpha, composite, nonseparable, separable};
