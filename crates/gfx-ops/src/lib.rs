//! # gfx-ops
//!
//! Image operations built on [`gfx_core::Image`].
//!
//! - [`resize`] - nearest, bilinear, bicubic and Lanczos resampling
//! - [`transform`] - crop, rotate, flip, translate
//! - [`draw`] - lines, rectangles, circles and blits through blend modes
//! - [`text`] - bitmap text with color markup
//! - [`filter`] - named filters with typed arguments and a registry
//! - [`projection`] - map projections and reprojection
//! - [`composition`] - layer stacks
//!
//! Operations never modify their input unless they are drawing calls, which
//! paint into the image they are given.
//!
//! # Example
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//! use gfx_ops::{filter, resize::{resize, ResizeMethod}, transform::rotate};
//!
//! let img = Image::filled(32, 32, RGBA64::new(0.8, 0.2, 0.2, 1.0)).unwrap();
//! let small = resize(&img, 16, 16, ResizeMethod::Lanczos).unwrap();
//! let turned = rotate(&small, 45.0).unwrap();
//! let soft = filter::apply("blur", &turned, &[filter::ArgValue::Int(2)]).unwrap();
//! assert_eq!(soft.dimensions(), turned.dimensions());
//! ```
//!
//! # Dependencies
//!
//! - [`gfx_blend`] - blend modes for drawing and layers
//! - [`gfx_color`] - HSL helpers for color filters and text
//! - [`rayon`] - row-parallel resampling and convolution
//! - [`regex`], [`lazy_static`] - text markup and the font sheet
//! - [`glam`] - rotation math

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod composition;
pub mod draw;
pub mod filter;
pub mod font;
pub mod projection;
pub mod resize;
pub mod text;
pub mod transform;

mod sample;

pub use composition::{Composition, Layer};
pub use draw::Brush;
pub use filter::{ArgType, ArgValue, Filter, FilterArg, FilterMeta};
pub use projection::{CoordMeta, Projection, ProjectionMeta};
pub use resize::{ResizeMethod, resize, scale};
pub use text::{TextStyle, draw_text, render_text, text_size};
pub use transform::{crop, flip_h, flip_v, rotate, translate, translate_wrap};
