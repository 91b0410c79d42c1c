//! Error types shared by every gfx crate.
//!
//! All fallible operations in the workspace return [`Result`], whose error
//! side is the [`Error`] enum below. Higher crates (`gfx-io`) wrap it in their
//! own error types via `#[from]`.
//!
//! # Categories
//!
//! - **Argument errors**: [`InvalidArgument`](Error::InvalidArgument),
//!   [`OutOfBounds`](Error::OutOfBounds), [`InvalidDimensions`](Error::InvalidDimensions),
//!   [`InvalidRegion`](Error::InvalidRegion), [`UnknownName`](Error::UnknownName)
//! - **Registry errors**: [`DuplicateRegistration`](Error::DuplicateRegistration)
//! - **Capability errors**: [`Unsupported`](Error::Unsupported)
//! - **Bugs**: [`InternalInvariant`](Error::InternalInvariant)
//!
//! # Usage
//!
//! ```rust
//! use gfx_core::{Error, Result};
//!
//! fn check(x: u32, y: u32, width: u32, height: u32) -> Result<()> {
//!     if x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(5, 5, 4, 4).unwrap_err().is_invalid_argument());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive for `Display` and `std::error::Error`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by pixel, image, registry and effect operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument is outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Pixel coordinates are outside image bounds.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: i64,
        /// Y coordinate that was out of bounds
        y: i64,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Requested dimensions cannot form an image.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// A region does not fit inside the image.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: i64,
        /// Region Y origin
        ry: i64,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// A registry lookup found nothing under the given name.
    #[error("unknown {kind}: '{name}'")]
    UnknownName {
        /// Registry kind ("blend mode", "filter", ...)
        kind: &'static str,
        /// Name that was looked up
        name: String,
    },

    /// The requested capability is not available.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A registry already holds an entry with this name.
    #[error("{kind} '{name}' is already registered")]
    DuplicateRegistration {
        /// Registry kind
        kind: &'static str,
        /// Conflicting name
        name: String,
    },

    /// An internal consistency check failed.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl Error {
    /// Creates an [`Error::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: impl Into<i64>, y: impl Into<i64>, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x: x.into(),
            y: y.into(),
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: i64, ry: i64, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::UnknownName`] error.
    #[inline]
    pub fn unknown_name(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownName {
            kind,
            name: name.into(),
        }
    }

    /// Creates an [`Error::DuplicateRegistration`] error.
    #[inline]
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateRegistration {
            kind,
            name: name.into(),
        }
    }

    /// Creates an [`Error::Unsupported`] error.
    #[inline]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Creates an [`Error::InternalInvariant`] error.
    #[inline]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalInvariant(msg.into())
    }

    /// Returns `true` for errors caused by a bad caller-supplied value.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::OutOfBounds { .. }
                | Self::InvalidDimensions { .. }
                | Self::InvalidRegion { .. }
                | Self::UnknownName { .. }
        )
    }

    /// Returns `true` if this is a duplicate registration.
    #[inline]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateRegistration { .. })
    }

    /// Returns `true` if this is an unknown-name lookup failure.
    #[inline]
    pub fn is_unknown_name(&self) -> bool {
        matches!(self, Self::UnknownName { .. })
    }

    /// Returns `true` if this is an unsupported capability.
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}
