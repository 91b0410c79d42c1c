//! Device RGB models: float and 8/16/32-bit integer.
//!
//! Integer models round to the nearest step on the way in, so a value read
//! back from `to_rgba64` maps to the same integer again.

use gfx_core::RGBA64;

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb};

/// Floating point sRGB with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red [0, 1]
    pub r: f64,
    /// Green [0, 1]
    pub g: f64,
    /// Blue [0, 1]
    pub b: f64,
    /// Alpha [0, 1]
    pub alpha: f64,
}

impl Rgb {
    /// Creates a color from float channels.
    pub const fn new(r: f64, g: f64, b: f64, alpha: f64) -> Self {
        Self { r, g, b, alpha }
    }
}

static RGB_META: ModelMeta = ModelMeta {
    name: "RGB",
    description: "sRGB with floating point channels",
    channels: &[
        ChannelMeta::new("R", 0.0, 1.0, "", "Red intensity"),
        ChannelMeta::new("G", 0.0, 1.0, "", "Green intensity"),
        ChannelMeta::new("B", 0.0, 1.0, "", "Blue intensity"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Rgb {
    const META: &'static ModelMeta = &RGB_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        Self::new(r, g, b, a)
    }

    fn to_rgba64(&self) -> RGBA64 {
        RGBA64::new(self.r, self.g, self.b, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.r, self.g, self.b, self.alpha]
    }
}

macro_rules! integer_rgb {
    ($name:ident, $ty:ty, $id:literal, $max:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            /// Red
            pub r: $ty,
            /// Green
            pub g: $ty,
            /// Blue
            pub b: $ty,
            /// Alpha
            pub alpha: $ty,
        }

        impl $name {
            /// Largest channel value.
            pub const MAX: f64 = $max;

            /// Creates a color from integer channels.
            pub const fn new(r: $ty, g: $ty, b: $ty, alpha: $ty) -> Self {
                Self { r, g, b, alpha }
            }

            #[inline]
            fn step(v: f64) -> $ty {
                (v * Self::MAX).round().clamp(0.0, Self::MAX) as $ty
            }
        }

        impl ColorModel for $name {
            const META: &'static ModelMeta = &ModelMeta {
                name: $id,
                description: $doc,
                channels: &[
                    ChannelMeta::new("R", 0.0, $max, "", "Red intensity"),
                    ChannelMeta::new("G", 0.0, $max, "", "Green intensity"),
                    ChannelMeta::new("B", 0.0, $max, "", "Blue intensity"),
                    ChannelMeta::new("Alpha", 0.0, $max, "", "Opacity"),
                ],
            };

            fn from_rgba64(px: &RGBA64) -> Self {
                let [r, g, b, a] = read_srgb(px);
                Self::new(Self::step(r), Self::step(g), Self::step(b), Self::step(a))
            }

            fn to_rgba64(&self) -> RGBA64 {
                RGBA64::new(
                    self.r as f64 / Self::MAX,
                    self.g as f64 / Self::MAX,
                    self.b as f64 / Self::MAX,
                    self.alpha as f64 / Self::MAX,
                )
            }

            fn from_channels(v: &[f64]) -> Self {
                let q = |x: f64| x.round().clamp(0.0, Self::MAX) as $ty;
                Self::new(q(v[0]), q(v[1]), q(v[2]), q(v[3]))
            }

            fn to_vec(&self) -> Vec<f64> {
                vec![self.r as f64, self.g as f64, self.b as f64, self.alpha as f64]
            }
        }
    };
}

integer_rgb!(Rgb8, u8, "RGB8", 255.0, "sRGB with 8-bit integer channels");
integer_rgb!(Rgb16, u16, "RGB16", 65535.0, "sRGB with 16-bit integer channels");
integer_rgb!(Rgb32, u32, "RGB32", 4294967295.0, "sRGB with 32-bit integer channels");
