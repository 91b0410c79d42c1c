//! Packed 24-bit web color (`#RRGGBB`) with a separate alpha.
//!
//! ```rust
//! use gfx_color::{ColorModel, Hex};
//!
//! let c = Hex::parse("#FF8040").unwrap();
//! let px = c.to_rgba64();
//! assert!((px.g - 0.50196).abs() < 1e-4);
//! assert_eq!(Hex::from_rgba64(&px).to_string(), "#FF8040");
//! ```

use std::fmt;
use std::str::FromStr;

use gfx_core::{Error, RGBA64, Result};

use crate::meta::{ChannelMeta, ModelMeta};
use crate::model::{ColorModel, read_srgb};

/// Largest packed value.
pub const HEX_MAX: u32 = 0xFF_FFFF;

/// 24-bit packed sRGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hex {
    /// 0xRRGGBB
    pub value: u32,
    /// Alpha [0, 1]
    pub alpha: f64,
}

impl Hex {
    /// Creates an opaque color from a packed value.
    pub fn new(value: u32) -> Self {
        Self::with_alpha(value, 1.0)
    }

    /// Creates a color from a packed value and alpha.
    pub fn with_alpha(value: u32, alpha: f64) -> Self {
        Self {
            value: value & HEX_MAX,
            alpha,
        }
    }

    /// Parses `#RRGGBB` or `#RGB`; the `#` is optional and case is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        let bad = || Error::invalid_argument(format!("malformed hex color '{s}'"));
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let value = match digits.len() {
            6 => u32::from_str_radix(digits, 16).map_err(|_| bad())?,
            3 => {
                let short = u32::from_str_radix(digits, 16).map_err(|_| bad())?;
                let (r, g, b) = ((short >> 8) & 0xF, (short >> 4) & 0xF, short & 0xF);
                (r * 17) << 16 | (g * 17) << 8 | b * 17
            }
            _ => return Err(bad()),
        };
        Ok(Self::new(value))
    }

    /// (r, g, b) bytes.
    pub fn bytes(&self) -> [u8; 3] {
        [(self.value >> 16) as u8, (self.value >> 8) as u8, self.value as u8]
    }
}

impl FromStr for Hex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.value)
    }
}

static HEX_META: ModelMeta = ModelMeta {
    name: "Hex",
    description: "Packed 24-bit #RRGGBB web color",
    channels: &[
        ChannelMeta::new("Value", 0.0, HEX_MAX as f64, "", "Packed 0xRRGGBB"),
        ChannelMeta::alpha(),
    ],
};

impl ColorModel for Hex {
    const META: &'static ModelMeta = &HEX_META;

    fn from_rgba64(px: &RGBA64) -> Self {
        let [r, g, b, a] = read_srgb(px);
        let q = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u32;
        Self::with_alpha(q(r) << 16 | q(g) << 8 | q(b), a)
    }

    fn to_rgba64(&self) -> RGBA64 {
        let [r, g, b] = self.bytes();
        RGBA64::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, self.alpha)
    }

    fn from_channels(v: &[f64]) -> Self {
        Self::with_alpha(v[0].round().clamp(0.0, HEX_MAX as f64) as u32, v[1])
    }

    fn to_vec(&self) -> Vec<f64> {
        vec![self.value as f64, self.alpha]
    }
}
