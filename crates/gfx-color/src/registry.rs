//! Process-wide color model registry.
//!
//! Maps canonical model identifiers ("RGB8", "LAB", ...) to type-erased
//! [`ModelDescriptor`]s. The 20 built-in models are registered on first
//! access; applications may add their own with [`register`].
//!
//! ```rust
//! use gfx_color::registry;
//!
//! let lab = registry::get("LAB").unwrap();
//! let px = lab.decode(&[53.24, 80.09, 67.20, 1.0]).unwrap();
//! assert!(px.r > 0.99);
//! assert_eq!(registry::list().len(), 20);
//! ```

use std::sync::{Arc, OnceLock};

use gfx_core::{RGBA64, Registry, Result};
use tracing::debug;

use crate::meta::ModelMeta;
use crate::model::ColorModel;
use crate::models::*;

/// Type-erased handle to one color model.
#[derive(Debug, Clone, Copy)]
pub struct ModelDescriptor {
    /// Static metadata
    pub meta: &'static ModelMeta,
    decode_fn: fn(&[f64]) -> Result<RGBA64>,
    encode_fn: fn(&RGBA64) -> Vec<f64>,
}

fn decode_as<M: ColorModel>(values: &[f64]) -> Result<RGBA64> {
    Ok(M::from_slice(values)?.to_rgba64())
}

fn encode_as<M: ColorModel>(px: &RGBA64) -> Vec<f64> {
    M::from_rgba64(px).to_vec()
}

impl ModelDescriptor {
    /// Descriptor for a concrete model type.
    pub fn of<M: ColorModel>() -> Self {
        Self {
            meta: M::META,
            decode_fn: decode_as::<M>,
            encode_fn: encode_as::<M>,
        }
    }

    /// Canonical identifier.
    pub fn name(&self) -> &'static str {
        self.meta.name
    }

    /// Validates channel values and converts them to a straight sRGB pixel.
    pub fn decode(&self, values: &[f64]) -> Result<RGBA64> {
        (self.decode_fn)(values)
    }

    /// Converts a pixel to channel values in metadata order.
    pub fn encode(&self, px: &RGBA64) -> Vec<f64> {
        (self.encode_fn)(px)
    }
}

fn global() -> &'static Registry<ModelDescriptor> {
    static INSTANCE: OnceLock<Registry<ModelDescriptor>> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let reg = Registry::new("color model");
        for desc in builtin() {
            // Names are distinct constants; a clash is impossible on a fresh map.
            let _ = reg.register(desc.name(), desc);
        }
        debug!(count = reg.len(), "color model registry initialized");
        reg
    })
}

fn builtin() -> [ModelDescriptor; 20] {
    [
        ModelDescriptor::of::<Rgb>(),
        ModelDescriptor::of::<Rgb8>(),
        ModelDescriptor::of::<Rgb16>(),
        ModelDescriptor::of::<Rgb32>(),
        ModelDescriptor::of::<Hsl>(),
        ModelDescriptor::of::<Hsb>(),
        ModelDescriptor::of::<Cmy>(),
        ModelDescriptor::of::<Cmyk>(),
        ModelDescriptor::of::<Lab>(),
        ModelDescriptor::of::<Lch>(),
        ModelDescriptor::of::<Hcl>(),
        ModelDescriptor::of::<Luv>(),
        ModelDescriptor::of::<Xyz>(),
        ModelDescriptor::of::<Yuv>(),
        ModelDescriptor::of::<Yiq>(),
        ModelDescriptor::of::<YCbCr>(),
        ModelDescriptor::of::<Grayscale>(),
        ModelDescriptor::of::<Hex>(),
        ModelDescriptor::of::<Lsb>(),
        ModelDescriptor::of::<Lsl>(),
    ]
}

/// Looks up a model by identifier.
pub fn get(name: &str) -> Result<Arc<ModelDescriptor>> {
    global().get(name)
}

/// All registered identifiers, sorted.
pub fn list() -> Vec<String> {
    global().list()
}

/// Registers an additional model. Fails if the identifier is taken.
pub fn register(desc: ModelDescriptor) -> Result<()> {
    global().register(desc.name(), desc).map(|_| ())
}

/// Converts channel values from one registered model to another.
pub fn convert_values(from: &str, to: &str, values: &[f64]) -> Result<Vec<f64>> {
    let px = get(from)?.decode(values)?;
    Ok(get(to)?.encode(&px))
}
