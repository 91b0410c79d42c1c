//! Built-in color models.

pub mod cie;
pub mod cmy;
pub mod gray;
pub mod hex;
pub mod hsl;
pub mod rgb;
pub mod spectral;
pub mod video;

pub use cie::{Hcl, Lab, Lch, Luv, Xyz};
pub use cmy::{Cmy, Cmyk};
pub use gray::{GrayMethod, Grayscale};
pub use hex::Hex;
pub use hsl::{Hsb, Hsl};
pub use rgb::{Rgb, Rgb8, Rgb16, Rgb32};
pub use spectral::{Lsb, Lsl};
pub use video::{YCbCr, Yiq, Yuv};

#[cfg(test)]
mod roundtrip_tests {
    use gfx_core::RGBA64;

    use crate::registry;

    const PERCEPTUAL: [&str; 4] = ["LAB", "LCH", "HCL", "LUV"];
    const QUANTIZED: [&str; 2] = ["RGB8", "Hex"];

    fn palette() -> Vec<RGBA64> {
        vec![
            RGBA64::new(1.0, 0.0, 0.0, 1.0),
            RGBA64::new(0.0, 1.0, 0.0, 1.0),
            RGBA64::new(0.0, 0.0, 1.0, 1.0),
            RGBA64::new(0.0, 1.0, 1.0, 1.0),
            RGBA64::new(1.0, 0.0, 1.0, 1.0),
            RGBA64::new(1.0, 1.0, 0.0, 1.0),
            RGBA64::black(),
            RGBA64::white(),
            RGBA64::gray(0.25),
            RGBA64::gray(0.5),
            RGBA64::gray(0.75),
            RGBA64::gray(0.001),
            RGBA64::gray(0.999),
            RGBA64::new(1.0, 0.0, 0.0, 0.5),
            RGBA64::new(0.8, 0.3, 0.1, 1.0),
        ]
    }

    fn channel_diff(a: f64, b: f64, unit: &str) -> f64 {
        let d = (a - b).abs();
        if unit == "deg" { d.min(360.0 - d) } else { d }
    }

    #[test]
    fn test_model_space_roundtrip() {
        for name in registry::list() {
            let Ok(desc) = registry::get(&name) else { continue };
            if !desc.meta.channels.iter().any(|c| c.name == "Alpha") {
                continue;
            }
            let tol = if PERCEPTUAL.contains(&name.as_str()) { 0.01 } else { 0.001 };
            for px in palette() {
                let m = desc.encode(&px);
                let back = desc.decode(&m).unwrap_or_else(|e| panic!("{name} rejects its own output {m:?}: {e}"));
                let m2 = desc.encode(&back);
                for ((a, b), ch) in m.iter().zip(&m2).zip(desc.meta.channels) {
                    assert!(channel_diff(*a, *b, ch.unit) <= tol, "{name}.{}: {a} vs {b} for {px:?}", ch.name);
                }
            }
        }
    }

    #[test]
    fn test_pixel_space_roundtrip() {
        for name in registry::list() {
            let Ok(desc) = registry::get(&name) else { continue };
            if !desc.meta.channels.iter().any(|c| c.name == "Alpha") || name == "Grayscale" {
                continue;
            }
            let tol = if QUANTIZED.contains(&name.as_str()) { 0.5 / 255.0 + 1e-9 } else { 0.001 };
            for px in palette() {
                let back = desc.decode(&desc.encode(&px)).unwrap();
                assert!(back.approx_eq(&px, tol), "{name}: {px:?} -> {back:?}");
            }
        }
    }
}
