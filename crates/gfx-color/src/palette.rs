//! Named, ordered color collections and harmony generators.

use gfx_core::{Error, RGBA64, Result};

use crate::manipulate::ColorAdjust;

/// An ordered list of colors with a name.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    name: String,
    colors: Vec<RGBA64>,
}

impl Palette {
    /// Creates an empty palette.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colors: Vec::new(),
        }
    }

    /// Appends a color, builder style.
    pub fn with(mut self, color: RGBA64) -> Self {
        self.colors.push(color);
        self
    }

    /// Appends a color.
    pub fn add(&mut self, color: RGBA64) -> &mut Self {
        self.colors.push(color);
        self
    }

    /// Color at `index`.
    pub fn get(&self, index: usize) -> Result<RGBA64> {
        self.colors.get(index).copied().ok_or_else(|| {
            Error::invalid_argument(format!(
                "palette '{}' has {} colors, index {index} out of range",
                self.name,
                self.colors.len()
            ))
        })
    }

    /// Palette name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the palette holds no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RGBA64> {
        self.colors.iter()
    }

    /// Color nearest to `target` by RGB distance.
    pub fn nearest(&self, target: &RGBA64) -> Option<RGBA64> {
        self.colors
            .iter()
            .copied()
            .min_by(|a, b| a.distance(target).total_cmp(&b.distance(target)))
    }

    /// Base color and its complement.
    pub fn complementary(base: RGBA64) -> Self {
        Self::new("complementary").with(base).with(base.complement())
    }

    /// Base color and the two hues 120 degrees away.
    pub fn triadic(base: RGBA64) -> Self {
        Self::new("triadic")
            .with(base)
            .with(base.rotate_hue(120.0))
            .with(base.rotate_hue(240.0))
    }

    /// `count` hues spread evenly over `spread` degrees centered on `base`.
    pub fn analogous(base: RGBA64, count: usize, spread: f64) -> Self {
        let mut p = Self::new("analogous");
        if count == 1 {
            return p.with(base);
        }
        for i in 0..count {
            let t = i as f64 / (count - 1) as f64 - 0.5;
            p.add(base.rotate_hue(t * spread));
        }
        p
    }

    /// `count` shades of `base` from dark to light.
    pub fn monochromatic(base: RGBA64, count: usize) -> Self {
        let mut p = Self::new("monochromatic");
        for i in 0..count {
            let t = (i as f64 + 1.0) / (count as f64 + 1.0);
            let shade = base.darken(1.0).mix(&base.lighten(1.0), t);
            p.add(base.mix(&shade, 0.75));
        }
        p
    }

    /// Six grays from the web-safe cube.
    pub fn web_safe_grays() -> Self {
        [0u8, 51, 102, 153, 204, 255]
            .into_iter()
            .fold(Self::new("Web Safe"), |p, v| p.with(RGBA64::from_u8([v, v, v, 255])))
    }

    /// The sixteen Material Design primary hues.
    pub fn material() -> Self {
        const HUES: [[u8; 3]; 16] = [
            [244, 67, 54],
            [233, 30, 99],
            [156, 39, 176],
            [103, 58, 183],
            [63, 81, 181],
            [33, 150, 243],
            [3, 169, 244],
            [0, 188, 212],
            [0, 150, 136],
            [76, 175, 80],
            [139, 195, 74],
            [205, 220, 57],
            [255, 235, 59],
            [255, 193, 7],
            [255, 152, 0],
            [255, 87, 34],
        ];
        HUES.into_iter()
            .fold(Self::new("Material Design"), |p, [r, g, b]| p.with(RGBA64::from_u8([r, g, b, 255])))
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a RGBA64;
    type IntoIter = std::slice::Iter<'a, RGBA64>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_out_of_range() {
        let p = Palette::new("p").with(RGBA64::white());
        assert!(p.get(0).is_ok());
        assert!(p.get(1).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_triadic_red() {
        let p = Palette::triadic(RGBA64::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(p.len(), 3);
        assert!(p.get(1).unwrap().approx_eq(&RGBA64::new(0.0, 1.0, 0.0, 1.0), 1e-9));
        assert!(p.get(2).unwrap().approx_eq(&RGBA64::new(0.0, 0.0, 1.0, 1.0), 1e-9));
    }

    #[test]
    fn test_analogous_center() {
        let base = RGBA64::new(1.0, 0.0, 0.0, 1.0);
        let p = Palette::analogous(base, 3, 60.0);
        assert!(p.get(1).unwrap().approx_eq(&base, 1e-9));
    }

    #[test]
    fn test_monochromatic_ordered() {
        let p = Palette::monochromatic(RGBA64::new(0.2, 0.4, 0.8, 1.0), 4);
        let lum: Vec<f64> = p.iter().map(|c| c.luminance()).collect();
        assert!(lum.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_presets_and_nearest() {
        assert_eq!(Palette::web_safe_grays().len(), 6);
        assert_eq!(Palette::material().len(), 16);
        let near = Palette::web_safe_grays().nearest(&RGBA64::gray(0.21)).unwrap();
        assert_eq!(near.to_u8()[0], 51);
    }
}
