//! Layer stacks.
//!
//! A [`Composition`] is a fixed-size canvas with a background color and an
//! ordered list of [`Layer`]s, bottom first. Each layer carries its own
//! blend mode, opacity, offset and filter chain.
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//! use gfx_ops::composition::{Composition, Layer};
//! use gfx_ops::filter::ArgValue;
//!
//! let base = Image::filled(16, 16, RGBA64::new(0.2, 0.4, 0.8, 1.0)).unwrap();
//! let mark = Image::filled(4, 4, RGBA64::white()).unwrap();
//!
//! let mut comp = Composition::new(16, 16).background(RGBA64::black());
//! comp.add_layer(Layer::new(base).filter("hue", vec![ArgValue::Float(0.5)]));
//! comp.add_layer(Layer::new(mark).blend_mode("screen").alpha(0.5).offset(6, 6));
//! let out = comp.render().unwrap();
//! assert_eq!(out.dimensions(), (16, 16));
//! ```

use gfx_core::{Error, Image, RGBA64, Result};
use tracing::debug;

use crate::draw::blit;
use crate::filter::{self, ArgValue};

/// A named filter with positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStep {
    /// Filter registry name
    pub name: String,
    /// Positional arguments
    pub args: Vec<ArgValue>,
}

fn run_steps(mut img: Image, steps: &[FilterStep]) -> Result<Image> {
    for step in steps {
        img = filter::apply(&step.name, &img, &step.args)?;
    }
    Ok(img)
}

/// One image in a composition.
#[derive(Debug, Clone)]
pub struct Layer {
    image: Image,
    blend_mode: String,
    alpha: f64,
    offset: (i64, i64),
    filters: Vec<FilterStep>,
}

impl Layer {
    /// Opaque `normal` layer at the origin.
    pub fn new(image: Image) -> Self {
        Self {
            image,
            blend_mode: "normal".into(),
            alpha: 1.0,
            offset: (0, 0),
            filters: Vec::new(),
        }
    }

    /// Sets the blend mode used when the layer is drawn.
    pub fn blend_mode(mut self, name: impl Into<String>) -> Self {
        self.blend_mode = name.into();
        self
    }

    /// Sets the layer opacity.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the top-left position on the canvas.
    pub fn offset(mut self, x: i64, y: i64) -> Self {
        self.offset = (x, y);
        self
    }

    /// Appends a filter invocation.
    pub fn filter(mut self, name: impl Into<String>, args: Vec<ArgValue>) -> Self {
        self.filters.push(FilterStep { name: name.into(), args });
        self
    }

    /// Source image before filters.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Blend mode name.
    pub fn mode(&self) -> &str {
        &self.blend_mode
    }

    /// Opacity.
    pub fn opacity(&self) -> f64 {
        self.alpha
    }

    /// Position on the canvas.
    pub fn position(&self) -> (i64, i64) {
        self.offset
    }

    /// The source image with every filter applied in order.
    ///
    /// The first failing filter aborts with its error.
    pub fn render(&self) -> Result<Image> {
        run_steps(self.image.clone(), &self.filters)
    }
}

/// A canvas with a background and a layer stack.
#[derive(Debug, Clone)]
pub struct Composition {
    width: u32,
    height: u32,
    background: RGBA64,
    layers: Vec<Layer>,
    filters: Vec<FilterStep>,
}

impl Composition {
    /// Empty transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: RGBA64::transparent(),
            layers: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Sets the background color.
    pub fn background(mut self, color: RGBA64) -> Self {
        self.background = color;
        self
    }

    /// Pushes a layer on top of the stack.
    pub fn add_layer(&mut self, layer: Layer) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Removes and returns the layer at `index` (0 is the bottom).
    pub fn remove_layer(&mut self, index: usize) -> Result<Layer> {
        if index >= self.layers.len() {
            return Err(Error::invalid_argument(format!(
                "layer index {index} out of range ({} layers)",
                self.layers.len()
            )));
        }
        Ok(self.layers.remove(index))
    }

    /// Appends a filter applied to the flattened result.
    pub fn filter(&mut self, name: impl Into<String>, args: Vec<ArgValue>) -> &mut Self {
        self.filters.push(FilterStep { name: name.into(), args });
        self
    }

    /// Layers, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Canvas size.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Flattens the stack.
    ///
    /// Starts from the background, draws each rendered layer at its offset
    /// with its blend mode and opacity, then runs the composition filters.
    pub fn render(&self) -> Result<Image> {
        debug!(
            width = self.width,
            height = self.height,
            layers = self.layers.len(),
            filters = self.filters.len(),
            "composition::render"
        );
        let canvas = Image::filled(self.width, self.height, self.background)?;
        for layer in &self.layers {
            let img = layer.render()?;
            let (x, y) = layer.offset;
            blit(&canvas, &img, x, y, &layer.blend_mode, layer.alpha)?;
        }
        run_steps(canvas, &self.filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Image {
        Image::filled(4, 4, RGBA64::new(1.0, 0.0, 0.0, 1.0)).unwrap()
    }

    #[test]
    fn test_empty_is_background() {
        let out = Composition::new(3, 2).background(RGBA64::gray(0.5)).render().unwrap();
        assert_eq!(out, Image::filled(3, 2, RGBA64::gray(0.5)).unwrap());
        let clear = Composition::new(3, 2).render().unwrap();
        assert!(clear.get_pixel(1, 1).unwrap().is_transparent());
    }

    #[test]
    fn test_layers_stack_bottom_up() {
        let mut comp = Composition::new(8, 8).background(RGBA64::white());
        comp.add_layer(Layer::new(red()).offset(2, 2));
        comp.add_layer(Layer::new(Image::filled(2, 2, RGBA64::black()).unwrap()).offset(3, 3));
        let out = comp.render().unwrap();
        assert_eq!(out.get_pixel(0, 0).unwrap().to_u8(), [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(2, 2).unwrap().to_u8(), [255, 0, 0, 255]);
        assert_eq!(out.get_pixel(3, 3).unwrap().to_u8(), [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(6, 6).unwrap().to_u8(), [255, 255, 255, 255]);
    }

    #[test]
    fn test_layer_mode_and_alpha() {
        let mut comp = Composition::new(4, 4).background(RGBA64::white());
        comp.add_layer(Layer::new(red()).blend_mode("multiply"));
        assert_eq!(comp.render().unwrap().get_pixel(0, 0).unwrap().to_u8(), [255, 0, 0, 255]);

        let mut comp = Composition::new(4, 4).background(RGBA64::black());
        comp.add_layer(Layer::new(red()).alpha(0.0));
        assert_eq!(comp.render().unwrap().get_pixel(0, 0).unwrap().to_u8(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_filters_in_order() {
        let layer = Layer::new(red()).filter("hue", vec![(1.0 / 3.0).into()]).filter("invert", vec![]);
        // red -> green -> magenta
        assert_eq!(layer.render().unwrap().get_pixel(0, 0).unwrap().to_u8(), [255, 0, 255, 255]);
        assert_eq!(layer.image(), &red());

        let mut comp = Composition::new(4, 4);
        comp.add_layer(Layer::new(red()));
        comp.filter("flip_h", vec![]).filter("grayscale", vec!["average".into()]);
        assert_eq!(comp.render().unwrap().get_pixel(0, 0).unwrap().to_u8()[0], 85);
    }

    #[test]
    fn test_errors() {
        let mut comp = Composition::new(4, 4);
        assert!(comp.remove_layer(0).unwrap_err().is_invalid_argument());
        comp.add_layer(Layer::new(red()).blend_mode("nope"));
        assert!(comp.render().unwrap_err().is_unknown_name());
        comp.remove_layer(0).unwrap();
        comp.add_layer(Layer::new(red()).filter("nope", vec![]));
        assert!(comp.render().is_err());
        comp.remove_layer(0).unwrap();
        comp.add_layer(Layer::new(red()).filter("hue", vec![5.0.into()]));
        assert!(comp.render().unwrap_err().is_invalid_argument());
        assert!(Composition::new(0, 4).render().is_err());
    }
}
