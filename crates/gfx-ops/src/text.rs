//! Bitmap text rendering with inline color markup.
//!
//! Text is laid out on the [`font`](crate::font) grid, rendered into a
//! transient image with a one pixel outline around every glyph, and then
//! blitted onto the target.
//!
//! # Markup
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `[:white:]` `[:black:]` | lightness 1 / 0, saturation 0 |
//! | `[:gray:]` | saturation 0 |
//! | `[:color:]` | saturation 0.5 |
//! | `[:r:]` `[:g:]` `[:b:]` `[:c:]` `[:m:]` `[:y:]` | hue 0 / 120 / 240 / 180 / 300 / 60 |
//! | `[:gon:]` `[:goff:]` | glow on / off |
//! | `[::]` | back to the style color |
//! | `[:H:S:L:]` | absolute HSL, e.g. `[:200:0.8:0.6:]` |
//!
//! `\n` starts a new line. Characters outside printable ASCII draw as a space.
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//! use gfx_ops::text::{self, TextStyle};
//!
//! let img = Image::filled(64, 24, RGBA64::black()).unwrap();
//! let style = TextStyle::new(RGBA64::white());
//! text::draw_text(&img, 2, 2, "HP [:r:]12", &style).unwrap();
//! assert_eq!(text::text_size("HP [:r:]12"), (50, 10));
//! ```

use gfx_color::models::hsl::{hsl_to_rgb, rgb_to_hsl};
use gfx_color::wrap_hue;
use gfx_core::{Error, Image, RGBA64, Result};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::draw::blit;
use crate::font::{CELL_HEIGHT, CELL_WIDTH, SHEET};

lazy_static! {
    static ref NAMED_TAG: std::result::Result<Regex, regex::Error> =
        Regex::new(r"^\[:(gon|goff|white|black|gray|color|r|g|b|c|m|y|):\]");
    static ref HSL_TAG: std::result::Result<Regex, regex::Error> =
        Regex::new(r"^\[:(\d{1,3}):(\d(?:\.\d+)?):(\d(?:\.\d+)?):\]");
}

fn tag_patterns() -> Result<(&'static Regex, &'static Regex)> {
    let named = NAMED_TAG.as_ref().map_err(|e| Error::internal(format!("markup pattern: {e}")))?;
    let hsl = HSL_TAG.as_ref().map_err(|e| Error::internal(format!("markup pattern: {e}")))?;
    Ok((named, hsl))
}

/// Appearance of rendered text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Initial glyph color; `[::]` returns to it.
    pub color: RGBA64,
    /// Initial glow state.
    pub glow: bool,
    /// Blend mode used for the final blit.
    pub mode: String,
    /// Opacity of the final blit.
    pub alpha: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: RGBA64::white(),
            glow: false,
            mode: "normal".into(),
            alpha: 1.0,
        }
    }
}

impl TextStyle {
    /// Opaque `normal` text of the given color.
    pub fn new(color: RGBA64) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Sets the initial glow state.
    pub fn with_glow(mut self, glow: bool) -> Self {
        self.glow = glow;
        self
    }

    /// Sets the blit blend mode.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Sets the blit opacity.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hsl {
    h: f64,
    s: f64,
    l: f64,
}

impl Hsl {
    fn of(px: &RGBA64) -> Self {
        let s = px.straight();
        let (h, sat, l) = rgb_to_hsl(s.r.clamp(0.0, 1.0), s.g.clamp(0.0, 1.0), s.b.clamp(0.0, 1.0));
        Self { h, s: sat, l }
    }

    fn to_rgba(self, alpha: f64) -> RGBA64 {
        let (r, g, b) = hsl_to_rgb(self.h, self.s.clamp(0.0, 1.0), self.l.clamp(0.0, 1.0));
        RGBA64::new(r, g, b, alpha)
    }
}

/// One positioned character.
#[derive(Debug, Clone, Copy)]
struct Placed {
    ch: char,
    col: u32,
    line: u32,
    color: Hsl,
    glow: bool,
}

struct Layout {
    glyphs: Vec<Placed>,
    columns: u32,
    lines: u32,
}

fn layout(text: &str, style: &TextStyle) -> Result<Layout> {
    let (named, absolute) = tag_patterns()?;
    let initial = Hsl::of(&style.color);
    let mut color = initial;
    let mut glow = style.glow;
    let mut glyphs = Vec::new();
    let (mut col, mut line, mut columns) = (0u32, 0u32, 0u32);
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(caps) = named.captures(rest) {
                match &caps[1] {
                    "" => color = initial,
                    "white" => (color.s, color.l) = (0.0, 1.0),
                    "black" => (color.s, color.l) = (0.0, 0.0),
                    "gray" => color.s = 0.0,
                    "color" => color.s = 0.5,
                    "r" => color.h = 0.0,
                    "g" => color.h = 120.0,
                    "b" => color.h = 240.0,
                    "c" => color.h = 180.0,
                    "m" => color.h = 300.0,
                    "y" => color.h = 60.0,
                    "gon" => glow = true,
                    "goff" => glow = false,
                    _ => {}
                }
                rest = &rest[caps[0].len()..];
                continue;
            }
            if let Some(caps) = absolute.captures(rest) {
                let num = |i: usize| caps[i].parse::<f64>().unwrap_or(0.0);
                color = Hsl {
                    h: wrap_hue(num(1)),
                    s: num(2).clamp(0.0, 1.0),
                    l: num(3).clamp(0.0, 1.0),
                };
                rest = &rest[caps[0].len()..];
                continue;
            }
        }
        rest = &rest[ch.len_utf8()..];
        if ch == '\n' {
            line += 1;
            col = 0;
            continue;
        }
        glyphs.push(Placed {
            ch,
            col,
            line,
            color,
            glow,
        });
        col += 1;
        columns = columns.max(col);
    }

    Ok(Layout {
        glyphs,
        columns,
        lines: line + 1,
    })
}

fn size_of(columns: u32, lines: u32) -> (u32, u32) {
    (columns * CELL_WIDTH + 2, lines * CELL_HEIGHT + 2)
}

/// Size of the image [`render_text`] produces for `text`, outline padding
/// included.
pub fn text_size(text: &str) -> (u32, u32) {
    match layout(text, &TextStyle::default()) {
        Ok(l) => size_of(l.columns, l.lines),
        Err(_) => size_of(text.chars().filter(|&c| c != '\n').count() as u32, 1),
    }
}

/// Renders `text` into a new transparent image with a one pixel outline.
///
/// Glyph (0, 0) has its top-left ink pixel at (1, 1).
pub fn render_text(text: &str, style: &TextStyle) -> Result<Image> {
    let Layout { glyphs, columns, lines } = layout(text, style)?;
    let (w, h) = size_of(columns, lines);
    let alpha = style.color.straight().a;

    // Ink owner per pixel, then outline owner for pixels next to ink.
    let mut ink: Vec<Option<u32>> = vec![None; (w * h) as usize];
    for (i, g) in glyphs.iter().enumerate() {
        let (ox, oy) = (1 + g.col * CELL_WIDTH, 1 + g.line * CELL_HEIGHT);
        for gy in 0..CELL_HEIGHT {
            for gx in 0..CELL_WIDTH {
                if SHEET.is_set(g.ch, gx, gy) {
                    ink[((oy + gy) * w + ox + gx) as usize] = Some(i as u32);
                }
            }
        }
    }

    let owner = |x: i64, y: i64| -> Option<u32> {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return None;
        }
        ink[(y as u32 * w + x as u32) as usize]
    };

    let img = Image::from_fn(w, h, |x, y| {
        if let Some(i) = ink[(y * w + x) as usize] {
            let g = &glyphs[i as usize];
            let mut c = g.color;
            if g.glow {
                c.s *= 1.25;
            }
            return c.to_rgba(alpha);
        }
        let (x, y) = (x as i64, y as i64);
        let near = (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .find_map(|(dx, dy)| owner(x + dx, y + dy));
        match near {
            Some(i) => {
                let g = &glyphs[i as usize];
                let mut c = g.color;
                if g.glow {
                    c.s *= 0.75;
                    c.l *= 0.4;
                } else {
                    c.l = 0.1;
                }
                c.to_rgba(alpha)
            }
            None => RGBA64::transparent(),
        }
    })?;
    trace!(w, h, glyphs = glyphs.len(), "text::render_text");
    Ok(img)
}

/// Renders `text` and blits it so the first glyph cell starts at (x, y).
pub fn draw_text(img: &Image, x: i64, y: i64, text: &str, style: &TextStyle) -> Result<()> {
    let rendered = render_text(text, style)?;
    blit(img, &rendered, x - 1, y - 1, &style.mode, style.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(img: &Image, x: u32, y: u32) -> [u8; 4] {
        img.get_pixel(x, y).unwrap().to_u8()
    }

    #[test]
    fn test_size() {
        assert_eq!(text_size("A"), (8, 10));
        assert_eq!(text_size("ab\nabcd"), (26, 18));
        assert_eq!(text_size("[:r:]x[::]y"), (14, 10));
        assert_eq!(text_size("[:120:0.5:0.5:]zz"), (14, 10));
    }

    #[test]
    fn test_unclosed_tag_is_text() {
        assert_eq!(text_size("[:q:]"), (32, 10));
    }

    #[test]
    fn test_glyph_and_outline() {
        let img = render_text("!", &TextStyle::new(RGBA64::white())).unwrap();
        // '!' ink is column 2, rows 0..=4 and 6 of the cell, offset by one.
        assert_eq!(rgb(&img, 3, 1), [255, 255, 255, 255]);
        // Outline left of the stem is dark gray (L = 0.1).
        let o = rgb(&img, 2, 2);
        assert_eq!(o[3], 255);
        assert!(o[0] < 40 && o[0] == o[1]);
        // Far corner stays transparent.
        assert_eq!(rgb(&img, 7, 9)[3], 0);
    }

    #[test]
    fn test_color_markup() {
        let style = TextStyle::new(RGBA64::new(1.0, 0.0, 0.0, 1.0));
        let img = render_text("[:g:]![::]!", &style).unwrap();
        assert_eq!(rgb(&img, 3, 1), [0, 255, 0, 255]);
        assert_eq!(rgb(&img, 9, 1), [255, 0, 0, 255]);
        let img = render_text("[:240:1.0:0.5:]!", &style).unwrap();
        assert_eq!(rgb(&img, 3, 1), [0, 0, 255, 255]);
        let img = render_text("[:black:]!", &style).unwrap();
        assert_eq!(rgb(&img, 3, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_glow_outline_takes_hue() {
        let style = TextStyle::new(RGBA64::new(0.0, 0.0, 1.0, 1.0)).with_glow(true);
        let img = render_text("!", &style).unwrap();
        let o = img.get_pixel(2, 2).unwrap().straight();
        assert!(o.b > o.r && o.b > o.g);
        let plain = render_text("[:goff:]!", &style).unwrap();
        let p = plain.get_pixel(2, 2).unwrap().to_u8();
        assert!(p[2] < 60);
    }

    #[test]
    fn test_draw_text_position() {
        let img = Image::filled(20, 12, RGBA64::black()).unwrap();
        draw_text(&img, 4, 2, "!", &TextStyle::default()).unwrap();
        assert_eq!(rgb(&img, 6, 2), [255, 255, 255, 255]);
        assert_eq!(rgb(&img, 6, 7), [25, 25, 25, 255]);
        assert_eq!(rgb(&img, 0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_unknown_mode_fails() {
        let img = Image::filled(20, 12, RGBA64::black()).unwrap();
        let style = TextStyle::default().with_mode("nope");
        assert!(draw_text(&img, 0, 0, "x", &style).unwrap_err().is_unknown_name());
    }
}
