//! Built-in blend formulas.
//!
//! `a` is the bottom channel, `b` the top channel, both straight and in
//! [0, 1]. Division edge cases follow the conventional definitions.

use std::sync::Arc;

use gfx_color::models::hsl::{ACHROMATIC_EPSILON, hsl_to_rgb, rgb_to_hsl};
use gfx_core::{REC709_LUMA, RGBA64};

use crate::mode::{ALPHA_CUTOFF, BlendFn, Category, Space, nonseparable, separable};

/// Bottom RGB untouched; alpha reduced by the top coverage.
fn erase() -> BlendFn {
    Arc::new(|bottom: &RGBA64, top: &RGBA64, alpha: f64| {
        let a_s = alpha * top.straight().a;
        let mut out = bottom.straight();
        if a_s >= ALPHA_CUTOFF {
            out.a *= 1.0 - a_s;
        }
        out
    })
}

pub(crate) fn color_burn(a: f64, b: f64) -> f64 {
    if a >= 1.0 {
        1.0
    } else if b <= 0.0 {
        0.0
    } else {
        (1.0 - (1.0 - a) / b).max(0.0)
    }
}

pub(crate) fn color_dodge(a: f64, b: f64) -> f64 {
    if a <= 0.0 {
        0.0
    } else if b >= 1.0 {
        1.0
    } else {
        (a / (1.0 - b)).min(1.0)
    }
}

fn overlay(a: f64, b: f64) -> f64 {
    if a <= 0.5 { 2.0 * a * b } else { 1.0 - 2.0 * (1.0 - a) * (1.0 - b) }
}

fn hard_light(a: f64, b: f64) -> f64 {
    overlay(b, a)
}

fn soft_light(a: f64, b: f64) -> f64 {
    if b <= 0.5 {
        a - (1.0 - 2.0 * b) * a * (1.0 - a)
    } else {
        a + (2.0 * b - 1.0) * (a.sqrt() - a)
    }
}

fn vivid_light(a: f64, b: f64) -> f64 {
    if b <= 0.5 { color_burn(a, 2.0 * b) } else { color_dodge(a, 2.0 * (b - 0.5)) }
}

fn linear_light(a: f64, b: f64) -> f64 {
    if b <= 0.5 {
        (a + 2.0 * b - 1.0).max(0.0)
    } else {
        (a + 2.0 * (b - 0.5)).min(1.0)
    }
}

fn pin_light(a: f64, b: f64) -> f64 {
    if b <= 0.5 { a.min(2.0 * b) } else { a.max(2.0 * b - 1.0) }
}

fn hard_mix(a: f64, b: f64) -> f64 {
    if a + b > 1.0 { 1.0 } else { 0.0 }
}

fn divide(a: f64, b: f64) -> f64 {
    if b <= 0.0 { 1.0 } else { (a / b).min(1.0) }
}

fn reflect(a: f64, b: f64) -> f64 {
    if b >= 1.0 {
        1.0
    } else if b <= 0.0 {
        0.0
    } else {
        (a * a / (1.0 - b)).min(1.0)
    }
}

fn glow(a: f64, b: f64) -> f64 {
    reflect(b, a)
}

fn luma(c: [f64; 3]) -> f64 {
    c[0] * REC709_LUMA[0] + c[1] * REC709_LUMA[1] + c[2] * REC709_LUMA[2]
}

fn hsl(c: [f64; 3]) -> (f64, f64, f64) {
    rgb_to_hsl(c[0], c[1], c[2])
}

fn rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    let (r, g, b) = hsl_to_rgb(h, s, l);
    [r, g, b]
}

fn hue(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let ((_, sa, la), (hb, _, _)) = (hsl(a), hsl(b));
    if sa < ACHROMATIC_EPSILON { b } else { rgb(hb, sa, la) }
}

fn saturation(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let ((ha, sa, la), (_, sb, _)) = (hsl(a), hsl(b));
    if sa < ACHROMATIC_EPSILON { b } else { rgb(ha, sb, la) }
}

fn color(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let ((ha, sa, _), (_, _, lb)) = (hsl(a), hsl(b));
    rgb(ha, sa, lb)
}

fn luminosity(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let ((ha, sa, _), (_, _, lb)) = (hsl(a), hsl(b));
    rgb(ha, sa, lb)
}

/// (name, description, category, function) for every built-in mode.
pub(crate) fn builtin() -> Vec<(&'static str, &'static str, Category, BlendFn)> {
    use Category::*;
    use Space::{Linear, Srgb};
    vec![
        ("normal", "Top color over bottom", Basic, separable(Srgb, |_, b| b)),
        ("erase", "Removes bottom coverage where the top is opaque", Basic, erase()),
        ("darken", "Per-channel minimum", Darken, separable(Srgb, f64::min)),
        ("multiply", "Per-channel product", Darken, separable(Srgb, |a, b| a * b)),
        ("colorburn", "Darkens bottom by increasing contrast", Darken, separable(Srgb, color_burn)),
        ("linearburn", "Sum minus one, floored at zero", Darken, separable(Srgb, |a, b| (a + b - 1.0).max(0.0))),
        (
            "darkercolor",
            "Whichever color has the lower luminance",
            Darken,
            nonseparable(|a, b| if luma(b) < luma(a) { b } else { a }),
        ),
        ("lighten", "Per-channel maximum", Lighten, separable(Srgb, f64::max)),
        ("screen", "Inverse product of inverses", Lighten, separable(Srgb, |a, b| 1.0 - (1.0 - a) * (1.0 - b))),
        ("colordodge", "Brightens bottom by decreasing contrast", Lighten, separable(Srgb, color_dodge)),
        ("add", "Sum in linear light, clamped", Lighten, separable(Linear, |a, b| (a + b).min(1.0))),
        ("lineardodge", "Sum in sRGB, clamped", Lighten, separable(Srgb, |a, b| (a + b).min(1.0))),
        (
            "lightercolor",
            "Whichever color has the higher luminance",
            Lighten,
            nonseparable(|a, b| if luma(b) > luma(a) { b } else { a }),
        ),
        ("overlay", "Multiply or screen keyed on the bottom", Contrast, separable(Srgb, overlay)),
        ("softlight", "Gentle darken or lighten keyed on the top", Contrast, separable(Srgb, soft_light)),
        ("hardlight", "Multiply or screen keyed on the top", Contrast, separable(Srgb, hard_light)),
        ("vividlight", "Color burn or dodge keyed on the top", Contrast, separable(Srgb, vivid_light)),
        ("linearlight", "Linear burn or dodge keyed on the top", Contrast, separable(Srgb, linear_light)),
        ("pinlight", "Replaces channels depending on the top", Contrast, separable(Srgb, pin_light)),
        ("hardmix", "Posterizes each channel to 0 or 1", Contrast, separable(Srgb, hard_mix)),
        ("difference", "Absolute difference", Comparative, separable(Srgb, |a, b| (a - b).abs())),
        ("exclusion", "Low-contrast difference", Comparative, separable(Srgb, |a, b| a + b - 2.0 * a * b)),
        ("subtract", "Bottom minus top, floored at zero", Comparative, separable(Srgb, |a, b| (a - b).max(0.0))),
        ("divide", "Bottom divided by top", Comparative, separable(Srgb, divide)),
        ("negation", "Inverted absolute inverse sum", Comparative, separable(Srgb, |a, b| 1.0 - (1.0 - a - b).abs())),
        (
            "contrastnegate",
            "Absolute difference lifted by one half",
            Comparative,
            separable(Srgb, |a, b| ((a - b).abs() + 0.5).min(1.0)),
        ),
        ("hue", "Hue of the top with saturation and lightness of the bottom", Component, nonseparable(hue)),
        (
            "saturation",
            "Saturation of the top with hue and lightness of the bottom",
            Component,
            nonseparable(saturation),
        ),
        ("color", "Hue and saturation of the bottom with lightness of the top", Component, nonseparable(color)),
        ("luminosity", "Lightness of the top with hue and saturation of the bottom", Component, nonseparable(luminosity)),
        ("reflect", "Squared bottom over inverse top", Special, separable(Srgb, reflect)),
        ("glow", "Squared top over inverse bottom", Special, separable(Srgb, glow)),
        ("average", "Mean of both colors in linear light", Special, separable(Linear, |a, b| (a + b) * 0.5)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_division_edges() {
        assert_eq!(color_burn(1.0, 0.0), 1.0);
        assert_eq!(color_burn(0.5, 0.0), 0.0);
        assert_eq!(color_dodge(0.0, 1.0), 0.0);
        assert_eq!(color_dodge(0.5, 1.0), 1.0);
        assert_eq!(divide(0.3, 0.0), 1.0);
        assert_eq!(reflect(0.5, 0.0), 0.0);
        assert_eq!(reflect(0.5, 1.0), 1.0);
        assert_eq!(glow(0.0, 0.5), 0.0);
        assert_eq!(glow(1.0, 0.5), 1.0);
    }

    #[test]
    fn test_contrast_formulas() {
        assert_abs_diff_eq!(overlay(0.5, 0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(overlay(0.75, 0.5), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(soft_light(0.25, 0.5), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(soft_light(0.25, 1.0), 0.5, epsilon = 1e-12);
        assert_eq!(hard_mix(0.6, 0.5), 1.0);
        assert_eq!(hard_mix(0.5, 0.5), 0.0);
        assert_abs_diff_eq!(pin_light(0.9, 0.25), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(linear_light(0.5, 0.75), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_component_gray_bottom_passes_top() {
        let top = [1.0, 0.0, 0.0];
        assert_eq!(hue([0.5; 3], top), top);
        assert_eq!(saturation([0.5; 3], top), top);
    }

    #[test]
    fn test_luminosity_keeps_hue() {
        let out = luminosity([1.0, 0.0, 0.0], [0.25; 3]);
        let (h, s, l) = hsl(out);
        assert_abs_diff_eq!(h, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(l, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_color_keeps_bottom_chroma() {
        let out = color([1.0, 0.0, 0.0], [0.25; 3]);
        assert_abs_diff_eq!(out[0], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(out[1], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out[2], 0.0, epsilon = 1e-9);
        let (h, s, l) = hsl(color([0.2, 0.4, 0.8], [0.9, 0.1, 0.1]));
        let (hb, sb, _) = hsl([0.2, 0.4, 0.8]);
        let (_, _, lt) = hsl([0.9, 0.1, 0.1]);
        assert_abs_diff_eq!(h, hb, epsilon = 1e-9);
        assert_abs_diff_eq!(s, sb, epsilon = 1e-9);
        assert_abs_diff_eq!(l, lt, epsilon = 1e-9);
    }

    #[test]
    fn test_builtin_count_and_names_unique() {
        let modes = builtin();
        assert_eq!(modes.len(), 33);
        let mut names: Vec<_> = modes.iter().map(|m| m.0).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 33);
    }
}
