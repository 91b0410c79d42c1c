//! Per-pixel color filters.
//!
//! HSL values are derived from the straight sRGB pixel; alpha passes
//! through untouched. Every filter runs on a copy via
//! [`Image::process_parallel`].

use gfx_color::models::hsl::{hsl_to_rgb, rgb_to_hsl};
use gfx_color::{GrayMethod, wrap_hue};
use gfx_core::{Image, RGBA64, Result};

use super::{Filter, FilterArg, builtin};

fn per_pixel(img: &Image, f: impl Fn(RGBA64) -> RGBA64 + Sync + Send) -> Result<Image> {
    let out = img.clone();
    out.process_parallel(|_, _, px| Ok(f(px.straight())))?;
    Ok(out)
}

fn per_hsl(img: &Image, f: impl Fn(f64, f64, f64) -> (f64, f64, f64) + Sync + Send) -> Result<Image> {
    per_pixel(img, |px| {
        let (h, s, l) = rgb_to_hsl(px.r.clamp(0.0, 1.0), px.g.clamp(0.0, 1.0), px.b.clamp(0.0, 1.0));
        let (h, s, l) = f(h, s, l);
        let (r, g, b) = hsl_to_rgb(wrap_hue(h), s.clamp(0.0, 1.0), l.clamp(0.0, 1.0));
        RGBA64::new(r, g, b, px.a)
    })
}

fn per_rgb(img: &Image, f: impl Fn(f64) -> f64 + Sync + Send) -> Result<Image> {
    per_pixel(img, |px| {
        RGBA64::new(
            f(px.r).clamp(0.0, 1.0),
            f(px.g).clamp(0.0, 1.0),
            f(px.b).clamp(0.0, 1.0),
            px.a,
        )
    })
}

/// Deterministic per-pixel hash mapped to [-1, 1).
fn hash_noise(seed: u64, x: u32, y: u32) -> f64 {
    // FNV-1a over the coordinates, then a murmur finalizer for avalanche.
    let mut h = seed.wrapping_add(0xcbf2_9ce4_8422_2325);
    for v in [x as u64, y as u64] {
        h = (h ^ v).wrapping_mul(0x0100_0000_01b3);
    }
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    (h >> 11) as f64 / (1u64 << 52) as f64 - 1.0
}

/// Alpha ramp from `value` between two thresholds; `lower > upper` inverts it.
fn alpha_ramp(value: f64, lower: f64, upper: f64) -> f64 {
    let (lo, hi, invert) = if lower > upper { (upper, lower, true) } else { (lower, upper, false) };
    let a = if value <= lo {
        0.0
    } else if value >= hi {
        1.0
    } else {
        (value - lo) / (hi - lo)
    };
    if invert { 1.0 - a } else { a }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn amount(range: (f64, f64), default: f64) -> FilterArg {
    FilterArg::float("amount", "filter strength", range.0, range.1, default)
}

const SIGNED: (f64, f64) = (-1.0, 1.0);
const UNIT: (f64, f64) = (0.0, 1.0);

#[rustfmt::skip]
const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

pub(super) fn filters() -> Vec<Result<Filter>> {
    vec![
        builtin("hue", "Rotates hue by amount * 360 degrees", "hue 0.5", vec![amount(SIGNED, 0.0)], |img, a| {
            let k = a.float("amount")?;
            per_hsl(img, |h, s, l| (h + k * 360.0, s, l))
        }),
        builtin(
            "saturation",
            "Scales saturation by 1 + amount",
            "saturation -0.5",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| (h, s * (1.0 + k), l))
            },
        ),
        builtin(
            "saturation_contrast",
            "Pulls saturation toward 0.5 (positive) or away from it (negative)",
            "saturation_contrast 0.3",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| (h, s + (0.5 - s) * k, l))
            },
        ),
        builtin(
            "luminance",
            "Moves lightness toward white (positive) or black (negative)",
            "luminance 0.2",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| (h, s, if k >= 0.0 { l + (1.0 - l) * k } else { l * (1.0 + k) }))
            },
        ),
        builtin(
            "vibrance",
            "Moves saturation toward 1 by amount",
            "vibrance 0.4",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| (h, s + (1.0 - s) * k, l))
            },
        ),
        builtin(
            "threshold",
            "Black or white by lightness cut-off",
            "threshold 0.5",
            vec![amount(UNIT, 0.5)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, _, l| (h, 0.0, if l > k { 1.0 } else { 0.0 }))
            },
        ),
        builtin(
            "contrast",
            "Pushes lightness away from mid gray",
            "contrast 0.5",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| (h, s, l + (l - 0.5) * k))
            },
        ),
        builtin(
            "luminance_contrast",
            "Scales lightness around mid gray by 1 + amount",
            "luminance_contrast 0.5",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| (h, s, (l - 0.5) * (1.0 + k) + 0.5))
            },
        ),
        builtin(
            "brightness",
            "Adds amount to every color channel",
            "brightness 0.1",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_rgb(img, |c| c + k)
            },
        ),
        builtin(
            "gamma",
            "Raises channels to 1 / (1 + amount)",
            "gamma 1.2",
            vec![amount((0.0, 5.0), 0.0)],
            |img, a| {
                let e = 1.0 / (1.0 + a.float("amount")?);
                per_rgb(img, |c| c.max(0.0).powf(e))
            },
        ),
        builtin(
            "grayscale",
            "Replaces color with a gray value",
            "grayscale bt709",
            vec![FilterArg::choice(
                "method",
                "reduction",
                &GrayMethod::ALL.map(|m| m.as_str()),
                GrayMethod::default().as_str(),
            )],
            |img, a| {
                let method: GrayMethod = a.str("method")?.parse()?;
                per_pixel(img, |px| {
                    let v = method.reduce(px.r, px.g, px.b).clamp(0.0, 1.0);
                    RGBA64::new(v, v, v, px.a)
                })
            },
        ),
        builtin("invert", "Blends each channel toward 1 - c", "invert 1.0", vec![amount(UNIT, 1.0)], |img, a| {
            let k = a.float("amount")?;
            per_rgb(img, |c| lerp(c, 1.0 - c, k))
        }),
        builtin("sepia", "Sepia tone mixed in by amount", "sepia 0.8", vec![amount(UNIT, 1.0)], |img, a| {
            let k = a.float("amount")?;
            per_pixel(img, |px| {
                let toned = SEPIA.map(|row| (row[0] * px.r + row[1] * px.g + row[2] * px.b).clamp(0.0, 1.0));
                RGBA64::new(lerp(px.r, toned[0], k), lerp(px.g, toned[1], k), lerp(px.b, toned[2], k), px.a)
            })
        }),
        builtin(
            "pastelize",
            "Lowers saturation and raises lightness",
            "pastelize 0.5",
            vec![amount(UNIT, 0.5)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| (h, s * (1.0 - k), l + (1.0 - l) * k))
            },
        ),
        builtin(
            "colorize",
            "Pulls hue toward a target and saturation toward 1",
            "colorize 200 0.5",
            vec![FilterArg::float("hue", "target hue in degrees", 0.0, 360.0, 0.0), amount(UNIT, 0.5)],
            |img, a| {
                let target = a.float("hue")?;
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| {
                    // Shortest signed arc from h to target.
                    let d = (target - h + 540.0).rem_euclid(360.0) - 180.0;
                    (h + d * k, lerp(s, 1.0, k), l)
                })
            },
        ),
        builtin(
            "color_shift",
            "Adds offsets to hue, saturation and lightness",
            "color_shift 30 0.1 -0.1",
            vec![
                FilterArg::float("hue", "hue offset in degrees", -360.0, 360.0, 0.0).with_step(1.0),
                FilterArg::float("saturation", "saturation offset", -1.0, 1.0, 0.0),
                FilterArg::float("lightness", "lightness offset", -1.0, 1.0, 0.0),
            ],
            |img, a| {
                let (dh, ds, dl) = (a.float("hue")?, a.float("saturation")?, a.float("lightness")?);
                per_hsl(img, |h, s, l| (h + dh, s + ds, l + dl))
            },
        ),
        builtin(
            "hue_contrast",
            "Pulls hue toward 180 degrees (positive) or away from it (negative)",
            "hue_contrast 0.5",
            vec![amount(SIGNED, 0.0)],
            |img, a| {
                let k = a.float("amount")?;
                per_hsl(img, |h, s, l| {
                    let t = (0.5 + (h / 360.0 - 0.5) * (1.0 - k)).clamp(0.0, 1.0);
                    (t * 360.0, s, l)
                })
            },
        ),
        builtin(
            "alpha_map",
            "Derives alpha from saturation and/or lightness between two thresholds",
            "alpha_map l 0.2 0.8",
            vec![
                FilterArg::choice("source", "channel feeding alpha", &["s", "l", "s*l"], "l"),
                FilterArg::float("lower", "value mapped to alpha 0", 0.0, 1.0, 0.0),
                FilterArg::float("upper", "value mapped to alpha 1", 0.0, 1.0, 1.0),
            ],
            |img, a| {
                let source = a.str("source")?.to_string();
                let (lower, upper) = (a.float("lower")?, a.float("upper")?);
                per_pixel(img, |px| {
                    let (_, s, l) = rgb_to_hsl(px.r.clamp(0.0, 1.0), px.g.clamp(0.0, 1.0), px.b.clamp(0.0, 1.0));
                    let v = match source.as_str() {
                        "s" => s,
                        "l" => l,
                        _ => s * l,
                    };
                    RGBA64::new(px.r, px.g, px.b, alpha_ramp(v, lower, upper))
                })
            },
        ),
        builtin(
            "extract",
            "Keeps a single channel",
            "extract g",
            vec![FilterArg::choice("channel", "channel to keep", &["r", "g", "b", "a"], "r")],
            |img, a| {
                let channel = a.str("channel")?.to_string();
                per_pixel(img, |px| match channel.as_str() {
                    "r" => RGBA64::new(px.r, 0.0, 0.0, 1.0),
                    "g" => RGBA64::new(0.0, px.g, 0.0, 1.0),
                    "b" => RGBA64::new(0.0, 0.0, px.b, 1.0),
                    _ => RGBA64::new(0.0, 0.0, 0.0, px.a),
                })
            },
        ),
        builtin(
            "noise",
            "Scales each pixel's color by 1 + n, n uniform in [-amount, amount]",
            "noise 0.1 7",
            vec![amount(UNIT, 0.1), FilterArg::int("seed", "noise pattern", 0, u32::MAX as i64, 0)],
            |img, a| {
                let k = a.float("amount")?;
                let seed = a.int("seed")? as u64;
                let out = img.clone();
                out.process_parallel(|x, y, px| {
                    let px = px.straight();
                    let f = 1.0 + hash_noise(seed, x, y) * k;
                    let c = |v: f64| (v * f).clamp(0.0, 1.0);
                    Ok(RGBA64::new(c(px.r), c(px.g), c(px.b), px.a))
                })?;
                Ok(out)
            },
        ),
    ]
}
