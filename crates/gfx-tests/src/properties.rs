//! Laws that must hold across every registered entry.

use std::collections::BTreeSet;

use approx::assert_abs_diff_eq;
use gfx_blend::{Category, registry as blends};
use gfx_color::{ModelDescriptor, Rgb, registry as models};
use gfx_core::{Image, RGBA64, Result, transfer};
use gfx_ops::filter;
use gfx_ops::projection;
use gfx_ops::resize::{ResizeMethod, resize};
use gfx_ops::transform::{flip_h, flip_v, rotate};

use crate::{gradient, init_tracing, palette};

#[test]
fn transfer_involution() {
    for i in 0..=1000 {
        let v = i as f64 / 1000.0;
        assert_abs_diff_eq!(transfer::oetf(transfer::eotf(v)), v, epsilon = 1e-9);
        assert_abs_diff_eq!(transfer::eotf(transfer::oetf(v)), v, epsilon = 1e-9);
    }
    for px in palette() {
        assert!(px.to_linear().to_srgb().approx_eq(&px, 1e-9), "{px:?}");
    }
}

#[test]
fn premultiply_involution() {
    for px in palette().into_iter().filter(|p| !p.is_transparent()) {
        assert!(px.premultiply().unpremultiply().approx_eq(&px, 1e-12), "{px:?}");
    }
    let clear = RGBA64::new(0.7, 0.2, 0.1, 0.0).premultiply();
    assert_eq!(clear.to_array(), [0.0; 4]);
}

#[test]
fn blend_alpha_law() {
    init_tracing();
    let colors = palette();
    for name in blends::list() {
        if name == "erase" {
            continue;
        }
        let mode = blends::get(&name).unwrap();
        for bottom in &colors {
            for top in &colors {
                for alpha in [0.25, 0.5, 1.0] {
                    let out = mode.blend(bottom, top, alpha).unwrap();
                    let a_s = alpha * top.a;
                    let expected = if a_s < gfx_blend::ALPHA_CUTOFF { bottom.a } else { bottom.a + a_s * (1.0 - bottom.a) };
                    assert_abs_diff_eq!(out.a, expected, epsilon = 1e-6);
                }
            }
        }
    }
}

#[test]
fn erase_alpha_rule() {
    let out = blends::blend("erase", &RGBA64::new(0.2, 0.4, 0.6, 0.8), &RGBA64::white(), 0.5).unwrap();
    assert_abs_diff_eq!(out.a, 0.4, epsilon = 1e-9);
    let s = out.straight();
    assert_abs_diff_eq!(s.g, 0.4, epsilon = 1e-9);
}

#[test]
fn blend_identity_without_coverage() {
    let colors = palette();
    let clear_top = RGBA64::new(0.9, 0.1, 0.3, 0.0);
    for name in blends::list() {
        let mode = blends::get(&name).unwrap();
        for bottom in &colors {
            for (top, alpha) in [(&colors[0], 0.0), (&clear_top, 1.0)] {
                let out = mode.blend(bottom, top, alpha).unwrap();
                assert!(out.approx_eq(bottom, 1e-9), "{name}: {bottom:?} changed to {out:?}");
            }
        }
    }
}

#[test]
fn blend_inputs_untouched() {
    let (bottom, top) = (RGBA64::new(0.3, 0.5, 0.7, 0.9), RGBA64::new(0.9, 0.2, 0.4, 0.6));
    let (b0, t0) = (bottom, top);
    for name in blends::list() {
        blends::blend(&name, &bottom, &top, 0.7).unwrap();
    }
    assert_eq!((bottom, top), (b0, t0));
}

fn assert_unique(names: &[String]) {
    let set: BTreeSet<&String> = names.iter().collect();
    assert_eq!(set.len(), names.len(), "duplicate names in {names:?}");
}

#[test]
fn registries_reject_duplicates() -> Result<()> {
    assert_unique(&blends::list());
    assert_unique(&models::list());
    assert_unique(&filter::list());
    assert_unique(&projection::list());

    let normal = blends::get("normal")?;
    let func = std::sync::Arc::new(|b: &RGBA64, _: &RGBA64, _: f64| *b);
    assert!(blends::register(normal.name(), "again", normal.category(), func).unwrap_err().is_duplicate());
    assert!(models::register(ModelDescriptor::of::<Rgb>()).unwrap_err().is_duplicate());
    assert!(filter::register((*filter::get("blur")?).clone()).unwrap_err().is_duplicate());
    assert!(projection::register((*projection::get("mercator")?).clone()).unwrap_err().is_duplicate());
    Ok(())
}

#[test]
fn categories_partition_blends() {
    let mut union = Vec::new();
    for &category in blends::categories() {
        let members = blends::by_category(category);
        assert!(members.iter().all(|m| m.category() == category));
        union.extend(members.iter().map(|m| m.name().to_string()));
    }
    union.sort();
    assert_eq!(union, blends::list());
    assert_eq!(blends::categories().len(), Category::ALL.len());
}

#[test]
fn parallel_matches_sequential() {
    let src = gradient(37, 23).unwrap();
    let f = |x: u32, y: u32, px: RGBA64| -> Result<RGBA64> {
        let t = ((x * 31 + y * 17) % 11) as f64 / 10.0;
        blends::blend("softlight", &px, &RGBA64::new(t, 1.0 - t, 0.5, 0.8), 0.6)
    };
    let (par, seq) = (src.clone(), src.clone());
    par.process_parallel(f).unwrap();
    seq.process_sequential(f).unwrap();
    assert_eq!(par.to_rgba16(), seq.to_rgba16());
}

#[test]
fn transform_identities() {
    let img = gradient(13, 9).unwrap();
    assert_eq!(rotate(&img, 0.0).unwrap(), img);
    assert_eq!(rotate(&img, 180.0).unwrap(), flip_h(&flip_v(&img).unwrap()).unwrap());
    for method in ResizeMethod::ALL {
        assert_eq!(resize(&img, 13, 9, method).unwrap(), img);
    }
}

#[test]
fn filters_never_mutate_input() {
    let img = gradient(12, 12).unwrap();
    let before = img.to_rgba16();
    for name in filter::list() {
        let f = filter::get(&name).unwrap();
        if f.meta().args.iter().any(|a| a.required) {
            continue;
        }
        if let Err(e) = f.apply(&img, &[]) {
            panic!("{name} failed with defaults: {e}");
        }
    }
    assert_eq!(img.to_rgba16(), before);
}

#[test]
fn images_share_nothing_after_clone() {
    let a = Image::filled(2, 2, RGBA64::black()).unwrap();
    let b = a.clone();
    b.set_pixel(0, 0, RGBA64::white()).unwrap();
    assert_eq!(a.get_pixel(0, 0).unwrap().to_u8(), [0, 0, 0, 255]);
}
