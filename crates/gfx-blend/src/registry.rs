//! Process-wide blend mode registry.
//!
//! The 33 built-in modes are registered on first access.
//!
//! ```rust
//! use gfx_blend::{Category, registry};
//! use gfx_core::RGBA64;
//!
//! let out = registry::blend("multiply", &RGBA64::white(), &RGBA64::new(1.0, 0.0, 0.0, 1.0), 1.0).unwrap();
//! assert_eq!(out.to_u8(), [255, 0, 0, 255]);
//! assert_eq!(registry::by_category(Category::Component).len(), 4);
//! ```

use std::sync::{Arc, OnceLock};

use gfx_core::{RGBA64, Registry, Result};
use tracing::{debug, trace};

use crate::mode::{BlendFn, BlendMode, Category};
use crate::modes;

fn global() -> &'static Registry<BlendMode> {
    static INSTANCE: OnceLock<Registry<BlendMode>> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let reg = Registry::new("blend mode");
        for (name, description, category, func) in modes::builtin() {
            if let Ok(mode) = BlendMode::new(name, description, category, func) {
                let _ = reg.register(name, mode);
            }
        }
        debug!(count = reg.len(), "blend registry initialized");
        reg
    })
}

/// Registers a custom mode.
///
/// # Errors
///
/// DuplicateRegistration if the name is taken, InvalidArgument on an empty
/// name or description.
pub fn register(name: &str, description: &str, category: Category, func: BlendFn) -> Result<()> {
    let mode = BlendMode::new(name, description, category, func)?;
    global().register(name, mode).map(|_| ())
}

/// Looks up a mode by name.
pub fn get(name: &str) -> Result<Arc<BlendMode>> {
    global().get(name)
}

/// All mode names, sorted.
pub fn list() -> Vec<String> {
    global().list()
}

/// Modes of one category, sorted by name. May be empty.
pub fn by_category(category: Category) -> Vec<Arc<BlendMode>> {
    global().filter(|m| m.category() == category)
}

/// Every category.
pub fn categories() -> &'static [Category] {
    &Category::ALL
}

/// Looks up `name` and blends `top` onto `bottom`.
pub fn blend(name: &str, bottom: &RGBA64, top: &RGBA64, alpha: f64) -> Result<RGBA64> {
    trace!(mode = name, alpha, "blend::blend");
    get(name)?.blend(bottom, top, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::separable;
    use crate::mode::Space;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scenarios() {
        let red = RGBA64::new(1.0, 0.0, 0.0, 1.0);
        assert!(blend("multiply", &RGBA64::white(), &red, 1.0).unwrap().approx_eq(&red, 1e-9));

        let gray = RGBA64::gray(0.5);
        assert!(blend("screen", &gray, &RGBA64::black(), 1.0).unwrap().approx_eq(&gray, 1e-9));
        assert!(blend("overlay", &gray, &gray, 1.0).unwrap().approx_eq(&gray, 0.01));

        let half_white = RGBA64::new(1.0, 1.0, 1.0, 0.5);
        let out = blend("normal", &gray, &half_white, 1.0).unwrap().straight();
        assert_abs_diff_eq!(out.r, 0.75, epsilon = 0.01);
        assert_abs_diff_eq!(out.a, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_erase_alpha() {
        let bottom = RGBA64::new(0.2, 0.4, 0.6, 0.8);
        let out = blend("erase", &bottom, &RGBA64::new(0.0, 0.0, 0.0, 0.5), 0.5).unwrap().straight();
        assert_abs_diff_eq!(out.a, 0.8 * 0.75, epsilon = 1e-9);
        assert_abs_diff_eq!(out.g, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_add_is_linear() {
        let g = RGBA64::gray(0.5);
        let out = blend("add", &g, &g, 1.0).unwrap().straight();
        let lin = g.to_linear().r * 2.0;
        assert_abs_diff_eq!(out.to_linear().r, lin, epsilon = 1e-9);
        let dodge = blend("lineardodge", &g, &g, 1.0).unwrap().straight();
        assert_abs_diff_eq!(dodge.r, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_and_duplicate() {
        assert!(get("burninate").unwrap_err().is_unknown_name());
        let f = separable(Space::Srgb, |a, _| a);
        assert!(register("normal", "again", Category::Basic, f).unwrap_err().is_duplicate());
    }

    #[test]
    fn test_register_custom() {
        let f = separable(Space::Srgb, |a, b| (a * b).sqrt());
        register("geometric_mean", "Per-channel geometric mean", Category::Special, f).unwrap();
        let out = blend("geometric_mean", &RGBA64::gray(0.25), &RGBA64::white(), 1.0).unwrap();
        assert_abs_diff_eq!(out.r, 0.5, epsilon = 1e-9);
        assert!(by_category(Category::Special).iter().any(|m| m.name() == "geometric_mean"));
    }

    #[test]
    fn test_categories_cover_builtins() {
        assert_eq!(categories().len(), 7);
        for (name, _, category, _) in modes::builtin() {
            let found = by_category(category);
            assert!(found.iter().any(|m| m.name() == name), "{name} missing from {category}");
            assert!(found.iter().all(|m| m.category() == category));
        }
    }

    #[test]
    fn test_meta_serializes() {
        let m = get("softlight").unwrap();
        let json = serde_json::to_value(m.meta()).unwrap();
        assert_eq!(json["category"], "contrast");
        assert_eq!(json["name"], "softlight");
    }
}
