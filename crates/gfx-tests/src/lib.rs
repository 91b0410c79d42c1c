//! Integration tests for gfx-rs crates.
//!
//! End-to-end checks that exercise several crates together: blend and color
//! laws over whole registries, transform round trips, filter pipelines and
//! file I/O. The helpers below are shared by the test modules.
//!
//! Set `RUST_LOG=debug` to see pipeline logs while the tests run.

use std::sync::Once;

use gfx_core::{Image, RGBA64, Result};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per process.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
        tracing::debug!("test tracing initialized");
    });
}

/// Black and white checkerboard of `cell`-sized squares, white at the origin.
pub fn checkerboard(size: u32, cell: u32) -> Result<Image> {
    Image::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            RGBA64::white()
        } else {
            RGBA64::black()
        }
    })
}

/// Smooth opaque gradient: red across, green down, constant blue.
pub fn gradient(width: u32, height: u32) -> Result<Image> {
    let (w, h) = ((width.max(2) - 1) as f64, (height.max(2) - 1) as f64);
    Image::from_fn(width, height, |x, y| RGBA64::new(x as f64 / w, y as f64 / h, 0.4, 1.0))
}

/// Primaries, secondaries, grays and a few partially transparent colors.
pub fn palette() -> Vec<RGBA64> {
    let mut colors = vec![
        RGBA64::new(1.0, 0.0, 0.0, 1.0),
        RGBA64::new(0.0, 1.0, 0.0, 1.0),
        RGBA64::new(0.0, 0.0, 1.0, 1.0),
        RGBA64::new(0.0, 1.0, 1.0, 1.0),
        RGBA64::new(1.0, 0.0, 1.0, 1.0),
        RGBA64::new(1.0, 1.0, 0.0, 1.0),
        RGBA64::new(0.8, 0.3, 0.1, 1.0),
        RGBA64::new(0.2, 0.6, 0.9, 0.75),
        RGBA64::new(0.5, 0.1, 0.4, 0.25),
    ];
    colors.extend([0.0, 0.25, 0.5, 0.75, 1.0].map(RGBA64::gray));
    colors
}

/// Distance from `v` to the nearest multiple of `cell`, measured from pixel
/// centers.
pub fn edge_distance(v: u32, cell: u32) -> f64 {
    let c = v as f64 + 0.5;
    let r = c % cell as f64;
    r.min(cell as f64 - r)
}

#[cfg(test)]
mod pipeline;
#[cfg(test)]
mod properties;
#[cfg(test)]
mod scenarios;
