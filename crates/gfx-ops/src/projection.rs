//! Map projections and image reprojection.
//!
//! A projection maps geographic coordinates (latitude, longitude in
//! degrees) to continuous pixel coordinates of a `w x h` frame, where pixel
//! `(i, j)` covers `[i, i+1) x [j, j+1)`. The inverse returns `None` for
//! points outside the mapped area.
//!
//! | Name | Notes |
//! |------|-------|
//! | `equirectangular` | plate carree, full frame |
//! | `mercator` | latitude clamped to +-85.05112878 |
//! | `sinusoidal` | equal-area, lens-shaped |
//! | `stereographic` | equatorial aspect, one hemisphere fitted to the frame |
//! | `polar` | azimuthal equidistant around the north pole |
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//! use gfx_ops::projection;
//!
//! let world = Image::filled(64, 32, RGBA64::white()).unwrap();
//! let disk = projection::reproject(&world, "equirectangular", "polar").unwrap();
//! assert_eq!(disk.dimensions(), (64, 32));
//! // Corners fall outside the polar disk.
//! assert_eq!(disk.get_pixel(0, 0).unwrap().to_u8()[3], 0);
//! ```

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt;
use std::sync::{Arc, OnceLock};

use gfx_core::{Error, Image, Registry, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace};

use crate::sample::{Buffer, CLEAR};
use crate::transform::inherit;

/// Mercator latitude limit; makes the projected map square.
pub const MERCATOR_MAX_LAT: f64 = 85.05112878;

/// One coordinate axis of a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordMeta {
    /// Axis name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Unit symbol
    pub unit: String,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl CoordMeta {
    /// Creates axis metadata.
    pub fn new(name: &str, description: &str, unit: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            unit: unit.into(),
            min,
            max,
        }
    }

    fn latitude(limit: f64) -> Self {
        Self::new("latitude", "north-south angle", "deg", -limit, limit)
    }

    fn longitude() -> Self {
        Self::new("longitude", "east-west angle", "deg", -180.0, 180.0)
    }
}

/// Descriptive data for a projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionMeta {
    /// Registry name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Latitude and longitude axes
    pub coords: [CoordMeta; 2],
}

/// `(lat, lon, w, h) -> (x, y)`
pub type ForwardFn = Arc<dyn Fn(f64, f64, f64, f64) -> (f64, f64) + Send + Sync>;
/// `(x, y, w, h) -> Some((lat, lon))`
pub type InverseFn = Arc<dyn Fn(f64, f64, f64, f64) -> Option<(f64, f64)> + Send + Sync>;

/// A registered projection.
#[derive(Clone)]
pub struct Projection {
    meta: ProjectionMeta,
    forward: ForwardFn,
    inverse: InverseFn,
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection").field("meta", &self.meta).finish_non_exhaustive()
    }
}

impl Projection {
    /// Creates a projection from its forward and inverse maps.
    pub fn new(meta: ProjectionMeta, forward: ForwardFn, inverse: InverseFn) -> Result<Self> {
        if meta.name.is_empty() {
            return Err(Error::invalid_argument("projection name must not be empty"));
        }
        Ok(Self { meta, forward, inverse })
    }

    /// Metadata.
    pub fn meta(&self) -> &ProjectionMeta {
        &self.meta
    }

    /// Registry name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Geographic to pixel coordinates.
    #[inline]
    pub fn to(&self, lat: f64, lon: f64, width: u32, height: u32) -> (f64, f64) {
        (self.forward)(lat, lon, width as f64, height as f64)
    }

    /// Pixel to geographic coordinates; `None` outside the mapped area.
    #[inline]
    pub fn from(&self, x: f64, y: f64, width: u32, height: u32) -> Option<(f64, f64)> {
        (self.inverse)(x, y, width as f64, height as f64)
    }
}

#[inline]
fn inside(x: f64, y: f64, w: f64, h: f64) -> bool {
    (0.0..=w).contains(&x) && (0.0..=h).contains(&y)
}

#[inline]
fn equirect_x(lon: f64, w: f64) -> f64 {
    (lon + 180.0) / 360.0 * w
}

#[inline]
fn equirect_y(lat: f64, h: f64) -> f64 {
    (90.0 - lat) / 180.0 * h
}

fn equirectangular() -> Result<Projection> {
    Projection::new(
        ProjectionMeta {
            name: "equirectangular".into(),
            description: "Plate carree: longitude and latitude map linearly to x and y".into(),
            coords: [CoordMeta::latitude(90.0), CoordMeta::longitude()],
        },
        Arc::new(|lat: f64, lon: f64, w: f64, h: f64| (equirect_x(lon, w), equirect_y(lat, h))),
        Arc::new(|x: f64, y: f64, w: f64, h: f64| inside(x, y, w, h).then(|| (90.0 - y / h * 180.0, x / w * 360.0 - 180.0))),
    )
}

fn mercator() -> Result<Projection> {
    Projection::new(
        ProjectionMeta {
            name: "mercator".into(),
            description: "Conformal cylinder; the square frame spans +-85.05 degrees".into(),
            coords: [CoordMeta::latitude(MERCATOR_MAX_LAT), CoordMeta::longitude()],
        },
        Arc::new(|lat: f64, lon: f64, w: f64, h: f64| {
            let phi = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
            let m = (FRAC_PI_4 + phi / 2.0).tan().ln();
            (equirect_x(lon, w), (PI - m) / (2.0 * PI) * h)
        }),
        Arc::new(|x: f64, y: f64, w: f64, h: f64| {
            if !inside(x, y, w, h) {
                return None;
            }
            let m = PI - y / h * 2.0 * PI;
            let lat = (2.0 * m.exp().atan() - FRAC_PI_2).to_degrees();
            Some((lat, x / w * 360.0 - 180.0))
        }),
    )
}

fn sinusoidal() -> Result<Projection> {
    Projection::new(
        ProjectionMeta {
            name: "sinusoidal".into(),
            description: "Equal-area; meridians are sine curves".into(),
            coords: [CoordMeta::latitude(90.0), CoordMeta::longitude()],
        },
        Arc::new(|lat: f64, lon: f64, w: f64, h: f64| {
            let k = lat.to_radians().cos();
            (equirect_x(lon * k, w), equirect_y(lat, h))
        }),
        Arc::new(|x: f64, y: f64, w: f64, h: f64| {
            if !inside(x, y, w, h) {
                return None;
            }
            let lat = 90.0 - y / h * 180.0;
            let k = lat.to_radians().cos();
            let scaled = x / w * 360.0 - 180.0;
            if k < 1e-12 {
                return (scaled.abs() < 1e-9).then_some((lat, 0.0));
            }
            let lon = scaled / k;
            (lon.abs() <= 180.0 + 1e-9).then(|| (lat, lon.clamp(-180.0, 180.0)))
        }),
    )
}

fn stereographic() -> Result<Projection> {
    Projection::new(
        ProjectionMeta {
            name: "stereographic".into(),
            description: "Equatorial stereographic; the hemisphere around (0, 0) fills the frame".into(),
            coords: [CoordMeta::latitude(90.0), CoordMeta::new("longitude", "east-west angle", "deg", -90.0, 90.0)],
        },
        Arc::new(|lat: f64, lon: f64, w: f64, h: f64| {
            let (phi, lam) = (lat.to_radians(), lon.to_radians());
            let k = 2.0 / (1.0 + phi.cos() * lam.cos());
            let (px, py) = (k * phi.cos() * lam.sin(), k * phi.sin());
            ((px + 2.0) / 4.0 * w, (2.0 - py) / 4.0 * h)
        }),
        Arc::new(|x: f64, y: f64, w: f64, h: f64| {
            if !inside(x, y, w, h) {
                return None;
            }
            let (px, py) = (x / w * 4.0 - 2.0, 2.0 - y / h * 4.0);
            let rho = px.hypot(py);
            if rho > 2.0 {
                return None;
            }
            if rho < 1e-12 {
                return Some((0.0, 0.0));
            }
            let c = 2.0 * (rho / 2.0).atan();
            let lat = (py * c.sin() / rho).clamp(-1.0, 1.0).asin();
            let lon = (px * c.sin()).atan2(rho * c.cos());
            Some((lat.to_degrees(), lon.to_degrees()))
        }),
    )
}

fn polar() -> Result<Projection> {
    Projection::new(
        ProjectionMeta {
            name: "polar".into(),
            description: "Azimuthal equidistant around the north pole; the south pole is the rim".into(),
            coords: [CoordMeta::latitude(90.0), CoordMeta::longitude()],
        },
        Arc::new(|lat: f64, lon: f64, w: f64, h: f64| {
            let r = (90.0 - lat) / 180.0 * w.min(h) / 2.0;
            let a = lon.to_radians();
            (w / 2.0 + r * a.sin(), h / 2.0 + r * a.cos())
        }),
        Arc::new(|x: f64, y: f64, w: f64, h: f64| {
            let rim = w.min(h) / 2.0;
            let (dx, dy) = (x - w / 2.0, y - h / 2.0);
            let r = dx.hypot(dy);
            if r > rim {
                return None;
            }
            let lon = if r < 1e-12 { 0.0 } else { dx.atan2(dy).to_degrees() };
            Some((90.0 - r / rim * 180.0, lon))
        }),
    )
}

fn global() -> &'static Registry<Projection> {
    static INSTANCE: OnceLock<Registry<Projection>> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let reg = Registry::new("projection");
        for p in [equirectangular(), mercator(), sinusoidal(), stereographic(), polar()] {
            match p {
                Ok(p) => {
                    let _ = reg.register(p.name().to_string(), p);
                }
                Err(e) => debug!(error = %e, "built-in projection rejected"),
            }
        }
        debug!(count = reg.len(), "projection registry initialized");
        reg
    })
}

/// Registers a projection.
///
/// # Errors
///
/// DuplicateRegistration if the name is taken.
pub fn register(projection: Projection) -> Result<()> {
    global().register(projection.name().to_string(), projection).map(|_| ())
}

/// Looks up a projection by name.
pub fn get(name: &str) -> Result<Arc<Projection>> {
    global().get(name)
}

/// All registered names, sorted.
pub fn list() -> Vec<String> {
    global().list()
}

/// Maps point (x, y) of a `w x h` frame from projection `src` to `dst`.
///
/// `Ok(None)` if the point is outside the area `src` maps.
pub fn convert_point(x: f64, y: f64, width: u32, height: u32, src: &str, dst: &str) -> Result<Option<(f64, f64)>> {
    let (from, to) = (get(src)?, get(dst)?);
    Ok(from.from(x, y, width, height).map(|(lat, lon)| to.to(lat, lon, width, height)))
}

/// Resamples `image`, assumed to be in projection `from`, into projection
/// `to` at the same size.
///
/// Output pixels outside the area either projection maps are transparent.
pub fn reproject(image: &Image, from: &str, to: &str) -> Result<Image> {
    let (src_proj, dst_proj) = (get(from)?, get(to)?);
    let (w, h) = image.dimensions();
    trace!(from, to, w, h, "projection::reproject");
    let buf = Buffer::from_image(image);
    let mut data = vec![CLEAR; w as usize * h as usize];
    data.par_chunks_mut(w as usize).enumerate().for_each(|(y, row)| {
        for (x, out) in row.iter_mut().enumerate() {
            *out = dst_proj
                .from(x as f64 + 0.5, y as f64 + 0.5, w, h)
                .and_then(|(lat, lon)| {
                    let (sx, sy) = src_proj.to(lat, lon, w, h);
                    buf.sample(sx, sy)
                })
                .unwrap_or(CLEAR);
        }
    });
    let out = Buffer {
        width: w as usize,
        height: h as usize,
        data,
    }
    .into_image()?;
    Ok(inherit(image, out, "projection", format!("{from}->{to}")))
}
