//! Geometric filters wrapping [`transform`](crate::transform),
//! [`resize`](crate::resize) and [`projection`](crate::projection).

use gfx_core::Result;

use super::{Filter, FilterArg, builtin};
use crate::projection;
use crate::resize::{ResizeMethod, scale};
use crate::transform::{crop, crop_circle, flip_h, flip_v, rotate, to_polar, translate, translate_wrap};

const COORD_LIMIT: i64 = 1 << 24;

pub(super) fn filters() -> Vec<Result<Filter>> {
    let methods = ResizeMethod::ALL.map(|m| m.as_str());
    let names = projection::list();
    let projections: Vec<&str> = names.iter().map(String::as_str).collect();
    vec![
        builtin("flip_h", "Mirrors left to right", "flip_h", vec![], |img, _| flip_h(img)),
        builtin("flip_v", "Mirrors top to bottom", "flip_v", vec![], |img, _| flip_v(img)),
        builtin(
            "rotate",
            "Counter-clockwise rotation; the canvas grows to fit",
            "rotate 30",
            vec![FilterArg::float("angle", "degrees", -360.0, 360.0, 0.0).with_step(1.0)],
            |img, a| rotate(img, a.float("angle")?),
        ),
        builtin(
            "scale",
            "Uniform resize by a factor",
            "scale 0.5 lanczos",
            vec![
                FilterArg::float("factor", "size multiplier", 0.01, 16.0, 1.0),
                FilterArg::choice("method", "resampling", &methods, ResizeMethod::default().as_str()),
            ],
            |img, a| scale(img, a.float("factor")?, a.str("method")?.parse()?),
        ),
        builtin(
            "crop",
            "Extracts a rectangle",
            "crop 10 10 64 48",
            vec![
                FilterArg::int("x", "left edge", 0, COORD_LIMIT, 0),
                FilterArg::int("y", "top edge", 0, COORD_LIMIT, 0),
                FilterArg::int("width", "region width", 1, COORD_LIMIT, 1).required(),
                FilterArg::int("height", "region height", 1, COORD_LIMIT, 1).required(),
            ],
            |img, a| crop(img, a.int("x")?, a.int("y")?, a.int("width")? as u32, a.int("height")? as u32),
        ),
        builtin(
            "translate",
            "Integer shift; exposed pixels are transparent",
            "translate 5 -3",
            vec![
                FilterArg::int("dx", "horizontal shift", -COORD_LIMIT, COORD_LIMIT, 0),
                FilterArg::int("dy", "vertical shift", -COORD_LIMIT, COORD_LIMIT, 0),
            ],
            |img, a| translate(img, a.int("dx")?, a.int("dy")?),
        ),
        builtin(
            "translate_wrap",
            "Integer shift; content leaving one edge re-enters at the opposite edge",
            "translate_wrap 5 -3",
            vec![
                FilterArg::int("dx", "horizontal shift", -COORD_LIMIT, COORD_LIMIT, 0),
                FilterArg::int("dy", "vertical shift", -COORD_LIMIT, COORD_LIMIT, 0),
            ],
            |img, a| translate_wrap(img, a.int("dx")?, a.int("dy")?),
        ),
        builtin(
            "crop_circle",
            "Clears everything outside a circle",
            "crop_circle 0.4 0 0",
            vec![
                FilterArg::float("radius", "fraction of the longer side", 0.0, 2.0, 0.5),
                FilterArg::float("offset_x", "center shift as a fraction of half the width", -1.0, 1.0, 0.0),
                FilterArg::float("offset_y", "center shift as a fraction of half the height", -1.0, 1.0, 0.0),
            ],
            |img, a| crop_circle(img, a.float("radius")?, a.float("offset_x")?, a.float("offset_y")?),
        ),
        builtin(
            "to_polar",
            "Wraps the image around its center",
            "to_polar 0 360 0 0.2",
            vec![
                FilterArg::float("angle_start", "sweep start in degrees", 0.0, 360.0, 0.0).with_step(1.0),
                FilterArg::float("angle_end", "sweep end in degrees", 0.0, 360.0, 360.0).with_step(1.0),
                FilterArg::float("rotation", "degrees", -360.0, 360.0, 0.0).with_step(1.0),
                FilterArg::float("fisheye", "radial bend", -0.9, 1.0, 0.0),
            ],
            |img, a| {
                to_polar(
                    img,
                    a.float("angle_start")?,
                    a.float("angle_end")?,
                    a.float("rotation")?,
                    a.float("fisheye")?,
                )
            },
        ),
        builtin(
            "reproject",
            "Resamples between map projections",
            "reproject equirectangular polar",
            vec![
                FilterArg::choice("from", "source projection", &projections, "equirectangular"),
                FilterArg::choice("to", "target projection", &projections, "equirectangular"),
            ],
            |img, a| projection::reproject(img, a.str("from")?, a.str("to")?),
        ),
    ]
}
