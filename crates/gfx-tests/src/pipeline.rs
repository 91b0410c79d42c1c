//! Multi-crate pipelines: build, process, save, load, describe.

use gfx_blend::ImageBlendExt;
use gfx_core::{Image, RGBA64, Rect};
use gfx_io::{Format, FormatWriter, JpegOptions, JpegWriter, PngOptions, PngWriter};
use gfx_ops::composition::{Composition, Layer};
use gfx_ops::draw::{self, Brush};
use gfx_ops::filter::{self, ArgValue};
use gfx_ops::{TextStyle, draw_text, projection, text_size};
use serde_json::Value;
use tempfile::tempdir;

use crate::{gradient, init_tracing};

fn poster() -> Image {
    let mut comp = Composition::new(64, 48).background(RGBA64::new(0.1, 0.1, 0.2, 1.0));
    comp.add_layer(Layer::new(gradient(64, 48).unwrap()).alpha(0.8).filter("blur", vec![ArgValue::Int(1)]));
    let badge = Image::filled(16, 16, RGBA64::new(1.0, 0.8, 0.0, 1.0)).unwrap();
    comp.add_layer(Layer::new(badge).blend_mode("screen").offset(40, 8));
    comp.filter("vibrance", vec![0.2.into()]);
    let img = comp.render().unwrap();
    draw_text(&img, 2, 36, "[:c:]gfx[:] rs", &TextStyle::default().with_glow(true)).unwrap();
    img
}

#[test]
fn compose_save_load_png() {
    init_tracing();
    let img = poster();
    let dir = tempdir().unwrap();
    let path = dir.path().join("poster.png");
    gfx_io::save(&path, &img, None).unwrap();
    let back = gfx_io::load(&path).unwrap();
    assert_eq!(back.to_rgba8(), img.to_rgba8());
    assert_eq!(back.metadata().source.as_deref(), Some(path.display().to_string().as_str()));

    let deep = dir.path().join("poster16.png");
    PngWriter::with_options(PngOptions::sixteen_bit()).write(&deep, &img).unwrap();
    assert_eq!(gfx_io::load(&deep).unwrap(), img);
}

#[test]
fn jpeg_preview_is_close_and_opaque() {
    init_tracing();
    let img = poster();
    let bytes = JpegWriter::with_options(JpegOptions { quality: 95 }).unwrap().write_to_memory(&img).unwrap();
    let back = gfx_io::read_from_memory(&bytes).unwrap();
    assert_eq!(back.dimensions(), img.dimensions());

    let (a, b) = (img.to_rgba8(), back.to_rgba8());
    let mean: f64 = a.iter().zip(&b).map(|(p, q)| (*p as f64 - *q as f64).abs()).sum::<f64>() / a.len() as f64;
    assert!(mean < 6.0, "mean abs error {mean}");
    assert!(b.chunks_exact(4).all(|p| p[3] == 255));
}

#[test]
fn transparent_canvas_flattens_to_white() {
    let img = Image::new(8, 8).unwrap();
    let bytes = gfx_io::write_to_memory(&img, Format::Jpeg).unwrap();
    let back = gfx_io::read_from_memory(&bytes).unwrap();
    let px = back.get_pixel(4, 4).unwrap().to_u8();
    assert!(px.iter().all(|&c| c >= 253), "{px:?}");
}

#[test]
fn draw_blend_filter_chain() {
    init_tracing();
    let canvas = Image::filled(32, 32, RGBA64::white()).unwrap();
    let ink = Brush::new(RGBA64::new(0.0, 0.0, 1.0, 1.0)).with_width(3);
    draw::rect(&canvas, Rect::new(4, 4, 24, 24), Some(&ink), None).unwrap();
    draw::circle(&canvas, 16, 16, 6, None, Some(&Brush::new(RGBA64::new(1.0, 0.0, 0.0, 1.0)))).unwrap();
    assert_eq!(canvas.get_pixel(16, 16).unwrap().to_u8(), [255, 0, 0, 255]);

    let tint = Image::filled(32, 32, RGBA64::new(0.0, 1.0, 0.0, 1.0)).unwrap();
    canvas.blend(&tint, "multiply", 1.0).unwrap();
    assert_eq!(canvas.get_pixel(16, 16).unwrap().to_u8(), [0, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(0, 0).unwrap().to_u8(), [0, 255, 0, 255]);

    let out = filter::apply("invert", &canvas, &[]).unwrap();
    assert_eq!(out.get_pixel(0, 0).unwrap().to_u8(), [255, 0, 255, 255]);
    assert!(out.metadata().get("filter.invert").is_some());
}

#[test]
fn text_metrics_match_render() {
    let style = TextStyle::default();
    let (w, h) = text_size("ab\nc");
    let img = gfx_ops::render_text("ab\nc", &style).unwrap();
    assert_eq!(img.dimensions(), (w, h));
    assert_eq!((w, h), (14, 18));
}

#[test]
fn reproject_roundtrip_keeps_center() {
    let img = gradient(64, 32).unwrap();
    let merc = projection::reproject(&img, "equirectangular", "mercator").unwrap();
    let back = projection::reproject(&merc, "mercator", "equirectangular").unwrap();
    let (a, b) = (img.get_pixel(32, 16).unwrap(), back.get_pixel(32, 16).unwrap());
    assert!(a.approx_eq(&b, 0.05), "{a:?} vs {b:?}");
    assert_eq!(back.metadata().get("projection"), Some("mercator->equirectangular"));
}

#[test]
fn descriptors_serialize_to_json() {
    let blend = gfx_blend::registry::get("overlay").unwrap();
    let v: Value = serde_json::to_value(blend.meta()).unwrap();
    assert_eq!(v["name"], "overlay");
    assert_eq!(v["category"], "contrast");

    let lab = gfx_color::registry::get("LAB").unwrap();
    let v = serde_json::to_value(lab.meta).unwrap();
    assert_eq!(v["name"], "LAB");
    assert_eq!(v["channels"].as_array().map(Vec::len), Some(4));

    let blur = filter::get("blur").unwrap();
    let v = serde_json::to_value(blur.meta()).unwrap();
    assert_eq!(v["args"][0]["name"], "radius");
    assert_eq!(v["args"][0]["type"], "int");
    assert_eq!(v["args"][0]["default"], 2);

    let polar = projection::get("polar").unwrap();
    let v = serde_json::to_value(polar.meta()).unwrap();
    assert_eq!(v["coords"].as_array().map(Vec::len), Some(2));

    let img = filter::apply("hue", &gradient(4, 4).unwrap(), &[0.25.into()]).unwrap();
    let v = serde_json::to_value(img.metadata()).unwrap();
    assert!(v["attributes"]["filter.hue"].is_string());
}
