//! Benchmarks for gfx-rs operations.
//!
//! Run with: `cargo bench -p gfx-bench`

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use gfx_blend::ImageBlendExt;
use gfx_color::{ColorModel, Hsl, Lab};
use gfx_core::{Image, RGBA64, transfer};
use gfx_ops::filter::{self, ArgValue};
use gfx_ops::resize::{ResizeMethod, resize};
use gfx_ops::transform::rotate;

fn gradient(size: u32) -> Image {
    let s = (size - 1) as f64;
    Image::from_fn(size, size, |x, y| RGBA64::new(x as f64 / s, y as f64 / s, 0.5, 1.0))
        .unwrap_or_else(|e| panic!("gradient {size}: {e}"))
}

/// sRGB transfer curves.
fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");
    let values: Vec<f64> = (0..10_000).map(|i| i as f64 / 10_000.0).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("eotf", |b| {
        b.iter(|| values.iter().map(|&v| transfer::eotf(black_box(v))).collect::<Vec<_>>())
    });
    group.bench_function("oetf", |b| {
        b.iter(|| values.iter().map(|&v| transfer::oetf(black_box(v))).collect::<Vec<_>>())
    });

    group.finish();
}

/// Color model conversions through the canonical pixel.
fn bench_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("models");
    let pixels: Vec<RGBA64> = (0..4096)
        .map(|i| {
            let t = i as f64 / 4096.0;
            RGBA64::new(t, 1.0 - t, (t * 7.0).fract(), 1.0)
        })
        .collect();
    group.throughput(Throughput::Elements(pixels.len() as u64));

    group.bench_function("hsl_roundtrip", |b| {
        b.iter(|| pixels.iter().map(|p| Hsl::from_rgba64(black_box(p)).to_rgba64()).collect::<Vec<_>>())
    });
    group.bench_function("lab_roundtrip", |b| {
        b.iter(|| pixels.iter().map(|p| Lab::from_rgba64(black_box(p)).to_rgba64()).collect::<Vec<_>>())
    });

    group.finish();
}

/// Whole-image blending by mode family.
fn bench_blend(c: &mut Criterion) {
    let mut group = c.benchmark_group("blend");
    let bottom = gradient(256);
    let top = Image::filled(256, 256, RGBA64::new(0.9, 0.4, 0.1, 0.7)).unwrap_or_else(|e| panic!("{e}"));
    group.throughput(Throughput::Elements(256 * 256));

    for mode in ["normal", "multiply", "softlight", "add", "hue"] {
        group.bench_with_input(BenchmarkId::new("image", mode), &mode, |b, &mode| {
            b.iter(|| {
                let canvas = bottom.clone();
                canvas.blend(&top, mode, 0.8).unwrap_or_else(|e| panic!("{mode}: {e}"));
                canvas
            })
        });
    }

    group.finish();
}

/// Resampling and rotation.
fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    let img = gradient(256);

    for method in ResizeMethod::ALL {
        group.bench_with_input(BenchmarkId::new("resize_512", method.as_str()), &method, |b, &m| {
            b.iter(|| resize(black_box(&img), 512, 512, m))
        });
    }
    group.bench_function("rotate_30", |b| b.iter(|| rotate(black_box(&img), 30.0)));

    group.finish();
}

/// Registry filters with typical arguments.
fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");
    let img = gradient(256);
    let cases: [(&str, Vec<ArgValue>); 4] = [
        ("blur", vec![ArgValue::Int(4)]),
        ("sharpen", vec![0.5.into()]),
        ("hue", vec![0.25.into()]),
        ("grayscale", vec!["bt709".into()]),
    ];

    for (name, args) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), args, |b, args| {
            b.iter(|| filter::apply(name, black_box(&img), args))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transfer, bench_models, bench_blend, bench_geometry, bench_filters);

criterion_main!(benches);
