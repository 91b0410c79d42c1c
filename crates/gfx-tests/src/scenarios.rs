//! Concrete end-to-end scenarios with known answers.

use approx::assert_abs_diff_eq;
use gfx_blend::registry::blend;
use gfx_color::{ColorModel, Hex};
use gfx_core::RGBA64;
use gfx_ops::transform::{crop, rotate};

use crate::{checkerboard, edge_distance, init_tracing};

fn assert_straight(px: RGBA64, expected: [f64; 4], eps: f64) {
    let s = px.straight();
    for (got, want) in s.to_array().iter().zip(expected) {
        assert_abs_diff_eq!(*got, want, epsilon = eps);
    }
}

#[test]
fn multiply_white_by_red() {
    let out = blend("multiply", &RGBA64::white(), &RGBA64::new(1.0, 0.0, 0.0, 1.0), 1.0).unwrap();
    assert_straight(out, [1.0, 0.0, 0.0, 1.0], 1e-9);
}

#[test]
fn screen_with_black_is_identity() {
    let out = blend("screen", &RGBA64::gray(0.5), &RGBA64::black(), 1.0).unwrap();
    assert_straight(out, [0.5, 0.5, 0.5, 1.0], 1e-9);
}

#[test]
fn overlay_gray_on_gray() {
    let out = blend("overlay", &RGBA64::gray(0.5), &RGBA64::gray(0.5), 1.0).unwrap();
    assert_straight(out, [0.5, 0.5, 0.5, 1.0], 0.01);
}

#[test]
fn normal_half_white_over_gray() {
    let out = blend("normal", &RGBA64::gray(0.5), &RGBA64::new(1.0, 1.0, 1.0, 0.5), 1.0).unwrap();
    assert_straight(out, [0.75, 0.75, 0.75, 1.0], 0.01);
}

#[test]
fn hex_roundtrip() {
    let px = Hex::parse("#FF8040").unwrap().to_rgba64();
    assert_abs_diff_eq!(px.r, 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(px.g, 0.5020, epsilon = 1e-4);
    assert_abs_diff_eq!(px.b, 0.2510, epsilon = 1e-4);
    assert_eq!(Hex::from_rgba64(&px).to_string(), "#FF8040");
}

#[test]
fn rotate_there_and_back() {
    init_tracing();
    const SIZE: u32 = 64;
    const CELL: u32 = 16;
    let board = checkerboard(SIZE, CELL).unwrap();

    let turned = rotate(&board, 30.0).unwrap();
    let back = rotate(&turned, -30.0).unwrap();
    let (w, h) = back.dimensions();
    assert!(w >= SIZE && h >= SIZE);
    let restored = crop(&back, ((w - SIZE) / 2) as i64, ((h - SIZE) / 2) as i64, SIZE, SIZE).unwrap();

    // Bilinear resampling twice smears every cell edge, so the 99% bar holds only
    // for pixels more than 2 px from a cell boundary. Over the whole board the
    // ratio lands near 76.6%.
    let (mut interior, mut good, mut good_all) = (0usize, 0usize, 0usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let a = board.get_pixel(x, y).unwrap().to_u8();
            let b = restored.get_pixel(x, y).unwrap().to_u8();
            let l1: i32 = a.iter().zip(b).map(|(p, q)| (*p as i32 - q as i32).abs()).sum();
            let ok = (l1 as f64) < 2.0;
            good_all += ok as usize;
            if edge_distance(x, CELL) <= 2.0 || edge_distance(y, CELL) <= 2.0 {
                continue;
            }
            interior += 1;
            good += ok as usize;
        }
    }
    let whole = good_all as f64 / (SIZE * SIZE) as f64;
    assert!(whole >= 0.75 && whole < 0.99, "whole-board ratio {whole}");
    assert!(interior > 0);
    let ratio = good as f64 / interior as f64;
    assert!(ratio >= 0.99, "only {good}/{interior} interior pixels survived the round trip");
}
