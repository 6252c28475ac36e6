//! SIMD row reductions using the `wide` crate.
//!
//! The apodized kernel spends nearly all of its time in two row reductions;
//! these process eight samples per step with `f32x8` and finish the
//! remainder in scalar code.

use wide::f32x8;

const LANES: usize = 8;

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

#[inline]
fn hsum(v: f32x8) -> f32 {
    v.to_array().iter().sum()
}

/// Dot product of two equal-length rows.
#[inline]
pub(crate) fn dot_row(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    let simd_end = len / LANES * LANES;
    let mut acc = f32x8::ZERO;
    let mut i = 0;
    while i < simd_end {
        acc += load_f32x8(&a[i..]) * load_f32x8(&b[i..]);
        i += LANES;
    }
    let mut tail = 0.0f32;
    while i < len {
        tail += a[i] * b[i];
        i += 1;
    }
    hsum(acc) + tail
}

/// `sum(w * s^2)` over two equal-length rows.
#[inline]
pub(crate) fn weighted_sq_row(w: &[f32], s: &[f32]) -> f32 {
    let len = w.len().min(s.len());
    let simd_end = len / LANES * LANES;
    let mut acc = f32x8::ZERO;
    let mut i = 0;
    while i < simd_end {
        let sv = load_f32x8(&s[i..]);
        acc += load_f32x8(&w[i..]) * sv * sv;
        i += LANES;
    }
    let mut tail = 0.0f32;
    while i < len {
        tail += w[i] * s[i] * s[i];
        i += 1;
    }
    hsum(acc) + tail
}
