//! Separable Hann apodization of interrogation patches.

use std::f32::consts::PI;

/// One-dimensional Hann taper of length `n` with strictly positive samples.
///
/// Uses `0.5 * (1 - cos(2 pi (i + 1) / (n + 1)))`, i.e. the classic window
/// with its two zero end points dropped, so border pixels still contribute.
pub fn hann(n: usize) -> Vec<f32> {
    let denom = (n + 1) as f32;
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * (i + 1) as f32 / denom).cos()))
        .collect()
}

/// Two-dimensional weights `wx[x] * wy[y]` for a `width x height` patch.
#[derive(Clone, Debug)]
pub struct Apodization {
    wx: Vec<f32>,
    wy: Vec<f32>,
}

impl Apodization {
    /// Builds the separable taper for a patch size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            wx: hann(width),
            wy: hann(height),
        }
    }

    /// Returns the patch width.
    pub fn width(&self) -> usize {
        self.wx.len()
    }

    /// Returns the patch height.
    pub fn height(&self) -> usize {
        self.wy.len()
    }

    /// Column weights.
    pub fn wx(&self) -> &[f32] {
        &self.wx
    }

    /// Row weights.
    pub fn wy(&self) -> &[f32] {
        &self.wy
    }

    /// Weight at `(x, y)`.
    #[inline]
    pub fn weight(&self, x: usize, y: usize) -> f32 {
        self.wx[x] * self.wy[y]
    }

    /// Writes the weighted patch `rows` into `out` (row-major, length
    /// `width * height`).
    pub fn apply<'a, I>(&self, rows: I, out: &mut Vec<f32>)
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        out.clear();
        for (row, &wy) in rows.into_iter().zip(&self.wy) {
            out.extend(row.iter().zip(&self.wx).map(|(&v, &wx)| v * wx * wy));
        }
    }
}
