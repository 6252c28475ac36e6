//! Scalar reference kernels.

use crate::candidate::CorrelationMap;
use crate::image::ImageView;
use crate::kernel::{
    dot_row, patch_variance, weighted_sq_row, CorrelationKernel, MIN_TEMPLATE_VARIANCE,
};
use crate::preprocess::{Apodization, SearchArea};

/// Zero-mean normalised cross-correlation with partial-overlap counting.
///
/// For each offset only the template pixels whose shifted position lands
/// inside the search area take part. Means and population deviations are
/// taken over those `n` pixels, giving
/// `sum((t - mt)(s - ms)) / (n * std_t * std_s)`. With full overlap this is
/// exactly the template's own mean and deviation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizedCorrelation;

impl CorrelationKernel for NormalizedCorrelation {
    fn correlate(
        &self,
        template: ImageView<'_, f32>,
        search: &SearchArea<'_>,
        map: &mut CorrelationMap,
        _scratch: &mut Vec<f32>,
    ) -> bool {
        if patch_variance(template) <= MIN_TEMPLATE_VARIANCE {
            return false;
        }

        let tw = template.width() as isize;
        let th = template.height() as isize;
        let t_stride = template.stride();
        let t_data = template.as_slice();
        let sw = search.view.width() as isize;
        let sh = search.view.height() as isize;
        let s_stride = search.view.stride();
        let s_data = search.view.as_slice();
        let r = map.range() as i32;

        for dy in -r..=r {
            for dx in -r..=r {
                let px = search.origin_x as isize + dx as isize;
                let py = search.origin_y as isize + dy as isize;
                let tx0 = (-px).max(0);
                let ty0 = (-py).max(0);
                let tx1 = tw.min(sw - px);
                let ty1 = th.min(sh - py);
                if tx0 >= tx1 || ty0 >= ty1 {
                    continue;
                }

                let mut sum_t = 0.0f64;
                let mut sum_t2 = 0.0f64;
                let mut sum_s = 0.0f64;
                let mut sum_s2 = 0.0f64;
                let mut sum_ts = 0.0f64;
                for ty in ty0..ty1 {
                    let t_base = ty as usize * t_stride;
                    let s_base = (py + ty) as usize * s_stride;
                    for tx in tx0..tx1 {
                        let t = t_data[t_base + tx as usize] as f64;
                        let s = s_data[s_base + (px + tx) as usize] as f64;
                        sum_t += t;
                        sum_t2 += t * t;
                        sum_s += s;
                        sum_s2 += s * s;
                        sum_ts += t * s;
                    }
                }

                let n = ((tx1 - tx0) * (ty1 - ty0)) as f64;
                let var_t = sum_t2 - sum_t * sum_t / n;
                let var_s = sum_s2 - sum_s * sum_s / n;
                let floor = MIN_TEMPLATE_VARIANCE * n;
                if var_t <= floor || var_s <= floor {
                    continue;
                }
                let cov = sum_ts - sum_t * sum_s / n;
                let score = cov / (var_t * var_s).sqrt();
                if score.is_finite() {
                    map.set(dx, dy, score as f32);
                }
            }
        }
        true
    }
}

/// Raw normalised correlation of Hann-weighted patches.
///
/// Both the template and every displaced candidate region are multiplied by
/// the same separable taper `w` before comparison:
/// `sum(w t * w s) / sqrt(sum (w t)^2 * sum (w s)^2)`. Samples are not mean
/// subtracted. Candidate regions must lie fully inside the search area,
/// which a reflect-padded buffer guarantees.
#[derive(Clone, Debug)]
pub struct ApodizedCorrelation {
    width: usize,
    height: usize,
    /// Squared 2D weights, row-major.
    w2: Vec<f32>,
}

impl ApodizedCorrelation {
    /// Builds the kernel for a window size.
    pub fn new(width: usize, height: usize) -> Self {
        let apo = Apodization::new(width, height);
        let mut w2 = Vec::with_capacity(width * height);
        for &wy in apo.wy() {
            w2.extend(apo.wx().iter().map(|&wx| (wx * wy) * (wx * wy)));
        }
        Self { width, height, w2 }
    }
}

impl CorrelationKernel for ApodizedCorrelation {
    fn correlate(
        &self,
        template: ImageView<'_, f32>,
        search: &SearchArea<'_>,
        map: &mut CorrelationMap,
        scratch: &mut Vec<f32>,
    ) -> bool {
        debug_assert_eq!(template.width(), self.width);
        debug_assert_eq!(template.height(), self.height);
        if patch_variance(template) <= MIN_TEMPLATE_VARIANCE {
            return false;
        }

        let width = self.width;
        // scratch = w^2 * t, so sum(w t * w s) is a plain dot product with s.
        scratch.clear();
        let mut norm_t = 0.0f32;
        for (ty, row) in template.rows().enumerate() {
            let w2_row = &self.w2[ty * width..(ty + 1) * width];
            for (&t, &w2) in row.iter().zip(w2_row) {
                scratch.push(w2 * t);
                norm_t += w2 * t * t;
            }
        }
        if norm_t <= 0.0 {
            return false;
        }

        let sw = search.view.width() as isize;
        let sh = search.view.height() as isize;
        let s_stride = search.view.stride();
        let s_data = search.view.as_slice();
        let r = map.range() as i32;

        for dy in -r..=r {
            for dx in -r..=r {
                let px = search.origin_x as isize + dx as isize;
                let py = search.origin_y as isize + dy as isize;
                if px < 0 || py < 0 || px + width as isize > sw || py + self.height as isize > sh {
                    continue;
                }
                let mut dot = 0.0f32;
                let mut norm_s = 0.0f32;
                for ty in 0..self.height {
                    let start = (py as usize + ty) * s_stride + px as usize;
                    let s_row = &s_data[start..start + width];
                    let a_row = &scratch[ty * width..(ty + 1) * width];
                    let w2_row = &self.w2[ty * width..(ty + 1) * width];
                    dot += dot_row(a_row, s_row);
                    norm_s += weighted_sq_row(w2_row, s_row);
                }
                if norm_s <= 0.0 {
                    continue;
                }
                let score = dot / (norm_t * norm_s).sqrt();
                if score.is_finite() {
                    map.set(dx, dy, score);
                }
            }
        }
        true
    }
}

/// Dot product of two equal-length rows.
#[cfg_attr(feature = "simd", allow(dead_code))]
#[inline]
pub(crate) fn dot_row_scalar(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(&x, &y)| x * y).sum()
}

/// `sum(w * s^2)` over two equal-length rows.
#[cfg_attr(feature = "simd", allow(dead_code))]
#[inline]
pub(crate) fn weighted_sq_row_scalar(w: &[f32], s: &[f32]) -> f32 {
    w.iter().zip(s).map(|(&w, &s)| w * s * s).sum()
}
