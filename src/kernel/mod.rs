//! Correlation kernels.
//!
//! A kernel compares one template patch from frame A with every integer
//! displacement of it inside the search area from frame B and records the
//! scores in a `CorrelationMap`. Both strategies share this interface so the
//! engine can swap them without touching the surrounding pipeline.

use crate::candidate::CorrelationMap;
use crate::image::ImageView;
use crate::preprocess::SearchArea;

pub mod scalar;
#[cfg(feature = "simd")]
pub mod simd;

pub use scalar::{ApodizedCorrelation, NormalizedCorrelation};

/// Population variance below which a template is considered textureless.
pub const MIN_TEMPLATE_VARIANCE: f64 = 1e-8;

/// Kernel trait for filling a correlation map for one window.
pub trait CorrelationKernel: Sync {
    /// Scores every offset within `map.range()`.
    ///
    /// `scratch` is a per-worker buffer the kernel may resize freely. Returns
    /// `false` without touching the map when the template is flat; offsets
    /// that cannot be scored keep `f32::NEG_INFINITY`.
    fn correlate(
        &self,
        template: ImageView<'_, f32>,
        search: &SearchArea<'_>,
        map: &mut CorrelationMap,
        scratch: &mut Vec<f32>,
    ) -> bool;
}

/// Population variance of a patch, accumulated in `f64`.
pub fn patch_variance(patch: ImageView<'_, f32>) -> f64 {
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for row in patch.rows() {
        for &v in row {
            let v = v as f64;
            sum += v;
            sum_sq += v * v;
        }
    }
    let n = (patch.width() * patch.height()) as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

// Row reductions, vectorised when the `simd` feature is on.
#[cfg(not(feature = "simd"))]
pub(crate) use scalar::{dot_row_scalar as dot_row, weighted_sq_row_scalar as weighted_sq_row};
#[cfg(feature = "simd")]
pub(crate) use simd::{dot_row, weighted_sq_row};
