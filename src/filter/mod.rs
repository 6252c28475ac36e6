//! Outlier filtering of a correlated field.
//!
//! The correlation floor runs first under every policy. The magnitude tests
//! then only look at vectors that are still valid, so low-quality matches
//! never skew the robust statistics.

mod local_median;
mod mad;

pub use local_median::{local_median_filter, LocalMedianOutcome};
pub use mad::mad_filter;

use crate::config::{OutlierPolicy, PivConfig};
use crate::field::DisplacementVector;

/// Counts of vectors touched by `apply_filters`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Vectors invalidated by the minimum-correlation floor.
    pub below_floor: usize,
    /// Vectors invalidated by the outlier policy.
    pub rejected: usize,
    /// Vectors whose displacement was substituted by a neighbourhood median.
    pub replaced: usize,
}

/// Invalidates vectors scoring below `min_correlation`; returns how many.
pub fn correlation_floor(vectors: &mut [DisplacementVector], min_correlation: f32) -> usize {
    let mut count = 0;
    for vec in vectors.iter_mut().filter(|v| v.valid) {
        if vec.correlation < min_correlation {
            vec.valid = false;
            count += 1;
        }
    }
    count
}

/// Applies the correlation floor and the configured outlier policy.
///
/// `step` is the grid step `(x, y)`, which defines the local median
/// neighbourhood.
pub fn apply_filters(
    vectors: &mut [DisplacementVector],
    cfg: &PivConfig,
    step: (usize, usize),
) -> FilterReport {
    let below_floor = correlation_floor(vectors, cfg.min_correlation);
    let (rejected, replaced) = match cfg.outlier_policy {
        OutlierPolicy::Disabled => (0, 0),
        OutlierPolicy::Mad => (mad_filter(vectors, cfg.outlier_threshold), 0),
        OutlierPolicy::LocalMedian => {
            let outcome = local_median_filter(vectors, cfg.outlier_threshold, step);
            (outcome.invalidated, outcome.replaced)
        }
    };
    FilterReport {
        below_floor,
        rejected,
        replaced,
    }
}
