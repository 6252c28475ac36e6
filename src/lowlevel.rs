//! Low-level building blocks for custom correlation pipelines.
//!
//! These expose the correlation map, kernels, peak fits and preprocessing
//! steps that `PivEngine` composes. Most users should prefer the engine.

pub use crate::candidate::{peak_cmp, CorrelationMap, Peak};
pub use crate::filter::{apply_filters, correlation_floor, local_median_filter, mad_filter};
pub use crate::grid::{generate_grid, GridSpec, InterrogationWindow};
pub use crate::kernel::{
    ApodizedCorrelation, CorrelationKernel, NormalizedCorrelation, MIN_TEMPLATE_VARIANCE,
};
pub use crate::preprocess::{
    hann, normalize_min_max, pad_reflect, reflect_101, Apodization, SearchArea, WorkingFrame,
};
pub use crate::refine::{gaussian_peak_offset_1d, quad_peak_offset_1d, refine_peak};
