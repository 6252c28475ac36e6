//! Sub-pixel refinement of an integer correlation peak.

use crate::candidate::{CorrelationMap, Peak};
use crate::config::PeakFit;
use crate::refine::quad1d::{gaussian_peak_offset_1d, quad_peak_offset_1d};

/// Refines `peak` with independent three-point fits along x and y.
///
/// Each axis falls back to its integer offset when the peak sits on the
/// search-range edge, a neighbour score is missing or non-positive, or the
/// fit is not a concave peak within one pixel.
pub fn refine_peak(map: &CorrelationMap, peak: Peak, fit: PeakFit) -> (f32, f32) {
    let (edge_x, edge_y) = map.on_edge(peak.dx, peak.dy);
    let du = if edge_x {
        None
    } else {
        axis_offset(
            map.get(peak.dx - 1, peak.dy),
            peak.score,
            map.get(peak.dx + 1, peak.dy),
            fit,
        )
    };
    let dv = if edge_y {
        None
    } else {
        axis_offset(
            map.get(peak.dx, peak.dy - 1),
            peak.score,
            map.get(peak.dx, peak.dy + 1),
            fit,
        )
    };
    (
        peak.dx as f32 + du.unwrap_or(0.0),
        peak.dy as f32 + dv.unwrap_or(0.0),
    )
}

fn axis_offset(fm: Option<f32>, f0: f32, fp: Option<f32>, fit: PeakFit) -> Option<f32> {
    let (fm, fp) = (fm?, fp?);
    if fm <= 0.0 || f0 <= 0.0 || fp <= 0.0 {
        return None;
    }
    match fit {
        PeakFit::Gaussian => gaussian_peak_offset_1d(fm, f0, fp),
        PeakFit::Parabolic => quad_peak_offset_1d(fm, f0, fp),
    }
}
