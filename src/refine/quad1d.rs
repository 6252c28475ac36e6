//! Three-point peak fits along one axis.

/// Estimates the sub-sample peak offset for a quadratic fit.
///
/// Given samples at `x = -1, 0, +1` (`fm`, `f0`, `fp`), this returns the peak
/// offset `dx` in `[-1, 1]` when the fitted parabola is concave and stable.
/// Non-finite samples, flat or convex curvature yield `None`.
pub fn quad_peak_offset_1d(fm: f32, f0: f32, fp: f32) -> Option<f32> {
    if !fm.is_finite() || !f0.is_finite() || !fp.is_finite() {
        return None;
    }

    let denom = fm - 2.0 * f0 + fp;
    let eps = 1e-6f32;
    if denom.abs() < eps || denom >= 0.0 {
        return None;
    }

    let dx = 0.5 * (fm - fp) / denom;
    if dx.is_finite() && dx.abs() <= 1.0 {
        Some(dx)
    } else {
        None
    }
}

/// Three-point Gaussian peak estimate: a parabola through the logarithms.
///
/// Exact for Gaussian-shaped correlation peaks, which is the usual shape of
/// a particle image correlation. Every sample must be strictly positive.
pub fn gaussian_peak_offset_1d(fm: f32, f0: f32, fp: f32) -> Option<f32> {
    if !(fm > 0.0 && f0 > 0.0 && fp > 0.0) {
        return None;
    }
    // Logs are taken in f64; near-equal scores lose the curvature in f32.
    let lm = (fm as f64).ln();
    let l0 = (f0 as f64).ln();
    let lp = (fp as f64).ln();
    let denom = lm - 2.0 * l0 + lp;
    if denom.abs() < 1e-12 || denom >= 0.0 {
        return None;
    }
    let dx = 0.5 * (lm - lp) / denom;
    if dx.is_finite() && dx.abs() <= 1.0 {
        Some(dx as f32)
    } else {
        None
    }
}
