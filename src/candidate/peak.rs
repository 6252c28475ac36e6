//! Integer correlation peaks and their ordering.

use std::cmp::Ordering;

/// Integer displacement candidate with its correlation score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Horizontal offset in pixels.
    pub dx: i32,
    /// Vertical offset in pixels.
    pub dy: i32,
    /// Correlation score at the offset.
    pub score: f32,
}

/// Orders peaks so that the better candidate compares as `Less`.
///
/// Higher scores win; ties go to the offset closest to zero, then to the
/// smaller `|dx|`, then the smaller `|dy|`, then signed `dx` and `dy` so the
/// order is total.
pub fn peak_cmp(a: &Peak, b: &Peak) -> Ordering {
    let mag = |p: &Peak| p.dx * p.dx + p.dy * p.dy;
    b.score
        .total_cmp(&a.score)
        .then_with(|| mag(a).cmp(&mag(b)))
        .then_with(|| a.dx.abs().cmp(&b.dx.abs()))
        .then_with(|| a.dy.abs().cmp(&b.dy.abs()))
        .then_with(|| a.dx.cmp(&b.dx))
        .then_with(|| a.dy.cmp(&b.dy))
}
