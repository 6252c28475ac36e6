//! Dense correlation map over the integer search grid.

use crate::candidate::peak::{peak_cmp, Peak};
use std::cmp::Ordering;

/// Scores for every offset `(dx, dy)` with `|dx|, |dy| <= range`.
///
/// Offsets that were not evaluated, or had no usable overlap, hold
/// `f32::NEG_INFINITY`. The buffer is reused across windows by one worker.
#[derive(Clone, Debug)]
pub struct CorrelationMap {
    range: usize,
    side: usize,
    scores: Vec<f32>,
}

impl CorrelationMap {
    /// Creates an empty map for a search range.
    pub fn new(range: usize) -> Self {
        let side = 2 * range + 1;
        Self {
            range,
            side,
            scores: vec![f32::NEG_INFINITY; side * side],
        }
    }

    /// Clears all scores, resizing if the range changed.
    pub fn reset(&mut self, range: usize) {
        if range != self.range {
            *self = Self::new(range);
        } else {
            self.scores.fill(f32::NEG_INFINITY);
        }
    }

    /// Returns the search range.
    pub fn range(&self) -> usize {
        self.range
    }

    /// Returns the scores row-major from `(-range, -range)`.
    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    fn index(&self, dx: i32, dy: i32) -> Option<usize> {
        let r = self.range as i32;
        if dx.abs() > r || dy.abs() > r {
            return None;
        }
        Some((dy + r) as usize * self.side + (dx + r) as usize)
    }

    /// Stores the score for an offset; out-of-range offsets are ignored.
    pub fn set(&mut self, dx: i32, dy: i32, score: f32) {
        if let Some(idx) = self.index(dx, dy) {
            self.scores[idx] = score;
        }
    }

    /// Returns a finite score for an offset.
    pub fn get(&self, dx: i32, dy: i32) -> Option<f32> {
        self.index(dx, dy)
            .map(|idx| self.scores[idx])
            .filter(|s| s.is_finite())
    }

    /// Returns true when the offset lies on the border of the search grid.
    pub fn on_edge(&self, dx: i32, dy: i32) -> (bool, bool) {
        let r = self.range as i32;
        (dx.abs() == r, dy.abs() == r)
    }

    /// Selects the best offset with the deterministic tie-break of `peak_cmp`.
    pub fn peak(&self) -> Option<Peak> {
        let r = self.range as i32;
        let mut best: Option<Peak> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            if !score.is_finite() {
                continue;
            }
            let candidate = Peak {
                dx: (idx % self.side) as i32 - r,
                dy: (idx / self.side) as i32 - r,
                score,
            };
            best = match best {
                Some(current) if peak_cmp(&current, &candidate) != Ordering::Greater => {
                    Some(current)
                }
                _ => Some(candidate),
            };
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::CorrelationMap;

    #[test]
    fn empty_map_has_no_peak() {
        let map = CorrelationMap::new(2);
        assert_eq!(map.scores().len(), 25);
        assert!(map.peak().is_none());
        assert!(map.get(0, 0).is_none());
    }

    #[test]
    fn peak_breaks_ties_towards_zero() {
        let mut map = CorrelationMap::new(3);
        map.set(3, 3, 0.7);
        map.set(-1, 0, 0.7);
        map.set(0, 2, 0.7);
        map.set(2, -2, 0.5);
        let peak = map.peak().unwrap();
        assert_eq!((peak.dx, peak.dy), (-1, 0));
        assert!((peak.score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn reset_clears_and_resizes() {
        let mut map = CorrelationMap::new(1);
        map.set(1, 1, 0.4);
        map.set(5, 0, 0.9);
        assert_eq!(map.peak().unwrap().dx, 1);
        map.reset(1);
        assert!(map.peak().is_none());
        map.reset(4);
        assert_eq!(map.range(), 4);
        assert_eq!(map.scores().len(), 81);
        assert_eq!(map.on_edge(4, 0), (true, false));
    }
}
