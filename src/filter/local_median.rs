use crate::field::DisplacementVector;
use crate::util::math::{mean_std, median_in_place};

/// Result of a local median pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalMedianOutcome {
    pub replaced: usize,
    /// Suspects without a usable neighbour.
    pub invalidated: usize,
}

/// Replaces suspect vectors with the median of their neighbours.
///
/// A valid vector is suspect when either component lies `threshold` or more
/// population standard deviations from the field mean of that component; a
/// component with zero spread never flags. Neighbours are valid,
/// non-suspect vectors whose centres are within one grid step on both axes.
/// All replacements are computed from the unmodified field before any is
/// written back.
pub fn local_median_filter(
    vectors: &mut [DisplacementVector],
    threshold: f32,
    step: (usize, usize),
) -> LocalMedianOutcome {
    let Some((mean_u, std_u)) = mean_std(vectors.iter().filter(|v| v.valid).map(|v| v.u)) else {
        return LocalMedianOutcome::default();
    };
    let Some((mean_v, std_v)) = mean_std(vectors.iter().filter(|v| v.valid).map(|v| v.v)) else {
        return LocalMedianOutcome::default();
    };
    let threshold = threshold as f64;
    let deviates = |value: f32, mean: f64, std: f64| {
        std > 0.0 && (value as f64 - mean).abs() >= threshold * std
    };
    let suspect: Vec<bool> = vectors
        .iter()
        .map(|v| v.valid && (deviates(v.u, mean_u, std_u) || deviates(v.v, mean_v, std_v)))
        .collect();

    // Centres sit on multiples of the step; allow for float rounding.
    let reach_x = step.0 as f32 + 1e-3;
    let reach_y = step.1 as f32 + 1e-3;
    let mut updates: Vec<(usize, Option<(f32, f32)>)> = Vec::new();
    let mut us = Vec::new();
    let mut vs = Vec::new();
    for (i, target) in vectors.iter().enumerate() {
        if !suspect[i] {
            continue;
        }
        us.clear();
        vs.clear();
        for (j, other) in vectors.iter().enumerate() {
            if j == i || !other.valid || suspect[j] {
                continue;
            }
            if (other.x - target.x).abs() <= reach_x && (other.y - target.y).abs() <= reach_y {
                us.push(other.u);
                vs.push(other.v);
            }
        }
        let replacement = median_in_place(&mut us).zip(median_in_place(&mut vs));
        updates.push((i, replacement));
    }

    let mut outcome = LocalMedianOutcome::default();
    for (i, replacement) in updates {
        let vec = &mut vectors[i];
        match replacement {
            Some((u, v)) => {
                vec.u = u;
                vec.v = v;
                vec.replaced = true;
                outcome.replaced += 1;
            }
            None => {
                vec.valid = false;
                outcome.invalidated += 1;
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::local_median_filter;
    use crate::filter::test_support::uniform_grid;

    #[test]
    fn outlier_takes_neighbourhood_median() {
        let mut vectors = uniform_grid(5, 5, 16.0);
        vectors[12].u = 10.0;
        let before = vectors.clone();
        let outcome = local_median_filter(&mut vectors, 3.0, (16, 16));
        assert_eq!(outcome.replaced, 1);
        assert_eq!(outcome.invalidated, 0);
        assert_eq!((vectors[12].u, vectors[12].v), (1.0, 0.0));
        assert!(vectors[12].valid && vectors[12].replaced);
        for i in (0..25).filter(|&i| i != 12) {
            assert_eq!(vectors[i], before[i]);
        }
    }

    #[test]
    fn isolated_suspect_is_invalidated() {
        let mut vectors = uniform_grid(5, 5, 16.0);
        vectors[0].u = 10.0;
        // Its only neighbours are invalid.
        for i in [1, 5, 6] {
            vectors[i].valid = false;
        }
        let outcome = local_median_filter(&mut vectors, 3.0, (16, 16));
        assert_eq!(outcome.invalidated, 1);
        assert!(!vectors[0].valid);
        assert!(!vectors[0].replaced);
    }

    #[test]
    fn uniform_field_is_untouched() {
        let mut vectors = uniform_grid(4, 4, 8.0);
        let before = vectors.clone();
        assert_eq!(local_median_filter(&mut vectors, 3.0, (8, 8)), Default::default());
        assert_eq!(vectors, before);
    }
}
