//! Small statistics helpers shared by the filter and aggregation stages.

/// Median of `values`, reordering the slice in place.
///
/// Even-length inputs return the mean of the two middle samples. Returns
/// `None` for an empty slice.
pub(crate) fn median_in_place(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some(0.5 * (values[mid - 1] + values[mid]))
    }
}

/// Population mean and standard deviation, accumulated in `f64`.
pub(crate) fn mean_std<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f32>,
{
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for value in values {
        let v = value as f64;
        count += 1;
        sum += v;
        sum_sq += v * v;
    }
    if count == 0 {
        return None;
    }
    let n = count as f64;
    let mean = sum / n;
    let var = (sum_sq / n - mean * mean).max(0.0);
    Some((mean, var.sqrt()))
}

/// Euclidean length of a displacement.
#[inline]
pub(crate) fn magnitude(u: f32, v: f32) -> f32 {
    u.hypot(v)
}

#[cfg(test)]
mod tests {
    use super::{magnitude, mean_std, median_in_place};

    #[test]
    fn median_handles_odd_and_even() {
        let mut odd = [5.0f32, 1.0, 3.0];
        assert_eq!(median_in_place(&mut odd), Some(3.0));

        let mut even = [4.0f32, 1.0, 3.0, 2.0];
        assert_eq!(median_in_place(&mut even), Some(2.5));

        let mut empty: [f32; 0] = [];
        assert_eq!(median_in_place(&mut empty), None);
    }

    #[test]
    fn mean_std_is_population() {
        let (mean, std) = mean_std([1.0f32, 2.0, 3.0, 4.0]).unwrap();
        assert!((mean - 2.5).abs() < 1e-12);
        assert!((std - 1.25f64.sqrt()).abs() < 1e-12);
        assert!(mean_std(std::iter::empty::<f32>()).is_none());
    }

    #[test]
    fn magnitude_matches_pythagoras() {
        assert!((magnitude(3.0, -4.0) - 5.0).abs() < 1e-6);
    }
}
