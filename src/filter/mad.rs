use crate::field::DisplacementVector;
use crate::util::math::median_in_place;

/// Invalidates valid vectors with `|mag - median| > threshold * MAD`.
///
/// The median and MAD are taken over the magnitudes of the valid vectors;
/// MAD is not rescaled to a standard deviation. Returns the number of
/// vectors invalidated.
pub fn mad_filter(vectors: &mut [DisplacementVector], threshold: f32) -> usize {
    let mut mags: Vec<f32> = vectors
        .iter()
        .filter(|v| v.valid)
        .map(DisplacementVector::magnitude)
        .collect();
    let Some(median) = median_in_place(&mut mags) else {
        return 0;
    };
    for m in mags.iter_mut() {
        *m = (*m - median).abs();
    }
    let Some(mad) = median_in_place(&mut mags) else {
        return 0;
    };

    let limit = threshold * mad;
    let mut rejected = 0;
    for vec in vectors.iter_mut().filter(|v| v.valid) {
        if (vec.magnitude() - median).abs() > limit {
            vec.valid = false;
            rejected += 1;
        }
    }
    rejected
}
