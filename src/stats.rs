//! Field statistics and physical calibration.

use crate::field::DisplacementVector;
use crate::util::math::mean_std;
use crate::util::{PivError, PivResult};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Pixels per physical unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration(f32);

impl Calibration {
    /// Creates a calibration; the factor must be finite and positive.
    pub fn new(pixels_per_unit: f32) -> PivResult<Self> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(PivError::InvalidInput(
                "pixels per unit must be finite and positive",
            ));
        }
        Ok(Self(pixels_per_unit))
    }

    /// Returns the factor.
    pub fn pixels_per_unit(&self) -> f32 {
        self.0
    }

    /// Converts a pixel length to physical units.
    #[inline]
    pub fn to_physical(&self, pixels: f32) -> f32 {
        pixels / self.0
    }
}

/// Summary of the valid vectors in a field.
///
/// Without valid vectors every numeric figure is zero. The physical figures
/// are present exactly when a calibration was supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Statistics {
    pub total_vectors: usize,
    pub valid_vectors: usize,
    pub mean_u: f32,
    pub mean_v: f32,
    pub std_u: f32,
    pub std_v: f32,
    /// Largest displacement magnitude in pixels.
    pub max_velocity: f32,
    /// Mean displacement magnitude in pixels.
    pub avg_velocity: f32,
    pub pixels_per_unit: Option<f32>,
    pub max_velocity_physical: Option<f32>,
    pub avg_velocity_physical: Option<f32>,
}

impl Statistics {
    /// Aggregates over the valid vectors of `vectors`.
    pub fn compute(vectors: &[DisplacementVector], calibration: Option<Calibration>) -> Self {
        let valid = || vectors.iter().filter(|v| v.valid);
        let valid_count = valid().count();

        let (mean_u, std_u) = mean_std(valid().map(|v| v.u)).unwrap_or((0.0, 0.0));
        let (mean_v, std_v) = mean_std(valid().map(|v| v.v)).unwrap_or((0.0, 0.0));
        let (max_velocity, sum_mag) = valid()
            .map(DisplacementVector::magnitude)
            .fold((0.0f32, 0.0f64), |(max, sum), m| (max.max(m), sum + m as f64));
        let avg_velocity = if valid_count > 0 {
            (sum_mag / valid_count as f64) as f32
        } else {
            0.0
        };

        Self {
            total_vectors: vectors.len(),
            valid_vectors: valid_count,
            mean_u: mean_u as f32,
            mean_v: mean_v as f32,
            std_u: std_u as f32,
            std_v: std_v as f32,
            max_velocity,
            avg_velocity,
            pixels_per_unit: calibration.map(|c| c.pixels_per_unit()),
            max_velocity_physical: calibration.map(|c| c.to_physical(max_velocity)),
            avg_velocity_physical: calibration.map(|c| c.to_physical(avg_velocity)),
        }
    }
}
