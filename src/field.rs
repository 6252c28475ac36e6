//! Displacement vectors and the assembled vector field.

use crate::config::PivConfig;
use crate::stats::Statistics;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Displacement estimate for one interrogation window.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplacementVector {
    /// Window centre column in source-frame pixels.
    pub x: f32,
    /// Window centre row in source-frame pixels.
    pub y: f32,
    /// Horizontal displacement in pixels.
    pub u: f32,
    /// Vertical displacement in pixels.
    pub v: f32,
    /// Correlation score of the integer peak.
    pub correlation: f32,
    pub valid: bool,
    /// Set when the local median filter substituted `(u, v)`.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub replaced: bool,
}

impl DisplacementVector {
    /// An invalid zero vector centred at `(x, y)`.
    pub fn invalid(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            u: 0.0,
            v: 0.0,
            correlation: 0.0,
            valid: false,
            replaced: false,
        }
    }

    /// Displacement magnitude in pixels.
    pub fn magnitude(&self) -> f32 {
        crate::util::math::magnitude(self.u, self.v)
    }
}

/// Completion state of a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "camelCase"))]
pub enum FieldStatus {
    /// Every window was correlated.
    #[default]
    Complete,
    /// The deadline expired; only `processed` of `total` windows ran and the
    /// rest are invalid zero vectors.
    Degraded { processed: usize, total: usize },
}

impl FieldStatus {
    /// Returns true for a complete field.
    pub fn is_complete(&self) -> bool {
        matches!(self, FieldStatus::Complete)
    }
}

/// Result of one processing request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct VectorField {
    /// One vector per interrogation window, in grid order.
    pub vectors: Vec<DisplacementVector>,
    /// Configuration the field was computed with.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub config: PivConfig,
    pub statistics: Statistics,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "FieldStatus::is_complete")
    )]
    pub status: FieldStatus,
}

impl VectorField {
    /// Iterates over the vectors that survived filtering.
    pub fn valid_vectors(&self) -> impl Iterator<Item = &DisplacementVector> {
        self.vectors.iter().filter(|v| v.valid)
    }

    /// Returns the number of vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns true when the field holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
