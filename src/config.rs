//! Processing configuration.
//!
//! A `PivConfig` is an immutable value passed by reference into every stage
//! of a request. `validate` performs every check that depends on the frame
//! size, so a request either starts with a consistent configuration or fails
//! before any buffer is allocated.

use crate::util::{PivError, PivResult};

/// Window spacing along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Spacing {
    /// Fractional overlap in `[0, 1)`; the step is `floor(extent * (1 - o))`,
    /// at least one pixel.
    Overlap(f32),
    /// Explicit step in pixels per axis.
    Step { x: usize, y: usize },
}

/// Region of interest in source-frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    /// Returns true when the point lies inside the half-open rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let x0 = self.x as f32;
        let y0 = self.y as f32;
        x >= x0 && y >= y0 && x < x0 + self.width as f32 && y < y0 + self.height as f32
    }
}

/// Correlation formula used to compare a template with its search area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorrelationStrategy {
    /// Zero-mean normalised correlation over the overlapping pixels of an
    /// unpadded frame.
    #[default]
    Normalized,
    /// Raw normalised correlation of Hann-weighted patches cut from a
    /// reflect-padded frame.
    Apodized,
}

/// Three-point peak model used for sub-pixel refinement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeakFit {
    /// Parabola through the logarithms of the scores.
    #[default]
    Gaussian,
    /// Parabola through the raw scores.
    Parabolic,
}

/// Post-correlation outlier handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutlierPolicy {
    /// Only the minimum-correlation floor is applied.
    Disabled,
    /// Invalidate vectors whose magnitude deviates from the median by more
    /// than `threshold * MAD`.
    #[default]
    Mad,
    /// Replace vectors deviating by `threshold` standard deviations with the
    /// median of their valid neighbours.
    LocalMedian,
}

/// Configuration for a processing request.
#[derive(Clone, Debug, PartialEq)]
pub struct PivConfig {
    /// Interrogation window width in pixels.
    pub window_width: usize,
    /// Interrogation window height in pixels.
    pub window_height: usize,
    /// Window spacing.
    pub spacing: Spacing,
    /// Maximum integer displacement searched along each axis.
    pub search_range: usize,
    /// Correlation formula.
    pub strategy: CorrelationStrategy,
    /// Enables sub-pixel peak refinement.
    pub subpixel: bool,
    /// Peak model for sub-pixel refinement.
    pub peak_fit: PeakFit,
    /// Outlier handling.
    pub outlier_policy: OutlierPolicy,
    /// Outlier threshold in MAD or standard-deviation units.
    pub outlier_threshold: f32,
    /// Vectors with a correlation score below this value are invalid.
    pub min_correlation: f32,
    /// Only windows whose centre falls inside this region are processed.
    pub roi: Option<Roi>,
    /// Stretch each frame's intensities to `[0, 1]` before correlation.
    pub normalize_intensity: bool,
    /// Worker threads for window processing: 0 uses the global pool, 1 runs
    /// sequentially.
    pub workers: usize,
    /// Upper bound on frame pairs processed concurrently in batch mode.
    pub max_pairs_in_flight: usize,
}

impl Default for PivConfig {
    fn default() -> Self {
        Self {
            window_width: 32,
            window_height: 32,
            spacing: Spacing::Overlap(0.5),
            search_range: 16,
            strategy: CorrelationStrategy::Normalized,
            subpixel: true,
            peak_fit: PeakFit::Gaussian,
            outlier_policy: OutlierPolicy::Mad,
            outlier_threshold: 3.0,
            min_correlation: 0.1,
            roi: None,
            normalize_intensity: false,
            workers: 0,
            max_pairs_in_flight: 2,
        }
    }
}

impl PivConfig {
    /// Coarse settings for the live view: large non-overlapping windows and
    /// no sub-pixel refinement.
    pub fn realtime() -> Self {
        Self {
            window_width: 64,
            window_height: 64,
            spacing: Spacing::Overlap(0.0),
            search_range: 12,
            subpixel: false,
            ..Self::default()
        }
    }

    /// High-accuracy settings for offline batches.
    pub fn batch() -> Self {
        Self {
            strategy: CorrelationStrategy::Apodized,
            outlier_policy: OutlierPolicy::LocalMedian,
            ..Self::default()
        }
    }

    /// Returns the window step `(x, y)` in pixels.
    pub fn steps(&self) -> PivResult<(usize, usize)> {
        match self.spacing {
            Spacing::Overlap(overlap) => {
                if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
                    return Err(PivError::InvalidInput("overlap must lie in [0, 1)"));
                }
                let step = |extent: usize| {
                    ((extent as f32 * (1.0 - overlap)).floor() as usize).max(1)
                };
                Ok((step(self.window_width), step(self.window_height)))
            }
            Spacing::Step { x, y } => {
                if x == 0 || y == 0 {
                    return Err(PivError::InvalidInput("step must be positive"));
                }
                Ok((x, y))
            }
        }
    }

    /// Margin by which windows may extend past the frame on each side.
    pub fn grid_margin(&self) -> (usize, usize) {
        match self.strategy {
            CorrelationStrategy::Normalized => (0, 0),
            CorrelationStrategy::Apodized => (self.window_width / 2, self.window_height / 2),
        }
    }

    /// Reflective padding added to each side of the working buffers.
    pub fn padding(&self) -> (usize, usize) {
        match self.strategy {
            CorrelationStrategy::Normalized => (0, 0),
            CorrelationStrategy::Apodized => {
                let (mx, my) = self.grid_margin();
                (mx + self.search_range, my + self.search_range)
            }
        }
    }

    /// Checks the configuration against a frame size.
    pub fn validate(&self, frame_width: usize, frame_height: usize) -> PivResult<()> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(PivError::InvalidInput("window size must be positive"));
        }
        if self.window_width > frame_width || self.window_height > frame_height {
            return Err(PivError::WindowTooLarge {
                window_width: self.window_width,
                window_height: self.window_height,
                frame_width,
                frame_height,
            });
        }
        self.steps()?;
        if self.search_range > frame_width.max(frame_height) {
            return Err(PivError::InvalidInput(
                "search range exceeds the frame extent",
            ));
        }
        if !self.outlier_threshold.is_finite() || self.outlier_threshold <= 0.0 {
            return Err(PivError::InvalidInput(
                "outlier threshold must be finite and positive",
            ));
        }
        if !self.min_correlation.is_finite() {
            return Err(PivError::InvalidInput("minimum correlation must be finite"));
        }
        if self.max_pairs_in_flight == 0 {
            return Err(PivError::InvalidInput(
                "max_pairs_in_flight must be at least 1",
            ));
        }
        if let Some(roi) = self.roi {
            if roi.width == 0 || roi.height == 0 {
                return Err(PivError::InvalidInput("roi must have a positive size"));
            }
            if roi.x >= frame_width || roi.y >= frame_height {
                return Err(PivError::RoiOutOfBounds {
                    x: roi.x,
                    y: roi.y,
                    width: roi.width,
                    height: roi.height,
                    img_width: frame_width,
                    img_height: frame_height,
                });
            }
        }
        Ok(())
    }
}
