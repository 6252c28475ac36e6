//! Error types for pivcorr.

use thiserror::Error;

/// Result alias for pivcorr operations.
pub type PivResult<T> = std::result::Result<T, PivError>;

/// Errors that abort a processing request.
///
/// Zero-variance windows and missed real-time deadlines are not errors; they
/// surface as low-confidence vectors and degraded fields respectively.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PivError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The pixel buffer is shorter than the declared dimensions require.
    #[error("buffer too small: needed {needed} samples, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The row stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// A rectangle does not fit inside the image.
    #[error("roi {width}x{height} at ({x}, {y}) is outside a {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The two frames of a pair do not share dimensions.
    #[error("frame size mismatch: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        a_width: usize,
        a_height: usize,
        b_width: usize,
        b_height: usize,
    },
    /// The interrogation window does not fit in the frame.
    #[error("window {window_width}x{window_height} exceeds frame {frame_width}x{frame_height}")]
    WindowTooLarge {
        window_width: usize,
        window_height: usize,
        frame_width: usize,
        frame_height: usize,
    },
    /// Fewer frames were supplied than the call needs.
    #[error("insufficient data: needed at least {needed} frames, got {got}")]
    InsufficientData { needed: usize, got: usize },
    /// The bounded worker pool could not be created.
    #[error("thread pool error: {reason}")]
    ThreadPool { reason: String },
    /// Image decoding failed (feature `image-io`).
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

impl PivError {
    /// Returns true for every variant that reports malformed frames or config.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PivError::InvalidInput(_)
                | PivError::InvalidDimensions { .. }
                | PivError::BufferTooSmall { .. }
                | PivError::InvalidStride { .. }
                | PivError::RoiOutOfBounds { .. }
                | PivError::DimensionMismatch { .. }
                | PivError::WindowTooLarge { .. }
        )
    }
}
