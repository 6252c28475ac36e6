//! Owned grayscale frames.

use crate::image::ImageView;
use crate::util::{PivError, PivResult};

/// Immutable single-channel frame stored row-major as `f32`.
///
/// Frames are built from already-decoded grayscale buffers; colour conversion
/// belongs to whoever acquired the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl Frame {
    /// Builds a frame from 8-bit samples.
    pub fn from_u8(data: &[u8], width: usize, height: usize) -> PivResult<Self> {
        check_len(data.len(), width, height)?;
        let data = data.iter().map(|&v| f32::from(v)).collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a frame from floating point samples.
    ///
    /// Non-finite samples are rejected: they usually mean the buffer was
    /// overwritten while being handed over.
    pub fn from_f32(data: Vec<f32>, width: usize, height: usize) -> PivResult<Self> {
        check_len(data.len(), width, height)?;
        if data.iter().any(|v| !v.is_finite()) {
            return Err(PivError::InvalidInput("frame contains non-finite samples"));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a strided 8-bit view into a new frame.
    pub fn from_view(view: ImageView<'_, u8>) -> PivResult<Self> {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for row in view.rows() {
            data.extend(row.iter().map(|&v| f32::from(v)));
        }
        Self::from_f32(data, view.width(), view.height())
    }

    /// Returns the frame width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the frame height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the samples in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns a borrowed view of the frame.
    pub fn view(&self) -> ImageView<'_, f32> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    pub(crate) fn from_parts(data: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }
}

fn check_len(len: usize, width: usize, height: usize) -> PivResult<()> {
    if width == 0 || height == 0 {
        return Err(PivError::InvalidDimensions { width, height });
    }
    let needed = width
        .checked_mul(height)
        .ok_or(PivError::InvalidDimensions { width, height })?;
    if len < needed {
        return Err(PivError::BufferTooSmall { needed, got: len });
    }
    if len > needed {
        return Err(PivError::InvalidInput(
            "frame buffer is longer than width * height",
        ));
    }
    Ok(())
}
