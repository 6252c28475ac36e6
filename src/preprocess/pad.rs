//! Reflective border padding.

use crate::image::Frame;
use crate::util::{PivError, PivResult};

/// Maps a possibly out-of-range index into `[0, len)` with reflect-101
/// semantics: the edge sample is the mirror axis and is not repeated.
///
/// Indices further out than one frame length wrap periodically.
pub fn reflect_101(i: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = (2 * len - 2) as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len {
        r
    } else {
        2 * len - 2 - r
    }
}

/// Returns a new frame grown by `pad_x` columns and `pad_y` rows on every
/// side, filled by mirroring interior pixels.
pub fn pad_reflect(frame: &Frame, pad_x: usize, pad_y: usize) -> PivResult<Frame> {
    if pad_x == 0 && pad_y == 0 {
        return Ok(frame.clone());
    }
    let (width, height) = frame.dims();
    let out_width = width
        .checked_add(2 * pad_x)
        .ok_or(PivError::InvalidDimensions { width, height })?;
    let out_height = height
        .checked_add(2 * pad_y)
        .ok_or(PivError::InvalidDimensions { width, height })?;
    let len = out_width
        .checked_mul(out_height)
        .ok_or(PivError::InvalidDimensions {
            width: out_width,
            height: out_height,
        })?;

    let columns: Vec<usize> = (0..out_width)
        .map(|x| reflect_101(x as isize - pad_x as isize, width))
        .collect();
    let src = frame.data();
    let mut out = Vec::with_capacity(len);
    for y in 0..out_height {
        let sy = reflect_101(y as isize - pad_y as isize, height);
        let row = &src[sy * width..(sy + 1) * width];
        out.extend(columns.iter().map(|&sx| row[sx]));
    }
    Ok(Frame::from_parts(out, out_width, out_height))
}
