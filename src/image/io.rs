//! Convenience helpers for loading frames via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{Frame, ImageView};
use crate::util::{PivError, PivResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> PivResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts a grayscale image buffer into a frame.
pub fn frame_from_gray_image(img: &image::GrayImage) -> PivResult<Frame> {
    Frame::from_u8(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts a 16-bit grayscale image (common for scientific TIFFs) into a frame.
pub fn frame_from_gray16_image(
    img: &image::ImageBuffer<image::Luma<u16>, Vec<u16>>,
) -> PivResult<Frame> {
    let data = img.as_raw().iter().map(|&v| f32::from(v)).collect();
    Frame::from_f32(data, img.width() as usize, img.height() as usize)
}

/// Converts any decoded image into a grayscale frame, keeping 16-bit depth.
pub fn frame_from_dynamic_image(img: &image::DynamicImage) -> PivResult<Frame> {
    match img {
        image::DynamicImage::ImageLuma16(gray16) => frame_from_gray16_image(gray16),
        other => frame_from_gray_image(&other.to_luma8()),
    }
}

/// Loads an image from disk as a grayscale frame.
pub fn load_gray_frame<P: AsRef<Path>>(path: P) -> PivResult<Frame> {
    let img = image::open(path).map_err(|err| PivError::ImageIo {
        reason: err.to_string(),
    })?;
    frame_from_dynamic_image(&img)
}
