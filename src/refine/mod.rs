//! Sub-pixel peak refinement.

pub mod quad1d;
pub mod subpixel;

pub use quad1d::{gaussian_peak_offset_1d, quad_peak_offset_1d};
pub use subpixel::refine_peak;
