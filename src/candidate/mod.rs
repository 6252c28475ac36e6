//! Correlation score storage and peak selection.
//!
//! Includes the dense offset map filled by the kernels and the deterministic
//! ordering used to pick the winning offset.

pub mod map;
pub mod peak;

pub use map::CorrelationMap;
pub use peak::{peak_cmp, Peak};
