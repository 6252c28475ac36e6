//! pivcorr is a CPU-first windowed cross-correlation engine for particle
//! image velocimetry.
//!
//! Given two time-separated grayscale frames, it tiles frame A with
//! interrogation windows, finds the best-aligning offset of each window in
//! frame B under one of two correlation strategies, refines the peak to
//! sub-pixel precision, filters outliers and aggregates field statistics.
//! Window processing runs in parallel via the `rayon` feature; the result is
//! identical for every worker count.
//!
//! ```no_run
//! use pivcorr::{Frame, PivConfig, PivEngine};
//!
//! # fn main() -> pivcorr::PivResult<()> {
//! let a = Frame::from_u8(&vec![0; 256 * 256], 256, 256)?;
//! let b = a.clone();
//! let engine = PivEngine::new(PivConfig::default())?;
//! let field = engine.process_pair(&a, &b, None)?;
//! println!("{} valid vectors", field.statistics.valid_vectors);
//! # Ok(())
//! # }
//! ```

mod candidate;
pub mod config;
pub mod engine;
pub mod field;
pub mod filter;
pub mod grid;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod preprocess;
mod refine;
pub mod stats;
mod trace;
pub mod util;

pub use config::{CorrelationStrategy, OutlierPolicy, PeakFit, PivConfig, Roi, Spacing};
pub use engine::{process_pair, PivEngine};
pub use field::{DisplacementVector, FieldStatus, VectorField};
pub use image::{Frame, ImageView};
pub use stats::{Calibration, Statistics};
pub use util::{PivError, PivResult};
