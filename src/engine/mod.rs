//! Request orchestration: preprocess, grid, correlate, refine, filter,
//! aggregate.
//!
//! A `PivEngine` holds only the immutable configuration and, when more than
//! one dedicated worker is requested, its own bounded `rayon` pool. All
//! buffers are allocated per request and dropped when the field is returned.

mod schedule;
mod window;

use std::time::{Duration, Instant};

use crate::config::{CorrelationStrategy, PivConfig};
use crate::field::{DisplacementVector, FieldStatus, VectorField};
use crate::filter::apply_filters;
use crate::grid::{generate_grid, GridSpec, InterrogationWindow};
use crate::image::Frame;
use crate::kernel::{ApodizedCorrelation, CorrelationKernel, NormalizedCorrelation};
use crate::preprocess::WorkingFrame;
use crate::stats::{Calibration, Statistics};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{PivError, PivResult};

use schedule::{run_windows, Parallelism};
use window::WindowContext;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Windowed cross-correlation engine.
#[derive(Debug)]
pub struct PivEngine {
    config: PivConfig,
    #[cfg(feature = "rayon")]
    pool: Option<rayon::ThreadPool>,
}

impl PivEngine {
    /// Creates an engine for `config`.
    ///
    /// With `workers > 1` (and the `rayon` feature) a dedicated pool of that
    /// many threads is built here; frame-dependent checks run per request.
    pub fn new(config: PivConfig) -> PivResult<Self> {
        config.steps()?;
        if config.max_pairs_in_flight == 0 {
            return Err(PivError::InvalidInput(
                "max_pairs_in_flight must be at least 1",
            ));
        }
        #[cfg(feature = "rayon")]
        let pool = if config.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.workers)
                .thread_name(|i| format!("pivcorr-{i}"))
                .build()
                .map_err(|err| PivError::ThreadPool {
                    reason: err.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            config,
            #[cfg(feature = "rayon")]
            pool,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PivConfig {
        &self.config
    }

    /// Computes the vector field between `a` and `b`.
    pub fn process_pair(
        &self,
        a: &Frame,
        b: &Frame,
        calibration: Option<Calibration>,
    ) -> PivResult<VectorField> {
        self.run(a, b, calibration, None)
    }

    /// Computes the vector field under a soft deadline.
    ///
    /// Windows that have not started when `budget` elapses are emitted as
    /// invalid zero vectors and the field is marked
    /// [`FieldStatus::Degraded`]. Windows already running are completed.
    pub fn process_pair_with_deadline(
        &self,
        a: &Frame,
        b: &Frame,
        calibration: Option<Calibration>,
        budget: Duration,
    ) -> PivResult<VectorField> {
        let deadline = Instant::now().checked_add(budget);
        self.run(a, b, calibration, deadline)
    }

    /// Processes consecutive pairs `(frames[i], frames[i + 1])`.
    ///
    /// Fields are returned in pair order. At most `max_pairs_in_flight`
    /// pairs hold working buffers at the same time.
    pub fn process_batch(
        &self,
        frames: &[Frame],
        calibration: Option<Calibration>,
    ) -> PivResult<Vec<VectorField>> {
        if frames.len() < 2 {
            return Err(PivError::InsufficientData {
                needed: 2,
                got: frames.len(),
            });
        }
        let pairs: Vec<(&Frame, &Frame)> = frames.windows(2).map(|w| (&w[0], &w[1])).collect();
        self.process_pairs(&pairs, calibration)
    }

    /// Processes explicit frame pairs, returning fields in input order.
    pub fn process_pairs(
        &self,
        pairs: &[(&Frame, &Frame)],
        calibration: Option<Calibration>,
    ) -> PivResult<Vec<VectorField>> {
        if pairs.is_empty() {
            return Err(PivError::InsufficientData { needed: 1, got: 0 });
        }
        let _span = trace_span!(
            "process_batch",
            pairs = pairs.len(),
            in_flight = self.config.max_pairs_in_flight
        )
        .entered();

        let parallelism = self.parallelism();
        let mut fields = Vec::with_capacity(pairs.len());
        for chunk in pairs.chunks(self.config.max_pairs_in_flight) {
            let results: Vec<PivResult<VectorField>> = if parallelism.is_parallel() {
                self.run_chunk_parallel(chunk, calibration, parallelism)
            } else {
                chunk
                    .iter()
                    .map(|(a, b)| self.run(a, b, calibration, None))
                    .collect()
            };
            for result in results {
                fields.push(result?);
            }
        }
        Ok(fields)
    }

    #[cfg(feature = "rayon")]
    fn run_chunk_parallel(
        &self,
        chunk: &[(&Frame, &Frame)],
        calibration: Option<Calibration>,
        parallelism: Parallelism<'_>,
    ) -> Vec<PivResult<VectorField>> {
        parallelism.install(|| {
            chunk
                .par_iter()
                .map(|(a, b)| self.run(a, b, calibration, None))
                .collect()
        })
    }

    #[cfg(not(feature = "rayon"))]
    fn run_chunk_parallel(
        &self,
        chunk: &[(&Frame, &Frame)],
        calibration: Option<Calibration>,
        _parallelism: Parallelism<'_>,
    ) -> Vec<PivResult<VectorField>> {
        chunk
            .iter()
            .map(|(a, b)| self.run(a, b, calibration, None))
            .collect()
    }

    #[cfg(feature = "rayon")]
    fn parallelism(&self) -> Parallelism<'_> {
        match (&self.pool, self.config.workers) {
            (Some(pool), _) => Parallelism::Pool(pool),
            (None, 1) => Parallelism::Sequential,
            (None, _) => Parallelism::Global,
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn parallelism(&self) -> Parallelism<'_> {
        Parallelism::Sequential
    }

    fn run(
        &self,
        a: &Frame,
        b: &Frame,
        calibration: Option<Calibration>,
        deadline: Option<Instant>,
    ) -> PivResult<VectorField> {
        let cfg = &self.config;
        if a.dims() != b.dims() {
            return Err(PivError::DimensionMismatch {
                a_width: a.width(),
                a_height: a.height(),
                b_width: b.width(),
                b_height: b.height(),
            });
        }
        let (width, height) = a.dims();
        let _span = trace_span!("process_pair", width = width, height = height).entered();
        cfg.validate(width, height)?;

        let spec = GridSpec::from_config(cfg)?;
        let windows = generate_grid(width, height, &spec)?;
        let frame_a = WorkingFrame::prepare(a, cfg)?;
        let frame_b = WorkingFrame::prepare(b, cfg)?;

        let slots = match cfg.strategy {
            CorrelationStrategy::Normalized => {
                self.correlate(&NormalizedCorrelation, &frame_a, &frame_b, &windows, deadline)
            }
            CorrelationStrategy::Apodized => {
                let kernel = ApodizedCorrelation::new(cfg.window_width, cfg.window_height);
                self.correlate(&kernel, &frame_a, &frame_b, &windows, deadline)
            }
        };

        let total = windows.len();
        let mut vectors = Vec::with_capacity(total);
        let mut processed = 0usize;
        for (slot, win) in slots.into_iter().zip(&windows) {
            match slot {
                Some(result) => {
                    vectors.push(result?);
                    processed += 1;
                }
                None => {
                    let (x, y) = win.center();
                    vectors.push(DisplacementVector::invalid(x, y));
                }
            }
        }
        let status = if processed == total {
            FieldStatus::Complete
        } else {
            trace_warn!("deadline_expired", processed = processed, total = total);
            FieldStatus::Degraded { processed, total }
        };

        let report = apply_filters(&mut vectors, cfg, (spec.step_x, spec.step_y));
        trace_event!(
            "filter",
            below_floor = report.below_floor,
            rejected = report.rejected,
            replaced = report.replaced
        );

        let statistics = Statistics::compute(&vectors, calibration);
        trace_event!(
            "field",
            total = statistics.total_vectors,
            valid = statistics.valid_vectors
        );
        Ok(VectorField {
            vectors,
            config: cfg.clone(),
            statistics,
            status,
        })
    }

    fn correlate<K: CorrelationKernel>(
        &self,
        kernel: &K,
        frame_a: &WorkingFrame,
        frame_b: &WorkingFrame,
        windows: &[InterrogationWindow],
        deadline: Option<Instant>,
    ) -> Vec<schedule::Slot> {
        let _span = trace_span!("correlate", windows = windows.len()).entered();
        let ctx = WindowContext {
            frame_a,
            frame_b,
            kernel,
            config: &self.config,
        };
        run_windows(&ctx, windows, deadline, self.parallelism())
    }
}

/// Computes one field with a temporary engine.
pub fn process_pair(
    a: &Frame,
    b: &Frame,
    config: &PivConfig,
    calibration: Option<Calibration>,
) -> PivResult<VectorField> {
    PivEngine::new(config.clone())?.process_pair(a, b, calibration)
}
