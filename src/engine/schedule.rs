//! Window scheduling across workers.
//!
//! Every window owns one result slot, addressed by its grid index, so the
//! assembled field does not depend on which worker ran which window.

use std::time::Instant;

use crate::config::PivConfig;
use crate::engine::window::{WindowContext, WindowScratch};
use crate::field::DisplacementVector;
use crate::grid::InterrogationWindow;
use crate::kernel::CorrelationKernel;
use crate::util::PivResult;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Result slot of one window; `None` when the deadline passed before the
/// window started.
pub(crate) type Slot = Option<PivResult<DisplacementVector>>;

/// Where window and pair level work runs.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Parallelism<'p> {
    Sequential,
    #[cfg(feature = "rayon")]
    Global,
    #[cfg(feature = "rayon")]
    Pool(&'p rayon::ThreadPool),
    /// Keeps the pool lifetime when `rayon` is disabled; never constructed.
    #[cfg(not(feature = "rayon"))]
    #[allow(dead_code)]
    NoPool(std::marker::PhantomData<&'p ()>),
}

impl Parallelism<'_> {
    /// Runs `op` inside the dedicated pool, if any.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn install<R, F>(self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self {
            #[cfg(feature = "rayon")]
            Parallelism::Pool(pool) => pool.install(op),
            _ => op(),
        }
    }

    pub(crate) fn is_parallel(self) -> bool {
        !matches!(self, Parallelism::Sequential)
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

fn fill_slot<K: CorrelationKernel>(
    ctx: &WindowContext<'_, K>,
    win: &InterrogationWindow,
    deadline: Option<Instant>,
    scratch: &mut WindowScratch,
    slot: &mut Slot,
) {
    // Started windows always run to completion.
    if expired(deadline) {
        return;
    }
    *slot = Some(ctx.process(win, scratch));
}

/// Processes every window into its slot.
pub(crate) fn run_windows<K: CorrelationKernel>(
    ctx: &WindowContext<'_, K>,
    windows: &[InterrogationWindow],
    deadline: Option<Instant>,
    parallelism: Parallelism<'_>,
) -> Vec<Slot> {
    let mut slots: Vec<Slot> = vec![None; windows.len()];
    let cfg: &PivConfig = ctx.config;

    if !parallelism.is_parallel() {
        let mut scratch = WindowScratch::new(cfg);
        for (slot, win) in slots.iter_mut().zip(windows) {
            fill_slot(ctx, win, deadline, &mut scratch, slot);
        }
        return slots;
    }

    #[cfg(feature = "rayon")]
    parallelism.install(|| {
        slots
            .par_iter_mut()
            .zip(windows.par_iter())
            .for_each_init(
                || WindowScratch::new(cfg),
                |scratch, (slot, win)| fill_slot(ctx, win, deadline, scratch, slot),
            );
    });
    slots
}
