//! Per-window correlation and refinement.

use crate::candidate::CorrelationMap;
use crate::config::PivConfig;
use crate::field::DisplacementVector;
use crate::grid::InterrogationWindow;
use crate::kernel::CorrelationKernel;
use crate::preprocess::WorkingFrame;
use crate::refine::refine_peak;
use crate::util::PivResult;

/// Scratch buffers owned by one worker and reused across its windows.
#[derive(Debug)]
pub(crate) struct WindowScratch {
    map: CorrelationMap,
    buf: Vec<f32>,
}

impl WindowScratch {
    pub(crate) fn new(cfg: &PivConfig) -> Self {
        Self {
            map: CorrelationMap::new(cfg.search_range),
            buf: Vec::with_capacity(cfg.window_width * cfg.window_height),
        }
    }
}

/// Read-only inputs shared by every window of a request.
pub(crate) struct WindowContext<'a, K> {
    pub(crate) frame_a: &'a WorkingFrame,
    pub(crate) frame_b: &'a WorkingFrame,
    pub(crate) kernel: &'a K,
    pub(crate) config: &'a PivConfig,
}

impl<K: CorrelationKernel> WindowContext<'_, K> {
    /// Correlates one window and refines its peak.
    ///
    /// Flat templates and windows without any scorable offset yield an
    /// invalid zero vector with correlation 0.
    pub(crate) fn process(
        &self,
        win: &InterrogationWindow,
        scratch: &mut WindowScratch,
    ) -> PivResult<DisplacementVector> {
        let (x, y) = win.center();
        let template = self.frame_a.window_view(win)?;
        let search = self.frame_b.search_area(win, self.config.search_range)?;

        scratch.map.reset(self.config.search_range);
        if !self
            .kernel
            .correlate(template, &search, &mut scratch.map, &mut scratch.buf)
        {
            return Ok(DisplacementVector::invalid(x, y));
        }
        let Some(peak) = scratch.map.peak() else {
            return Ok(DisplacementVector::invalid(x, y));
        };

        let (u, v) = if self.config.subpixel {
            refine_peak(&scratch.map, peak, self.config.peak_fit)
        } else {
            (peak.dx as f32, peak.dy as f32)
        };
        Ok(DisplacementVector {
            x,
            y,
            u,
            v,
            correlation: peak.score,
            valid: true,
            replaced: false,
        })
    }
}
