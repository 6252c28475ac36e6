//! Frame preprocessing: intensity normalisation, padding and apodization.
//!
//! A `WorkingFrame` is the per-request buffer every later stage reads from.
//! It stores the (possibly padded) samples together with the pad widths so
//! windows can keep addressing pixels in source-frame coordinates.

pub mod apodize;
pub mod pad;

use crate::config::PivConfig;
use crate::grid::InterrogationWindow;
use crate::image::{Frame, ImageView};
use crate::util::{PivError, PivResult};

pub use apodize::{hann, Apodization};
pub use pad::{pad_reflect, reflect_101};

/// Search area cut from frame B for one window.
#[derive(Clone, Copy, Debug)]
pub struct SearchArea<'a> {
    /// Pixels available for the search, clipped to the working buffer.
    pub view: ImageView<'a, f32>,
    /// Column of the zero-displacement template position inside `view`.
    pub origin_x: usize,
    /// Row of the zero-displacement template position inside `view`.
    pub origin_y: usize,
}

/// Per-request working buffer derived from one input frame.
#[derive(Clone, Debug)]
pub struct WorkingFrame {
    buf: Frame,
    pad_x: usize,
    pad_y: usize,
}

impl WorkingFrame {
    /// Prepares a frame for window extraction under `cfg`.
    pub fn prepare(frame: &Frame, cfg: &PivConfig) -> PivResult<Self> {
        let (pad_x, pad_y) = cfg.padding();
        let buf = if cfg.normalize_intensity {
            pad_reflect(&normalize_min_max(frame), pad_x, pad_y)?
        } else {
            pad_reflect(frame, pad_x, pad_y)?
        };
        Ok(Self { buf, pad_x, pad_y })
    }

    /// Returns the padded buffer.
    pub fn buffer(&self) -> &Frame {
        &self.buf
    }

    /// Returns the pad width `(x, y)` on each side.
    pub fn padding(&self) -> (usize, usize) {
        (self.pad_x, self.pad_y)
    }

    /// Returns the template patch covered by `win`.
    pub fn window_view(&self, win: &InterrogationWindow) -> PivResult<ImageView<'_, f32>> {
        let bx = to_buffer(win.x, self.pad_x)?;
        let by = to_buffer(win.y, self.pad_y)?;
        self.buf.view().roi(bx, by, win.width, win.height)
    }

    /// Returns `win` grown by `range` on every side, clipped to the buffer.
    pub fn search_area(
        &self,
        win: &InterrogationWindow,
        range: usize,
    ) -> PivResult<SearchArea<'_>> {
        let range = range as isize;
        let x0 = win.x + self.pad_x as isize;
        let y0 = win.y + self.pad_y as isize;
        let bw = self.buf.width() as isize;
        let bh = self.buf.height() as isize;
        if x0 < 0 || y0 < 0 || x0 + win.width as isize > bw || y0 + win.height as isize > bh {
            return Err(PivError::InvalidInput(
                "interrogation window lies outside the working buffer",
            ));
        }

        let sx0 = (x0 - range).max(0);
        let sy0 = (y0 - range).max(0);
        let sx1 = (x0 + win.width as isize + range).min(bw);
        let sy1 = (y0 + win.height as isize + range).min(bh);
        let view = self.buf.view().roi(
            sx0 as usize,
            sy0 as usize,
            (sx1 - sx0) as usize,
            (sy1 - sy0) as usize,
        )?;
        Ok(SearchArea {
            view,
            origin_x: (x0 - sx0) as usize,
            origin_y: (y0 - sy0) as usize,
        })
    }
}

fn to_buffer(coord: isize, pad: usize) -> PivResult<usize> {
    usize::try_from(coord + pad as isize).map_err(|_| {
        PivError::InvalidInput("interrogation window lies outside the working buffer")
    })
}

/// Linearly stretches intensities to `[0, 1]`; flat frames map to zero.
pub fn normalize_min_max(frame: &Frame) -> Frame {
    let (lo, hi) = frame
        .data()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    let data = if span > 0.0 {
        frame.data().iter().map(|&v| (v - lo) / span).collect()
    } else {
        vec![0.0; frame.data().len()]
    };
    Frame::from_parts(data, frame.width(), frame.height())
}

#[cfg(test)]
mod tests {
    use super::{normalize_min_max, WorkingFrame};
    use crate::config::{CorrelationStrategy, PivConfig};
    use crate::grid::InterrogationWindow;
    use crate::image::Frame;

    fn ramp(width: usize, height: usize) -> Frame {
        let data: Vec<u8> = (0..width * height).map(|i| (i % 251) as u8).collect();
        Frame::from_u8(&data, width, height).unwrap()
    }

    #[test]
    fn normalization_spans_unit_range() {
        let frame = Frame::from_u8(&[10, 20, 30, 50], 2, 2).unwrap();
        let norm = normalize_min_max(&frame);
        assert_eq!(norm.data(), &[0.0, 0.25, 0.5, 1.0]);

        let flat = Frame::from_u8(&[7; 4], 2, 2).unwrap();
        assert!(normalize_min_max(&flat).data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn search_area_is_clipped_without_padding() {
        let frame = ramp(20, 20);
        let cfg = PivConfig {
            window_width: 8,
            window_height: 8,
            search_range: 4,
            ..PivConfig::default()
        };
        let working = WorkingFrame::prepare(&frame, &cfg).unwrap();
        let win = InterrogationWindow {
            x: 2,
            y: 10,
            width: 8,
            height: 8,
        };
        let area = working.search_area(&win, 4).unwrap();
        assert_eq!(area.origin_x, 2);
        assert_eq!(area.origin_y, 4);
        assert_eq!(area.view.width(), 14);
        assert_eq!(area.view.height(), 14);
    }

    #[test]
    fn padded_buffer_holds_full_search_area() {
        let frame = ramp(20, 20);
        let cfg = PivConfig {
            window_width: 8,
            window_height: 8,
            search_range: 4,
            strategy: CorrelationStrategy::Apodized,
            ..PivConfig::default()
        };
        let working = WorkingFrame::prepare(&frame, &cfg).unwrap();
        assert_eq!(working.padding(), (8, 8));
        let win = InterrogationWindow {
            x: -4,
            y: -4,
            width: 8,
            height: 8,
        };
        let area = working.search_area(&win, 4).unwrap();
        assert_eq!((area.origin_x, area.origin_y), (4, 4));
        assert_eq!((area.view.width(), area.view.height()), (16, 16));

        let tpl = working.window_view(&win).unwrap();
        // Source pixel (0, 0) sits at template (4, 4).
        assert_eq!(tpl.get(4, 4).copied(), Some(0.0));
        // Source pixel (-1, 0) mirrors (1, 0).
        assert_eq!(tpl.get(3, 4).copied(), Some(1.0));
    }
}
