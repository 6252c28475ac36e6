//! Interrogation grid generation.
//!
//! Windows are laid out row-major from the top-left corner of the usable
//! area. The usable area is the frame itself for unpadded strategies and the
//! frame grown by half a window on each side when the working buffers are
//! padded, so padded grids can centre windows on the frame border.

use crate::config::{PivConfig, Roi};
use crate::trace::trace_event;
use crate::util::{PivError, PivResult};

/// Rectangular interrogation window in source-frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterrogationWindow {
    /// Left column; negative only inside a padded margin.
    pub x: isize,
    /// Top row; negative only inside a padded margin.
    pub y: isize,
    pub width: usize,
    pub height: usize,
}

impl InterrogationWindow {
    /// Window centre in source coordinates.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }
}

/// Resolved grid parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSpec {
    pub window_width: usize,
    pub window_height: usize,
    pub step_x: usize,
    pub step_y: usize,
    /// Distance windows may reach past the left/right frame edges.
    pub margin_x: usize,
    /// Distance windows may reach past the top/bottom frame edges.
    pub margin_y: usize,
    pub roi: Option<Roi>,
}

impl GridSpec {
    /// Resolves the grid for a configuration; call after `PivConfig::validate`.
    pub fn from_config(cfg: &PivConfig) -> PivResult<Self> {
        let (step_x, step_y) = cfg.steps()?;
        let (margin_x, margin_y) = cfg.grid_margin();
        Ok(Self {
            window_width: cfg.window_width,
            window_height: cfg.window_height,
            step_x,
            step_y,
            margin_x,
            margin_y,
            roi: cfg.roi,
        })
    }
}

/// Tiles a `frame_width x frame_height` frame with interrogation windows.
pub fn generate_grid(
    frame_width: usize,
    frame_height: usize,
    spec: &GridSpec,
) -> PivResult<Vec<InterrogationWindow>> {
    if spec.step_x == 0 || spec.step_y == 0 {
        return Err(PivError::InvalidInput("step must be positive"));
    }
    if spec.window_width == 0 || spec.window_height == 0 {
        return Err(PivError::InvalidInput("window size must be positive"));
    }
    if spec.window_width > frame_width || spec.window_height > frame_height {
        return Err(PivError::WindowTooLarge {
            window_width: spec.window_width,
            window_height: spec.window_height,
            frame_width,
            frame_height,
        });
    }

    let xs = axis_origins(frame_width, spec.window_width, spec.step_x, spec.margin_x);
    let ys = axis_origins(frame_height, spec.window_height, spec.step_y, spec.margin_y);

    let mut windows = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            let win = InterrogationWindow {
                x,
                y,
                width: spec.window_width,
                height: spec.window_height,
            };
            if let Some(roi) = spec.roi {
                let (cx, cy) = win.center();
                if !roi.contains(cx, cy) {
                    continue;
                }
            }
            windows.push(win);
        }
    }

    if windows.is_empty() {
        return Err(PivError::InvalidInput(
            "no interrogation window fits the frame and roi",
        ));
    }
    trace_event!(
        "grid",
        windows = windows.len(),
        columns = xs.len(),
        rows = ys.len()
    );
    Ok(windows)
}

fn axis_origins(extent: usize, window: usize, step: usize, margin: usize) -> Vec<isize> {
    let start = -(margin as isize);
    let end = (extent + margin) as isize;
    let window = window as isize;
    let mut origins = Vec::new();
    let mut pos = start;
    while pos + window <= end {
        origins.push(pos);
        pos += step as isize;
    }
    origins
}

#[cfg(test)]
mod tests {
    use super::{generate_grid, GridSpec, InterrogationWindow};
    use crate::config::Roi;
    use crate::util::PivError;

    fn spec(window: usize, step: usize, margin: usize) -> GridSpec {
        GridSpec {
            window_width: window,
            window_height: window,
            step_x: step,
            step_y: step,
            margin_x: margin,
            margin_y: margin,
            roi: None,
        }
    }

    #[test]
    fn unpadded_grid_stays_inside_frame() {
        let windows = generate_grid(128, 128, &spec(32, 16, 0)).unwrap();
        assert_eq!(windows.len(), 49);
        for win in &windows {
            assert!(win.x >= 0 && win.y >= 0);
            assert!(win.x + 32 <= 128 && win.y + 32 <= 128);
        }
        assert_eq!(windows[0].center(), (16.0, 16.0));
        assert_eq!(windows[1].x, 16);
        assert_eq!(windows[7].y, 16);
    }

    #[test]
    fn padded_grid_centres_windows_on_edges() {
        let windows = generate_grid(128, 128, &spec(32, 16, 16)).unwrap();
        assert_eq!(windows.len(), 81);
        assert_eq!(windows[0].center(), (0.0, 0.0));
        assert_eq!(windows.last().unwrap().center(), (128.0, 128.0));
    }

    #[test]
    fn non_square_windows_skip_partial_tiles() {
        let spec = GridSpec {
            window_width: 40,
            window_height: 20,
            step_x: 40,
            step_y: 20,
            margin_x: 0,
            margin_y: 0,
            roi: None,
        };
        let windows = generate_grid(100, 50, &spec).unwrap();
        // Two columns (0, 40), two rows (0, 20); the remainder is skipped.
        assert_eq!(windows.len(), 4);
        assert!(windows.contains(&InterrogationWindow {
            x: 40,
            y: 20,
            width: 40,
            height: 20,
        }));
    }

    #[test]
    fn roi_filters_by_window_centre() {
        let mut s = spec(32, 16, 0);
        s.roi = Some(Roi {
            x: 40,
            y: 40,
            width: 30,
            height: 30,
        });
        let windows = generate_grid(128, 128, &s).unwrap();
        let centres: Vec<_> = windows.iter().map(|w| w.center()).collect();
        assert_eq!(centres, vec![(48.0, 48.0), (64.0, 48.0), (48.0, 64.0), (64.0, 64.0)]);
    }

    #[test]
    fn degenerate_inputs_are_errors() {
        assert!(matches!(
            generate_grid(16, 16, &spec(32, 16, 0)),
            Err(PivError::WindowTooLarge { .. })
        ));
        assert!(generate_grid(64, 64, &spec(32, 0, 0)).is_err());

        let mut s = spec(8, 8, 0);
        s.roi = Some(Roi {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        });
        assert_eq!(
            generate_grid(64, 64, &s).unwrap_err(),
            PivError::InvalidInput("no interrogation window fits the frame and roi")
        );
    }
}
