//! Data-space to pixel-space mapping. A [`ScalePair`] is built once per
//! overlay group by the first painter and shared read-only by the rest, so
//! every object in the group lands in the same coordinate frame.

use crate::core::{Viewport, ZoomWindow};
use glam::DVec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    Linear,
    Log,
}

/// One axis mapping between a data domain and a pixel range. The range may
/// run backwards (the y axis maps `[h, 0]` so larger values sit higher).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    pub kind: ScaleKind,
    dmin: f64,
    dmax: f64,
    rmin: f64,
    rmax: f64,
}

impl AxisScale {
    pub fn linear(mut dmin: f64, mut dmax: f64, rmin: f64, rmax: f64) -> Self {
        if dmin == dmax {
            // Degenerate domain: widen so the mapping stays invertible.
            let pad = if dmin == 0.0 { 1.0 } else { dmin.abs() * 0.1 };
            dmin -= pad;
            dmax += pad;
        }
        Self {
            kind: ScaleKind::Linear,
            dmin,
            dmax,
            rmin,
            rmax,
        }
    }

    /// Log axis; non-positive domain edges are clamped so the mapping stays
    /// finite. A minimum at or below zero becomes `min(1, 0.001 * max)`.
    pub fn log(mut dmin: f64, mut dmax: f64, rmin: f64, rmax: f64) -> Self {
        if dmax <= 0.0 {
            dmax = 1.0;
        }
        if dmin <= 0.0 {
            dmin = (0.001 * dmax).min(1.0);
        }
        if dmin >= dmax {
            dmax = dmin * 10.0;
        }
        Self {
            kind: ScaleKind::Log,
            dmin,
            dmax,
            rmin,
            rmax,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.dmin, self.dmax)
    }

    pub fn range(&self) -> (f64, f64) {
        (self.rmin, self.rmax)
    }

    /// Data value to pixel coordinate. Values outside the domain project
    /// beyond the range ends; callers clip where it matters.
    pub fn map(&self, v: f64) -> f64 {
        let t = match self.kind {
            ScaleKind::Linear => (v - self.dmin) / (self.dmax - self.dmin),
            ScaleKind::Log => {
                let v = if v > 0.0 { v } else { self.dmin };
                (v.ln() - self.dmin.ln()) / (self.dmax.ln() - self.dmin.ln())
            }
        };
        self.rmin + t * (self.rmax - self.rmin)
    }

    /// Pixel coordinate back to data space (used by zoom selection).
    pub fn invert(&self, px: f64) -> f64 {
        let t = (px - self.rmin) / (self.rmax - self.rmin);
        match self.kind {
            ScaleKind::Linear => self.dmin + t * (self.dmax - self.dmin),
            ScaleKind::Log => (self.dmin.ln() + t * (self.dmax.ln() - self.dmin.ln())).exp(),
        }
    }

    /// Tick positions in data space. Linear axes use 1-2-5 stepping around
    /// the requested count; log axes return full decades (falling back to
    /// 2x/5x sub-ticks when the domain spans less than two of them).
    pub fn ticks(&self, count: u32) -> Vec<f64> {
        match self.kind {
            ScaleKind::Linear => self.linear_ticks(count.max(1)),
            ScaleKind::Log => self.log_ticks(),
        }
    }

    fn linear_ticks(&self, count: u32) -> Vec<f64> {
        let span = self.dmax - self.dmin;
        let raw = span / f64::from(count);
        if !raw.is_finite() || raw <= 0.0 {
            return vec![self.dmin];
        }
        let mut step = 10f64.powf(raw.log10().floor());
        let err = raw / step;
        if err >= 50f64.sqrt() {
            step *= 10.0;
        } else if err >= 10f64.sqrt() {
            step *= 5.0;
        } else if err >= 2f64.sqrt() {
            step *= 2.0;
        }
        let mut ticks = Vec::new();
        let mut k = (self.dmin / step).ceil();
        while k * step <= self.dmax + step * 1e-9 {
            // Snap values like 0.30000000000000004 back onto the grid.
            ticks.push((k * step / step).round() * step);
            k += 1.0;
        }
        ticks
    }

    fn log_ticks(&self) -> Vec<f64> {
        let lo = self.dmin.log10().ceil() as i32;
        let hi = self.dmax.log10().floor() as i32;
        let mut ticks: Vec<f64> = (lo..=hi).map(|e| 10f64.powi(e)).collect();
        if ticks.len() < 2 {
            ticks = (lo - 1..=hi)
                .flat_map(|e| {
                    let d = 10f64.powi(e);
                    [d, 2.0 * d, 5.0 * d]
                })
                .filter(|v| *v >= self.dmin && *v <= self.dmax)
                .collect();
        }
        ticks
    }
}

/// Full data-space extent of a frame before any zoom is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRange {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl FrameRange {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }
}

/// The shared x/y mapping of one overlay group. `x` maps onto `[0, width]`,
/// `y` onto `[height, 0]` (pixel y grows downwards).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalePair {
    pub x: AxisScale,
    pub y: AxisScale,
    /// The un-zoomed extent the scales were derived from, kept for unzoom.
    pub full: FrameRange,
}

impl ScalePair {
    /// Build both scales. An active zoom window replaces the corresponding
    /// axis domain; log flags pick the log variant with its clamping.
    pub fn build(
        full: FrameRange,
        zoom: &ZoomWindow,
        view: Viewport,
        log_x: bool,
        log_y: bool,
    ) -> Self {
        let (xmin, xmax) = if zoom.x_active() {
            (zoom.xmin, zoom.xmax)
        } else {
            (full.xmin, full.xmax)
        };
        let (ymin, ymax) = if zoom.y_active() {
            (zoom.ymin, zoom.ymax)
        } else {
            (full.ymin, full.ymax)
        };
        let x = if log_x {
            AxisScale::log(xmin, xmax, 0.0, view.width)
        } else {
            AxisScale::linear(xmin, xmax, 0.0, view.width)
        };
        let y = if log_y {
            AxisScale::log(ymin, ymax, view.height, 0.0)
        } else {
            AxisScale::linear(ymin, ymax, view.height, 0.0)
        };
        Self { x, y, full }
    }

    pub fn map(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.x.map(p.x), self.y.map(p.y))
    }

    pub fn invert(&self, px: DVec2) -> DVec2 {
        DVec2::new(self.x.invert(px.x), self.y.invert(px.y))
    }
}
