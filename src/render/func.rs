//! Continuous function painting: saved samples when present, otherwise a
//! live sweep over the definition range.

use crate::core::FunctionDescriptor;
use crate::render::{RenderCmd, Stroke, TipHit, TipQuery};
use crate::scale::{FrameRange, ScalePair};
use crate::style;
use glam::DVec2;

/// Minimum number of sample points for a live evaluation.
const MIN_SAMPLES: usize = 103;

#[derive(Clone, Debug)]
pub struct FuncLayout {
    pub points: Vec<DVec2>,
    pub range: FrameRange,
}

/// Sample the function. Saved samples win over the callable body; during a
/// live sweep a NaN sample becomes 0 in the curve but never contributes to
/// the auto-range, and an all-NaN prefix/suffix trims the x range.
pub fn layout(func: &FunctionDescriptor) -> FuncLayout {
    if let Some(saved) = &func.saved {
        let nb = saved.len().max(1);
        let bw = (func.xmax - func.xmin) / nb as f64;
        let points: Vec<DVec2> = saved
            .iter()
            .enumerate()
            .map(|(p, y)| DVec2::new(func.xmin + p as f64 * bw, *y))
            .collect();
        let mut ymin = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let mut ymax = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        if !ymin.is_finite() {
            ymin = 0.0;
            ymax = 0.0;
        }
        return FuncLayout {
            points,
            range: headroom(func.xmin, func.xmax, ymin, ymax),
        };
    }

    let Some(eval) = &func.eval else {
        return FuncLayout {
            points: Vec::new(),
            range: headroom(func.xmin, func.xmax, 0.0, 0.0),
        };
    };
    let nb = func.npx.max(MIN_SAMPLES);
    let bw = (func.xmax - func.xmin) / nb as f64;
    let mut points = Vec::with_capacity(nb);
    let mut ymin = 0.0;
    let mut ymax = 0.0;
    let mut left: Option<usize> = None;
    let mut right: Option<usize> = None;
    for p in 0..nb {
        let x = func.xmin + p as f64 * bw;
        let y = eval(x);
        if y.is_nan() {
            points.push(DVec2::new(x, 0.0));
            continue;
        }
        if left.is_none() {
            left = Some(p);
            ymin = y;
            ymax = y;
        }
        right = Some(p);
        ymin = ymin.min(y);
        ymax = ymax.max(y);
        points.push(DVec2::new(x, y));
    }
    let (mut xmin, mut xmax) = (func.xmin, func.xmax);
    if let (Some(l), Some(r)) = (left, right) {
        if l < r {
            xmax = func.xmin + r as f64 * bw;
            xmin = func.xmin + l as f64 * bw;
        }
    }
    FuncLayout {
        points,
        range: headroom(xmin, xmax, ymin, ymax),
    }
}

fn headroom(xmin: f64, xmax: f64, mut ymin: f64, mut ymax: f64) -> FrameRange {
    if ymax > 0.0 {
        ymax *= 1.05;
    }
    if ymin < 0.0 {
        ymin *= 1.05;
    }
    FrameRange::new(xmin, xmax, ymin, ymax)
}

/// Single stroked curve through the sample points.
pub fn draw(func: &FunctionDescriptor, layout: &FuncLayout, scales: &ScalePair) -> Vec<RenderCmd> {
    if layout.points.is_empty() {
        return Vec::new();
    }
    let stroke = Stroke {
        color: style::series_color(func.style.line_color),
        width: f64::from(func.style.line_width.max(1)),
        dash: style::line_dash(func.style.line_style).to_owned(),
    };
    vec![RenderCmd::Path {
        points: layout.points.iter().map(|p| scales.map(*p)).collect(),
        closed: false,
        stroke: Some(stroke),
        fill: None,
    }]
}

/// Euclidean nearest sample point.
pub fn tooltip(func: &FunctionDescriptor, layout: &FuncLayout, tip: &TipQuery) -> Option<TipHit> {
    let (nbin, min) = layout
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| ((p.x - tip.x).powi(2) + (p.y - tip.y).powi(2), i))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(d, i)| (i, d))?;
    let p = layout.points[nbin];
    Some(TipHit {
        dist: min.sqrt(),
        lines: vec![format!("tf1:{}", func.name), format!("bin: {nbin}")],
        x1: p.x,
        x2: p.x,
        y1: p.y,
        y2: p.y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Viewport, ZoomWindow};

    #[test]
    fn live_sampling_uses_at_least_the_minimum_count() {
        let f = FunctionDescriptor::new("f", 0.0, 10.0, |x| x * x);
        let l = layout(&f);
        assert_eq!(l.points.len(), 103);
        assert_eq!(l.range.ymin, 0.0);
        assert!(l.range.ymax > 90.0);
    }

    #[test]
    fn saved_samples_win_over_eval() {
        let mut f = FunctionDescriptor::new("f", 0.0, 4.0, |_| 1000.0);
        f.saved = Some(vec![1.0, 2.0, 3.0, 4.0]);
        let l = layout(&f);
        assert_eq!(l.points.len(), 4);
        assert_eq!(l.points[0], DVec2::new(0.0, 1.0));
        assert!((l.range.ymax - 4.2).abs() < 1e-12);
    }

    #[test]
    fn nan_samples_are_zero_in_curve_but_skip_the_range() {
        let f = FunctionDescriptor::new("f", -1.0, 1.0, |x| x.sqrt());
        let l = layout(&f);
        // Negative side evaluates to NaN: curve carries zeros there.
        assert_eq!(l.points[0].y, 0.0);
        assert!(l.range.ymin >= 0.0);
        // The auto-range trims the all-NaN left part.
        assert!(l.range.xmin >= 0.0 - 1e-9);
    }

    #[test]
    fn negative_range_gets_headroom_downwards() {
        let f = FunctionDescriptor::new("f", 0.0, 1.0, |x| -x);
        let l = layout(&f);
        assert!(l.range.ymin < -1.0 + 1e-3);
    }

    #[test]
    fn draw_emits_one_path() {
        let f = FunctionDescriptor::new("f", 0.0, 1.0, |x| x);
        let l = layout(&f);
        let scales = ScalePair::build(
            l.range,
            &ZoomWindow::UNSET,
            Viewport::new(100.0, 100.0),
            false,
            false,
        );
        let cmds = draw(&f, &l, &scales);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(&cmds[0], RenderCmd::Path { closed: false, .. }));
    }

    #[test]
    fn tooltip_snaps_to_nearest_sample() {
        let f = FunctionDescriptor::new("f", 0.0, 1.0, |x| x);
        let l = layout(&f);
        let hit = tooltip(&f, &l, &TipQuery { x: 0.5, y: 0.5 }).unwrap();
        assert!(hit.dist < 0.01);
        assert!(hit.lines[0].starts_with("tf1:"));
    }
}
