//! 1-D histogram painting: step-line or filled area over the visible bins,
//! or the error-bar representation with optional end caps and markers.

use crate::core::{HistogramDescriptor, ZoomWindow};
use crate::options::DrawOptions;
use crate::render::{self, RenderCmd, Stroke, TipHit, TipQuery};
use crate::scale::{FrameRange, ScalePair};
use crate::stats::VisibleRange;
use crate::style;
use glam::DVec2;

/// One histogram sample point: the left bin edge in plain mode, the bin
/// center in error mode (shifted by half a bin width).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinPoint1D {
    pub x: f64,
    pub y: f64,
    pub xerr: f64,
    pub yerr: f64,
}

/// Content scan result plus the derived frame extent. Built once per paint
/// pass; the frame extent feeds the shared scales of the overlay group.
#[derive(Clone, Debug)]
pub struct Hist1DLayout {
    pub bins: Vec<BinPoint1D>,
    pub hmin: f64,
    pub hmax: f64,
    pub range: FrameRange,
    pub bin_width: f64,
    pub draw_content: bool,
}

/// Scan the content and derive the display extent. A forced minimum or
/// maximum replaces the scanned value; otherwise the extent gets 5%
/// headroom above (and below, when negative) the content.
pub fn layout(histo: &HistogramDescriptor, opts: &DrawOptions) -> Hist1DLayout {
    let nbins = histo.x_axis.nbins;
    let bin_width = histo.x_axis.bin_width();
    let mut hmin = 1.0e32_f64;
    let mut hmax = -1.0e32_f64;
    for bin in 0..nbins {
        let v = histo.bin_content(bin);
        hmin = hmin.min(v);
        hmax = hmax.max(v);
    }
    let mul = if hmin < 0.0 { 1.05 } else { 1.0 };

    let mut range = FrameRange::new(
        histo.x_axis.min,
        histo.x_axis.max,
        histo.y_axis.min,
        histo.y_axis.max,
    );
    let mut draw_content;
    if nbins == 0 || (hmin.abs() < 1e-300 && hmax.abs() < 1e-300) {
        if let Some(min) = histo.minimum {
            range.ymin = min;
        }
        if let Some(max) = histo.maximum {
            range.ymax = max;
        }
        draw_content = false;
    } else {
        if let Some(min) = histo.minimum {
            hmin = min;
        }
        if let Some(max) = histo.maximum {
            hmax = max;
        }
        range.ymin = hmin * mul;
        range.ymax = hmax * 1.05;
        draw_content = true;
    }
    if opts.bar == 0 && opts.hist == 0 && opts.error == 0 {
        draw_content = false;
    }
    if !draw_content {
        return Hist1DLayout {
            bins: Vec::new(),
            hmin,
            hmax,
            range,
            bin_width,
            draw_content,
        };
    }

    // Point p carries content slot p, so p == 0 is the underflow; the step
    // interpolation makes slot p span the edges p-1..p.
    let bins = (0..=nbins)
        .map(|p| {
            let offset = if opts.error > 0 {
                p as f64 * bin_width - bin_width / 2.0
            } else {
                p as f64 * bin_width
            };
            BinPoint1D {
                x: histo.x_axis.min + offset,
                y: histo.content.get(p).copied().unwrap_or(0.0),
                xerr: bin_width / 2.0,
                yerr: match &histo.errors {
                    Some(errs) => errs.get(p).copied().unwrap_or(0.0),
                    None => histo.content.get(p).copied().unwrap_or(0.0).abs().sqrt(),
                },
            }
        })
        .collect();
    Hist1DLayout {
        bins,
        hmin,
        hmax,
        range,
        bin_width,
        draw_content,
    }
}

/// Render the histogram content into commands. Empty when the content scan
/// disabled drawing.
pub fn draw(
    histo: &HistogramDescriptor,
    opts: &DrawOptions,
    layout: &Hist1DLayout,
    scales: &ScalePair,
    zoom: &ZoomWindow,
) -> Vec<RenderCmd> {
    if !layout.draw_content {
        return Vec::new();
    }
    if opts.error > 0 {
        return draw_errors(histo, opts, layout, scales, zoom);
    }

    let visible = VisibleRange::of(histo, zoom);
    let line_color = style::series_color(histo.style.line_color);
    let stroke = Stroke {
        color: line_color,
        width: f64::from(histo.style.line_width.max(1)),
        dash: style::line_dash(histo.style.line_style).to_owned(),
    };

    // Two points per bin give the horizontal tops; equal-x neighbours form
    // the vertical steps on their own.
    let mut points = Vec::with_capacity(2 * visible.len());
    for bin in visible.left..visible.right {
        let v = histo.bin_content(bin);
        let x0 = histo.x_axis.min + bin as f64 * layout.bin_width;
        points.push(scales.map(DVec2::new(x0, v)));
        points.push(scales.map(DVec2::new(x0 + layout.bin_width, v)));
    }
    if points.is_empty() {
        return Vec::new();
    }

    let fill = render::fill_color(&histo.style);
    if let Some(fill) = fill {
        let base = scales.y.map(0.0);
        let mut area = points;
        let last_x = area.last().map(|p| p.x).unwrap_or(0.0);
        let first_x = area.first().map(|p| p.x).unwrap_or(0.0);
        area.push(DVec2::new(last_x, base));
        area.push(DVec2::new(first_x, base));
        vec![RenderCmd::Path {
            points: area,
            closed: true,
            stroke: Some(stroke),
            fill: Some(fill),
        }]
    } else {
        vec![RenderCmd::Path {
            points,
            closed: false,
            stroke: Some(stroke),
            fill: None,
        }]
    }
}

/// Error-bar mode: horizontal x-error segment, vertical y-error segment,
/// the E1 end caps at 3 px and a marker glyph per visible bin.
fn draw_errors(
    histo: &HistogramDescriptor,
    opts: &DrawOptions,
    layout: &Hist1DLayout,
    scales: &ScalePair,
    zoom: &ZoomWindow,
) -> Vec<RenderCmd> {
    let visible = VisibleRange::of(histo, zoom);
    let stroke = Stroke::solid(
        style::series_color(histo.style.line_color),
        f64::from(histo.style.line_width.max(1)),
    );
    let glyph = style::marker_glyph(histo.style.marker_style);
    let marker_size = if histo.style.marker_style == 1 {
        1.0
    } else {
        histo.style.marker_size * 32.0
    };
    let marker_color = style::series_color(histo.style.marker_color);

    let mut cmds = Vec::new();
    // Points 1..=nbins are the real bins; point 0 is the underflow center.
    for p in (visible.left + 1)..=visible.right {
        let Some(b) = layout.bins.get(p) else { break };
        let xl = scales.x.map(b.x - b.xerr);
        let xr = scales.x.map(b.x + b.xerr);
        let xc = scales.x.map(b.x);
        let yc = scales.y.map(b.y);
        let yl = scales.y.map(b.y - b.yerr);
        let yh = scales.y.map(b.y + b.yerr);

        cmds.push(RenderCmd::line(
            DVec2::new(xl, yc),
            DVec2::new(xr, yc),
            stroke.clone(),
        ));
        cmds.push(RenderCmd::line(
            DVec2::new(xc, yl),
            DVec2::new(xc, yh),
            stroke.clone(),
        ));
        if opts.error == 11 {
            for x in [xl, xr] {
                cmds.push(RenderCmd::line(
                    DVec2::new(x, yc - 3.0),
                    DVec2::new(x, yc + 3.0),
                    stroke.clone(),
                ));
            }
            for y in [yl, yh] {
                cmds.push(RenderCmd::line(
                    DVec2::new(xc - 3.0, y),
                    DVec2::new(xc + 3.0, y),
                    stroke.clone(),
                ));
            }
        }
        cmds.push(RenderCmd::Marker {
            at: DVec2::new(xc, yc),
            glyph,
            size: marker_size,
            color: marker_color,
        });
    }
    cmds
}

/// Nearest-bin tooltip: the probed x picks the bin, and the cursor must sit
/// below the histogram line for the bin to claim the tip.
pub fn tooltip(
    histo: &HistogramDescriptor,
    layout: &Hist1DLayout,
    tip: &TipQuery,
) -> Option<TipHit> {
    if !layout.draw_content || layout.bin_width <= 0.0 {
        return None;
    }
    let nbin = ((tip.x - histo.x_axis.min) / layout.bin_width - 0.5).round();
    if nbin < 0.0 || nbin >= histo.x_axis.nbins as f64 {
        return None;
    }
    let nbin = nbin as usize;
    let value = histo.bin_content(nbin);
    let dist = value - tip.y;
    if dist <= 0.0 {
        return None;
    }
    let x1 = histo.x_axis.min + layout.bin_width * nbin as f64;
    Some(TipHit {
        dist,
        lines: vec![
            format!("histo: {}", histo.name),
            format!("bin: {nbin}"),
            format!("cont: {}", render::precision(value, 4)),
        ],
        x1,
        x2: x1 + layout.bin_width,
        y1: value,
        y2: layout.range.ymin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, PadConfig, Viewport};

    fn histo() -> HistogramDescriptor {
        HistogramDescriptor::new_1d("h1", 5, 0.0, 5.0).with_content(&[2.0, 4.0, 6.0, 4.0, 2.0])
    }

    fn decode(h: &HistogramDescriptor, opt: &str) -> DrawOptions {
        DrawOptions::decode(opt, h, &PadConfig::default())
    }

    fn pair(l: &Hist1DLayout) -> ScalePair {
        ScalePair::build(
            l.range,
            &ZoomWindow::UNSET,
            Viewport::new(100.0, 100.0),
            false,
            false,
        )
    }

    #[test]
    fn layout_adds_headroom() {
        let h = histo();
        let l = layout(&h, &decode(&h, ""));
        assert!(l.draw_content);
        assert_eq!(l.range.ymin, 2.0);
        assert!((l.range.ymax - 6.3).abs() < 1e-12);
        assert_eq!(l.bins.len(), 6);
    }

    #[test]
    fn forced_extrema_replace_the_scan() {
        let mut h = histo();
        h.minimum = Some(0.0);
        h.maximum = Some(10.0);
        let l = layout(&h, &decode(&h, ""));
        assert_eq!(l.range.ymin, 0.0);
        assert!((l.range.ymax - 10.5).abs() < 1e-12);
    }

    #[test]
    fn empty_content_disables_drawing() {
        let h = HistogramDescriptor::new_1d("hempty", 5, 0.0, 5.0);
        let opts = decode(&h, "");
        let l = layout(&h, &opts);
        assert!(!l.draw_content);
        assert!(draw(&h, &opts, &l, &pair(&l), &ZoomWindow::UNSET).is_empty());
    }

    #[test]
    fn error_mode_shifts_points_to_bin_centers() {
        let mut h = histo();
        h.errors = Some(vec![0.5; 7]);
        let opts = decode(&h, "E");
        let l = layout(&h, &opts);
        // Point 1 is the first real bin, centered at 0.5.
        assert_eq!(l.bins[1].x, 0.5);
        assert_eq!(l.bins[1].yerr, 0.5);
    }

    #[test]
    fn step_line_restricted_to_zoomed_range() {
        let h = histo();
        let opts = decode(&h, "");
        let l = layout(&h, &opts);
        let zoom = ZoomWindow {
            xmin: 1.2,
            xmax: 3.8,
            ..ZoomWindow::UNSET
        };
        let scales = ScalePair::build(l.range, &zoom, Viewport::new(100.0, 100.0), false, false);
        let cmds = draw(&h, &opts, &l, &scales, &zoom);
        assert_eq!(cmds.len(), 1);
        let RenderCmd::Path { points, closed, .. } = &cmds[0] else {
            panic!("expected a path");
        };
        assert!(!closed);
        // Bins 1..4 visible: two points each.
        assert_eq!(points.len(), 6);
    }

    #[test]
    fn fill_mode_closes_the_area() {
        let mut h = histo();
        h.style.fill_color = 2;
        h.style.fill_style = 1001;
        let opts = decode(&h, "");
        let l = layout(&h, &opts);
        let cmds = draw(&h, &opts, &l, &pair(&l), &ZoomWindow::UNSET);
        let RenderCmd::Path { closed, fill, .. } = &cmds[0] else {
            panic!("expected a path");
        };
        assert!(closed);
        assert!(fill.is_some());
    }

    #[test]
    fn e1_adds_end_caps() {
        let h = histo();
        let opts = decode(&h, "E1");
        let l = layout(&h, &opts);
        let cmds = draw(&h, &opts, &l, &pair(&l), &ZoomWindow::UNSET);
        // Per bin: 2 error segments + 4 caps + 1 marker.
        assert_eq!(cmds.len(), 5 * 7);
        let plain = draw(&h, &decode(&h, "E"), &l, &pair(&l), &ZoomWindow::UNSET);
        assert_eq!(plain.len(), 5 * 3);
    }

    #[test]
    fn tooltip_requires_cursor_under_the_line() {
        let h = histo();
        let l = layout(&h, &decode(&h, ""));
        let hit = tooltip(&h, &l, &TipQuery { x: 2.5, y: 1.0 }).unwrap();
        assert_eq!(hit.lines[1], "bin: 2");
        assert_eq!(hit.y1, 6.0);
        assert_eq!((hit.x1, hit.x2), (2.0, 3.0));
        assert!(tooltip(&h, &l, &TipQuery { x: 2.5, y: 7.0 }).is_none());
        assert!(tooltip(&h, &l, &TipQuery { x: -1.0, y: 0.0 }).is_none());
    }

    #[test]
    fn color_zero_resolves_to_series_default() {
        let h = histo();
        let opts = decode(&h, "");
        let l = layout(&h, &opts);
        let cmds = draw(&h, &opts, &l, &pair(&l), &ZoomWindow::UNSET);
        let RenderCmd::Path { stroke, .. } = &cmds[0] else {
            panic!("expected a path");
        };
        assert_eq!(stroke.as_ref().unwrap().color, Color::BLACK);
        let mut h = h;
        h.style.line_color = 0;
        let cmds = draw(&h, &opts, &l, &pair(&l), &ZoomWindow::UNSET);
        let RenderCmd::Path { stroke, .. } = &cmds[0] else {
            panic!("expected a path");
        };
        assert_eq!(stroke.as_ref().unwrap().color, Color::DEFAULT_SERIES);
    }
}
