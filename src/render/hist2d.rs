//! 2-D histogram painting: scatter markers, content-proportional boxes or
//! a color map with its palette axis.

use crate::core::{Color, HistogramDescriptor, Viewport};
use crate::options::DrawOptions;
use crate::render::{self, RenderCmd, Stroke, TipHit, TipQuery};
use crate::scale::{FrameRange, ScalePair};
use crate::style;
use glam::DVec2;

/// One occupied cell, anchored at the lower-left corner of the bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinPoint2D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Debug)]
pub struct Hist2DLayout {
    pub bins: Vec<BinPoint2D>,
    pub minbin: f64,
    pub maxbin: f64,
    pub scalex: f64,
    pub scaley: f64,
    pub range: FrameRange,
}

/// Collect the cells worth drawing: everything above the global minimum.
/// The min/max scan runs over the whole content array, overflow included.
pub fn layout(histo: &HistogramDescriptor) -> Hist2DLayout {
    let minbin = histo.content.iter().copied().fold(f64::INFINITY, f64::min);
    let maxbin = histo
        .content
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let scalex = histo.x_axis.bin_width();
    let scaley = histo.y_axis.bin_width();
    let mut bins = Vec::new();
    for i in 0..histo.x_axis.nbins {
        for j in 0..histo.y_axis.nbins {
            let z = histo.bin_content_2d(i, j);
            if z > minbin {
                bins.push(BinPoint2D {
                    x: histo.x_axis.min + i as f64 * scalex,
                    y: histo.y_axis.min + j as f64 * scaley,
                    z,
                });
            }
        }
    }
    Hist2DLayout {
        bins,
        minbin,
        maxbin,
        scalex,
        scaley,
        range: FrameRange::new(
            histo.x_axis.min,
            histo.x_axis.max,
            histo.y_axis.min,
            histo.y_axis.max,
        ),
    }
}

/// Working z range for the color map; log-z switches to decimal exponents
/// with the usual non-positive clamp.
fn z_range(layout: &Hist2DLayout, log_z: bool) -> (f64, f64) {
    let (mut wmin, mut wmax) = (layout.minbin, layout.maxbin);
    if !log_z {
        return (wmin, wmax);
    }
    if wmax <= 0.0 {
        wmax = 1.0;
    }
    if wmin <= 0.0 {
        wmin = (0.001 * wmax).min(1.0);
    }
    (wmin.log10(), wmax.log10())
}

pub fn draw(
    histo: &HistogramDescriptor,
    opts: &DrawOptions,
    layout: &Hist2DLayout,
    scales: &ScalePair,
    view: Viewport,
    ndivz: usize,
) -> Vec<RenderCmd> {
    if opts.scat > 0 && histo.style.marker_style > 1 {
        return draw_scatter(histo, layout, scales);
    }
    let nbx = histo.x_axis.nbins.max(1) as f64;
    let nby = histo.y_axis.nbins.max(1) as f64;
    // Zoom blow-up factors: full axis span over the currently shown span.
    let (dx0, dx1) = scales.x.domain();
    let (dy0, dy1) = scales.y.domain();
    let xfactor = (layout.range.xmax - layout.range.xmin).abs() / (dx1 - dx0).abs();
    let yfactor = (layout.range.ymax - layout.range.ymin).abs() / (dy1 - dy0).abs();
    let constx = view.width / nbx / layout.maxbin;
    let consty = view.height / nby / layout.maxbin;

    let (wlmin, wlmax) = z_range(layout, opts.log_z);
    let box_fill = if histo.style.fill_color == 0 {
        Color::DEFAULT_SERIES
    } else {
        style::root_color(histo.style.fill_color)
    };
    let line_color = style::series_color(histo.style.line_color);

    let mut cmds = Vec::with_capacity(layout.bins.len());
    for b in &layout.bins {
        let cmd = if opts.color > 0 {
            // Full cell, painted from the palette, no outline.
            let origin = DVec2::new(scales.x.map(b.x), scales.y.map(b.y + layout.scaley));
            let size = DVec2::new(
                scales.x.map(b.x + layout.scalex) - scales.x.map(b.x),
                scales.y.map(b.y) - scales.y.map(b.y + layout.scaley),
            );
            let zc = if opts.log_z { b.z.max(1e-300).log10() } else { b.z };
            RenderCmd::Rect {
                origin,
                size,
                stroke: None,
                fill: Some(style::value_color(zc, wlmin, wlmax, ndivz)),
            }
        } else {
            // Content-proportional box centered on the cell.
            let w = b.z * constx * xfactor;
            let h = b.z * consty * yfactor;
            let cx = scales.x.map(b.x + layout.scalex / 2.0);
            let cy = scales.y.map(b.y + layout.scaley / 2.0);
            RenderCmd::Rect {
                origin: DVec2::new(cx - 0.5 * w, cy - 0.5 * h),
                size: DVec2::new(w, h),
                stroke: Some(Stroke::solid(line_color, 1.0)),
                fill: Some(box_fill),
            }
        };
        cmds.push(cmd);
    }
    cmds
}

fn draw_scatter(
    histo: &HistogramDescriptor,
    layout: &Hist2DLayout,
    scales: &ScalePair,
) -> Vec<RenderCmd> {
    let glyph = style::marker_glyph(histo.style.marker_style);
    let scale = if histo.style.marker_style == 1 {
        1.0
    } else if glyph.shape == style::MarkerShape::Circle {
        32.0
    } else {
        64.0
    };
    let color = style::series_color(histo.style.marker_color);
    layout
        .bins
        .iter()
        .map(|b| RenderCmd::Marker {
            at: scales.map(DVec2::new(b.x, b.y)),
            glyph,
            size: histo.style.marker_size * scale,
            color,
        })
        .collect()
}

const PALETTE_GAP: f64 = 5.0;
const PALETTE_WIDTH: f64 = 15.0;

/// Vertical palette strip right of the frame, one band per palette slot,
/// with the z extremes labelled.
pub fn palette_axis(layout: &Hist2DLayout, opts: &DrawOptions, view: Viewport) -> Vec<RenderCmd> {
    if opts.zscale == 0 {
        return Vec::new();
    }
    let palette = style::default_palette();
    let n = palette.len();
    let band = view.height / n as f64;
    let x = view.width + PALETTE_GAP;
    let mut cmds = Vec::with_capacity(n + 2);
    for (i, color) in palette.iter().enumerate() {
        // Slot 0 is the low end, drawn at the bottom.
        let y = view.height - (i as f64 + 1.0) * band;
        cmds.push(RenderCmd::Rect {
            origin: DVec2::new(x, y),
            size: DVec2::new(PALETTE_WIDTH, band),
            stroke: None,
            fill: Some(*color),
        });
    }
    cmds.push(RenderCmd::text(
        DVec2::new(x + PALETTE_WIDTH + 2.0, view.height),
        render::precision(layout.minbin, 4),
        10.0,
    ));
    cmds.push(RenderCmd::text(
        DVec2::new(x + PALETTE_WIDTH + 2.0, 10.0),
        render::precision(layout.maxbin, 4),
        10.0,
    ));
    cmds
}

/// Cell tooltip; a 2-D hit is exact, so it always ranks first.
pub fn tooltip(
    histo: &HistogramDescriptor,
    layout: &Hist2DLayout,
    tip: &TipQuery,
) -> Option<TipHit> {
    if layout.scalex <= 0.0 || layout.scaley <= 0.0 {
        return None;
    }
    let i = ((tip.x - layout.scalex / 2.0 - layout.range.xmin) / layout.scalex).round();
    let j = ((tip.y - layout.scaley / 2.0 - layout.range.ymin) / layout.scaley).round();
    if i < 0.0 || i >= histo.x_axis.nbins as f64 || j < 0.0 || j >= histo.y_axis.nbins as f64 {
        return None;
    }
    let (i, j) = (i as usize, j as usize);
    let value = histo.bin_content_2d(i, j);
    if value <= layout.minbin {
        return None;
    }
    Some(TipHit {
        dist: 0.0,
        lines: vec![
            format!("histo: {}", histo.name),
            format!("binx:{i} biny:{j}"),
            format!("cont: {value}"),
        ],
        x1: layout.range.xmin + i as f64 * layout.scalex,
        x2: layout.range.xmin + (i as f64 + 1.0) * layout.scalex,
        y1: layout.range.ymin + (j as f64 + 1.0) * layout.scaley,
        y2: layout.range.ymin + j as f64 * layout.scaley,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PadConfig, ZoomWindow};

    fn histo() -> HistogramDescriptor {
        let mut h = HistogramDescriptor::new_2d("h2", 3, 0.0, 3.0, 3, 0.0, 3.0);
        let row = h.x_axis.nbins + 2;
        h.content[row + 1] = 5.0; // (0,0)
        h.content[2 * row + 2] = 10.0; // (1,1)
        h.content[3 * row + 3] = 2.0; // (2,2)
        h
    }

    fn scales(l: &Hist2DLayout, zoom: &ZoomWindow) -> ScalePair {
        ScalePair::build(l.range, zoom, Viewport::new(300.0, 300.0), false, false)
    }

    fn decode(h: &HistogramDescriptor, opt: &str) -> DrawOptions {
        DrawOptions::decode(opt, h, &PadConfig::default())
    }

    #[test]
    fn layout_keeps_only_occupied_cells() {
        let l = layout(&histo());
        assert_eq!(l.bins.len(), 3);
        assert_eq!(l.minbin, 0.0);
        assert_eq!(l.maxbin, 10.0);
    }

    #[test]
    fn color_mode_fills_whole_cells() {
        let h = histo();
        let opts = decode(&h, "COLZ");
        let l = layout(&h);
        let view = Viewport::new(300.0, 300.0);
        let cmds = draw(&h, &opts, &l, &scales(&l, &ZoomWindow::UNSET), view, 20);
        assert_eq!(cmds.len(), 3);
        for c in &cmds {
            let RenderCmd::Rect { size, stroke, fill, .. } = c else {
                panic!("expected rects");
            };
            assert!((size.x - 100.0).abs() < 1e-9);
            assert!(stroke.is_none());
            assert!(fill.is_some());
        }
    }

    #[test]
    fn box_mode_scales_with_content() {
        let h = histo();
        let opts = decode(&h, "BOX");
        let l = layout(&h);
        let view = Viewport::new(300.0, 300.0);
        let cmds = draw(&h, &opts, &l, &scales(&l, &ZoomWindow::UNSET), view, 20);
        let sizes: Vec<f64> = cmds
            .iter()
            .map(|c| match c {
                RenderCmd::Rect { size, .. } => size.x,
                _ => panic!("expected rects"),
            })
            .collect();
        // Cell with content 10 fills its slot; content 5 fills half.
        assert!((sizes[1] - 100.0).abs() < 1e-9);
        assert!((sizes[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn box_mode_grows_under_zoom() {
        let h = histo();
        let opts = decode(&h, "BOX");
        let l = layout(&h);
        let view = Viewport::new(300.0, 300.0);
        let zoom = ZoomWindow {
            xmin: 0.0,
            xmax: 1.5,
            ymin: 0.0,
            ymax: 1.5,
        };
        let cmds = draw(&h, &opts, &l, &scales(&l, &zoom), view, 20);
        let RenderCmd::Rect { size, .. } = &cmds[0] else {
            panic!("expected rects");
        };
        // Factor 2 on both axes.
        assert!((size.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn scatter_mode_emits_markers() {
        let mut h = histo();
        h.style.marker_style = 20;
        let opts = decode(&h, "SCAT");
        let l = layout(&h);
        let cmds = draw(
            &h,
            &opts,
            &l,
            &scales(&l, &ZoomWindow::UNSET),
            Viewport::new(300.0, 300.0),
            20,
        );
        assert!(cmds.iter().all(|c| matches!(c, RenderCmd::Marker { .. })));
        assert_eq!(cmds.len(), 3);
    }

    #[test]
    fn palette_axis_only_with_zscale() {
        let h = histo();
        let l = layout(&h);
        let view = Viewport::new(300.0, 300.0);
        assert!(palette_axis(&l, &decode(&h, "COL"), view).is_empty());
        let cmds = palette_axis(&l, &decode(&h, "COLZ"), view);
        assert_eq!(cmds.len(), 52);
        // The strip sits right of the frame.
        let RenderCmd::Rect { origin, .. } = &cmds[0] else {
            panic!("expected rects");
        };
        assert!(origin.x > view.width);
    }

    #[test]
    fn tooltip_hits_occupied_cells_only() {
        let h = histo();
        let l = layout(&h);
        let hit = tooltip(&h, &l, &TipQuery { x: 1.5, y: 1.5 }).unwrap();
        assert_eq!(hit.dist, 0.0);
        assert_eq!(hit.lines[1], "binx:1 biny:1");
        assert_eq!((hit.x1, hit.x2), (1.0, 2.0));
        assert!(tooltip(&h, &l, &TipQuery { x: 2.5, y: 0.5 }).is_none());
        assert!(tooltip(&h, &l, &TipQuery { x: 9.0, y: 9.0 }).is_none());
    }

    #[test]
    fn log_z_range_is_clamped() {
        let l = layout(&histo());
        let (lo, hi) = z_range(&l, true);
        assert!((hi - 1.0).abs() < 1e-12); // log10(10)
        assert!(lo < hi && lo.is_finite());
    }
}
