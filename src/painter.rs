//! Painter orchestration. An [`Orchestrator`] owns the drawable objects of
//! one overlay group and runs the fixed Decode → Map → Stat → Render
//! sequence for each of them. The first painter that lays out successfully
//! builds the shared [`ScalePair`]; every sibling reuses it, and only zoom
//! commands routed through the orchestrator may replace it.

use crate::core::{
    AxisSpec, HistogramDescriptor, PadConfig, PaintConfig, PlotObject, Viewport, ZoomWindow,
};
use crate::interact::{self, Effect, InteractionController, MenuItem};
use crate::options::DrawOptions;
use crate::render::{self, axes, func, graph, hist1d, hist2d, RenderCmd, TipHit, TipQuery};
use crate::scale::{FrameRange, ScalePair};
use crate::stats::{self, VisibleRange};
use crate::{PaintError, Result};
use error_stack::Report;
use glam::DVec2;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared per-group state. One logical thread of execution; the lock exists
/// so sibling painters can hold cheap read handles while the orchestrator
/// keeps the single write path for zoom and scale replacement.
#[derive(Clone, Debug)]
pub struct GroupContext {
    pub zoom: ZoomWindow,
    pub scales: Option<Arc<ScalePair>>,
    pub view: Viewport,
    pub pad: PadConfig,
    pub show_stats: bool,
}

pub type SharedGroup = Arc<RwLock<GroupContext>>;

/// Per-object render output gathered during one pass, assembled into the
/// final command list afterwards so decoration ends up in a stable order.
struct PaintedPiece {
    content: Vec<RenderCmd>,
    /// Set only for the painter that built the scales this pass.
    frame_axes: Option<(AxisSpec, AxisSpec, i32)>,
    grids: Vec<RenderCmd>,
    title: Option<String>,
    stat_lines: Vec<String>,
    palette: Vec<RenderCmd>,
}

impl PaintedPiece {
    fn new() -> Self {
        Self {
            content: Vec::new(),
            frame_axes: None,
            grids: Vec::new(),
            title: None,
            stat_lines: Vec::new(),
            palette: Vec::new(),
        }
    }
}

pub struct Orchestrator {
    group: SharedGroup,
    objects: Vec<PlotObject>,
    config: PaintConfig,
}

impl Orchestrator {
    pub fn new(view: Viewport, pad: PadConfig, config: PaintConfig) -> Self {
        Self {
            group: Arc::new(RwLock::new(GroupContext {
                zoom: ZoomWindow::UNSET,
                scales: None,
                view,
                pad,
                show_stats: config.auto_stat,
            })),
            objects: Vec::new(),
            config,
        }
    }

    pub fn group(&self) -> SharedGroup {
        Arc::clone(&self.group)
    }

    /// Interaction controller wired to this group's viewport and tooltip
    /// mode. Its [`Effect`]s feed back through [`Orchestrator::apply`].
    pub fn controller(&self) -> InteractionController {
        let g = self.group.read();
        InteractionController::new(g.view, self.config.tooltip)
    }

    /// Register a drawable. Validation happens here so a caller learns about
    /// malformed input at hand-over rather than as a skipped frame later.
    pub fn add_object(&mut self, object: PlotObject) -> Result<usize> {
        validate(&object)?;
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Replace an object's data in place. Histograms keep their painter-side
    /// state through [`HistogramDescriptor::update_from`]; the interactive
    /// zoom survives, only the derived scales are rebuilt.
    pub fn update_object(&mut self, index: usize, object: &PlotObject) -> Result<()> {
        validate(object)?;
        let slot = self.objects.get_mut(index).ok_or_else(|| {
            Report::new(PaintError).attach(format!("no painter at index {index}"))
        })?;
        match (slot, object) {
            (PlotObject::Hist1D(old), PlotObject::Hist1D(new))
            | (PlotObject::Hist2D(old), PlotObject::Hist2D(new)) => old.update_from(new),
            (PlotObject::Graph(old), PlotObject::Graph(new)) => *old = new.clone(),
            (PlotObject::Function(old), PlotObject::Function(new)) => *old = new.clone(),
            _ => {
                return Err(Report::new(PaintError)
                    .attach("update with a different object kind"));
            }
        }
        self.group.write().scales = None;
        Ok(())
    }

    /// Full synchronous redraw of the group. A painter that fails to lay
    /// out is reported and skipped; its siblings still render.
    pub fn redraw(&self) -> Vec<RenderCmd> {
        self.group.write().scales = None;
        let view = self.group.read().view;

        let mut pieces = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            match self.paint(object) {
                Ok(piece) => pieces.push(piece),
                Err(report) => {
                    warn!(object = object.name(), %report, "painter skipped");
                }
            }
        }

        let mut cmds = vec![axes::frame(view)];
        for piece in &pieces {
            cmds.extend(piece.grids.iter().cloned());
        }
        for piece in &pieces {
            cmds.extend(piece.content.iter().cloned());
        }
        let scales = self.group.read().scales.clone();
        if let (Some(scales), Some((x_axis, y_axis, axis_pos))) = (
            &scales,
            pieces.iter().find_map(|p| p.frame_axes.as_ref()),
        ) {
            cmds.extend(axes::axes(scales, view, x_axis, y_axis, *axis_pos));
        }
        if let Some(text) = pieces.iter().find_map(|p| p.title.as_ref()) {
            cmds.extend(axes::title(text, view));
        }
        if self.group.read().show_stats {
            if let Some(lines) = pieces.iter().find(|p| !p.stat_lines.is_empty()) {
                cmds.extend(axes::stat_box(&lines.stat_lines, view, &self.config));
            }
        }
        for piece in &pieces {
            cmds.extend(piece.palette.iter().cloned());
        }
        cmds
    }

    fn paint(&self, object: &PlotObject) -> Result<PaintedPiece> {
        match object {
            PlotObject::Hist1D(h) => self.paint_hist1d(h),
            PlotObject::Hist2D(h) => self.paint_hist2d(h),
            PlotObject::Graph(g) => self.paint_graph(g),
            PlotObject::Function(f) => self.paint_func(f),
        }
    }

    /// Hand out the shared scales, building them from `range` when this is
    /// the first painter of the pass. Returns whether the caller became the
    /// scale owner and therefore draws the frame decoration.
    fn obtain_scales(&self, range: FrameRange, log_x: bool, log_y: bool) -> (Arc<ScalePair>, bool) {
        let mut g = self.group.write();
        if let Some(scales) = &g.scales {
            return (Arc::clone(scales), false);
        }
        let scales = Arc::new(ScalePair::build(range, &g.zoom, g.view, log_x, log_y));
        g.scales = Some(Arc::clone(&scales));
        (scales, true)
    }

    fn paint_hist1d(&self, h: &HistogramDescriptor) -> Result<PaintedPiece> {
        h.validate()?;
        let (zoom, view, pad) = {
            let g = self.group.read();
            (g.zoom, g.view, g.pad)
        };
        let opts = DrawOptions::decode(&h.option, h, &pad);
        let layout = hist1d::layout(h, &opts);
        let (scales, owner) = self.obtain_scales(layout.range, opts.log_x, opts.log_y);

        let mut piece = PaintedPiece::new();
        if opts.axis == 0 {
            piece.content = hist1d::draw(h, &opts, &layout, &scales, &zoom);
        }
        if owner {
            let y_axis = AxisSpec {
                min: layout.range.ymin,
                max: layout.range.ymax,
                ..AxisSpec::default()
            };
            piece.grids = axes::grids(&scales, view, &pad, &h.x_axis, &y_axis);
            piece.frame_axes = Some((h.x_axis.clone(), y_axis, opts.axis_pos));
            piece.title = Some(h.title.clone());
        }
        if layout.draw_content {
            let st = stats::compute_stats_1d(h, VisibleRange::of(h, &zoom));
            piece.stat_lines = stats::stat_lines(h, &st, self.config.opt_stat);
        }
        Ok(piece)
    }

    fn paint_hist2d(&self, h: &HistogramDescriptor) -> Result<PaintedPiece> {
        h.validate()?;
        let (zoom, view, pad) = {
            let g = self.group.read();
            (g.zoom, g.view, g.pad)
        };
        let opts = DrawOptions::decode(&h.option, h, &pad);
        let layout = hist2d::layout(h);
        let (scales, owner) = self.obtain_scales(layout.range, opts.log_x, opts.log_y);

        let ndivz = self.config.contour_levels.max(16);
        let mut piece = PaintedPiece::new();
        if opts.axis == 0 && !opts.mode_3d() {
            piece.content = hist2d::draw(h, &opts, &layout, &scales, view, ndivz);
            piece.palette = hist2d::palette_axis(&layout, &opts, view);
        }
        if owner {
            piece.grids = axes::grids(&scales, view, &pad, &h.x_axis, &h.y_axis);
            piece.frame_axes = Some((h.x_axis.clone(), h.y_axis.clone(), opts.axis_pos));
            piece.title = Some(h.title.clone());
        }
        let st = stats::compute_stats_2d(h, VisibleRange::of(h, &zoom), &zoom);
        piece.stat_lines = stats::stat_lines(h, &st, self.config.opt_stat);
        Ok(piece)
    }

    fn paint_graph(&self, g: &crate::core::GraphDescriptor) -> Result<PaintedPiece> {
        g.validate()?;
        let (view, pad) = {
            let ctx = self.group.read();
            (ctx.view, ctx.pad)
        };
        let layout = graph::layout(g);
        let range = graph_range(&layout);
        let (scales, owner) = self.obtain_scales(range, pad.log_x, pad.log_y);

        let mut piece = PaintedPiece::new();
        piece.content = graph::draw(g, &layout, &scales, view, &pad);
        if owner {
            let x_axis = AxisSpec {
                min: range.xmin,
                max: range.xmax,
                ..AxisSpec::default()
            };
            let y_axis = AxisSpec {
                min: range.ymin,
                max: range.ymax,
                ..AxisSpec::default()
            };
            piece.grids = axes::grids(&scales, view, &pad, &x_axis, &y_axis);
            piece.frame_axes = Some((x_axis, y_axis, 0));
            piece.title = Some(g.title.clone());
        }
        Ok(piece)
    }

    fn paint_func(&self, f: &crate::core::FunctionDescriptor) -> Result<PaintedPiece> {
        f.validate()?;
        let (view, pad) = {
            let ctx = self.group.read();
            (ctx.view, ctx.pad)
        };
        let layout = func::layout(f);
        let (scales, owner) = self.obtain_scales(layout.range, pad.log_x, pad.log_y);

        let mut piece = PaintedPiece::new();
        piece.content = func::draw(f, &layout, &scales);
        if owner {
            let x_axis = AxisSpec {
                min: layout.range.xmin,
                max: layout.range.xmax,
                ..AxisSpec::default()
            };
            let y_axis = AxisSpec {
                min: layout.range.ymin,
                max: layout.range.ymax,
                ..AxisSpec::default()
            };
            piece.grids = axes::grids(&scales, view, &pad, &x_axis, &y_axis);
            piece.frame_axes = Some((x_axis, y_axis, 0));
            piece.title = Some(f.title.clone());
        }
        Ok(piece)
    }

    /// Write a new zoom window through the group and invalidate the scales.
    pub fn zoom(&self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) {
        let mut g = self.group.write();
        g.zoom = ZoomWindow {
            xmin,
            xmax,
            ymin,
            ymax,
        };
        g.scales = None;
        debug!(xmin, xmax, ymin, ymax, "zoom window set");
    }

    pub fn unzoom(&self, dox: bool, doy: bool) {
        let mut g = self.group.write();
        if dox {
            g.zoom.clear_x();
        }
        if doy {
            g.zoom.clear_y();
        }
        g.scales = None;
        debug!(dox, doy, "zoom window cleared");
    }

    /// Route an interaction effect back into the group and return the
    /// resulting render commands (a full redraw for zoom changes, the
    /// tooltip overlay for a show request).
    pub fn apply(&self, effect: Effect) -> Vec<RenderCmd> {
        match effect {
            Effect::ZoomTo { pmin, pmax } => {
                let scales = self.group.read().scales.clone();
                if let Some(scales) = scales {
                    let a = scales.invert(pmin);
                    let b = scales.invert(pmax);
                    self.zoom(a.x.min(b.x), a.x.max(b.x), a.y.min(b.y), a.y.max(b.y));
                }
                self.redraw()
            }
            Effect::Unzoom { x, y } => {
                self.unzoom(x, y);
                self.redraw()
            }
            Effect::ShowTooltip { at } => self.tooltip_overlay(at),
            Effect::HideTooltip => Vec::new(),
        }
    }

    /// Fan a tooltip probe out to every painter and keep the closest answer.
    pub fn collect_tooltips(&self, at: DVec2) -> Option<TipHit> {
        let (scales, pad) = {
            let g = self.group.read();
            (g.scales.clone()?, g.pad)
        };
        let p = scales.invert(at);
        let tip = TipQuery { x: p.x, y: p.y };
        let mut best: Option<TipHit> = None;
        for object in &self.objects {
            let hit = match object {
                PlotObject::Hist1D(h) => {
                    let opts = DrawOptions::decode(&h.option, h, &pad);
                    hist1d::tooltip(h, &hist1d::layout(h, &opts), &tip)
                }
                PlotObject::Hist2D(h) => hist2d::tooltip(h, &hist2d::layout(h), &tip),
                PlotObject::Graph(g) => graph::tooltip(g, &graph::layout(g), &tip),
                PlotObject::Function(f) => func::tooltip(f, &func::layout(f), &tip),
            };
            let Some(hit) = hit else { continue };
            if best.as_ref().is_none_or(|b| hit.dist < b.dist) {
                best = Some(hit);
            }
        }
        best
    }

    /// Tooltip overlay at a pixel position: a highlight rectangle over the
    /// reported region plus the pointer coordinates and collected lines.
    pub fn tooltip_overlay(&self, at: DVec2) -> Vec<RenderCmd> {
        let Some(hit) = self.collect_tooltips(at) else {
            return Vec::new();
        };
        let (scales, view) = {
            let g = self.group.read();
            let Some(scales) = g.scales.clone() else {
                return Vec::new();
            };
            (scales, g.view)
        };
        let p = scales.invert(at);
        let a = scales.map(DVec2::new(hit.x1, hit.y1));
        let b = scales.map(DVec2::new(hit.x2, hit.y2));
        let x1 = a.x.min(b.x);
        let width = (a.x - b.x).abs().max(2.0);
        let top = a.y.min(b.y);
        let bottom = a.y.max(b.y).min(view.height);
        let mut cmds = vec![RenderCmd::Rect {
            origin: DVec2::new(x1, top),
            size: DVec2::new(width, (bottom - top).max(0.0)),
            stroke: Some(render::Stroke::solid(crate::core::Color::BLACK, 1.0)),
            fill: Some(crate::core::Color::BLACK.with_a(0.15)),
        }];
        let mut lines = vec![
            format!("x = {}", render::precision(p.x, 3)),
            format!("y = {}", render::precision(p.y, 3)),
        ];
        lines.extend(hit.lines);
        for (i, line) in lines.iter().enumerate() {
            cmds.push(RenderCmd::text(
                at + DVec2::new(8.0, 14.0 * (i as f64 + 1.0)),
                line.clone(),
                12.0,
            ));
        }
        cmds
    }

    /// Context menu for the group, driven by the first painter's kind.
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let pad = self.group.read().pad;
        let (draw_content, hist2d, in_3d) = match self.objects.first() {
            Some(PlotObject::Hist1D(h)) => {
                let opts = DrawOptions::decode(&h.option, h, &pad);
                (hist1d::layout(h, &opts).draw_content, false, false)
            }
            Some(PlotObject::Hist2D(h)) => {
                let opts = DrawOptions::decode(&h.option, h, &pad);
                (true, true, opts.mode_3d())
            }
            _ => (false, false, false),
        };
        interact::context_menu(draw_content, hist2d, in_3d)
    }

    /// Execute a context menu command and return the redraw output.
    pub fn exe_menu_cmd(&mut self, cmd: &str) -> Vec<RenderCmd> {
        match cmd {
            "unx" => self.unzoom(true, false),
            "uny" => self.unzoom(false, true),
            "unxy" => self.unzoom(true, true),
            "togstat" => {
                let mut g = self.group.write();
                g.show_stats = !g.show_stats;
            }
            "col" => self.toggle_first_2d_keyword("COL"),
            "draw3d" => self.toggle_first_2d_keyword("LEGO"),
            "draw2d" => self.toggle_first_2d_keyword("LEGO"),
            other => {
                debug!(cmd = other, "unknown menu command ignored");
            }
        }
        self.redraw()
    }

    fn toggle_first_2d_keyword(&mut self, keyword: &str) {
        for object in &mut self.objects {
            if let PlotObject::Hist2D(h) = object {
                let upper = h.option.to_uppercase();
                if let Some(pos) = upper.find(keyword) {
                    // Take the sub-mode suffix with the keyword, so "COLZ"
                    // does not leave a stray "Z" behind.
                    let mut end = pos + keyword.len();
                    if let Some(&b) = upper.as_bytes().get(end) {
                        if b == b'Z' || b.is_ascii_digit() {
                            end += 1;
                        }
                    }
                    h.option.replace_range(pos..end, "");
                } else {
                    h.option.push_str(keyword);
                }
                return;
            }
        }
    }
}

fn validate(object: &PlotObject) -> Result<()> {
    match object {
        PlotObject::Hist1D(h) | PlotObject::Hist2D(h) => h.validate(),
        PlotObject::Graph(g) => g.validate(),
        PlotObject::Function(f) => f.validate(),
    }
}

/// Data extent of a graph including its error bars, padded by 10% on every
/// side so end markers stay inside the frame.
fn graph_range(layout: &graph::GraphLayout) -> FrameRange {
    let mut xmin = f64::INFINITY;
    let mut xmax = f64::NEG_INFINITY;
    let mut ymin = f64::INFINITY;
    let mut ymax = f64::NEG_INFINITY;
    for p in &layout.points {
        xmin = xmin.min(p.x - p.exlow);
        xmax = xmax.max(p.x + p.exhigh);
        ymin = ymin.min(p.y - p.eylow);
        ymax = ymax.max(p.y + p.eyhigh);
    }
    if layout.opts.bar == 1 {
        xmax = xmax.max(xmin + layout.bar_width * layout.points.len() as f64);
        ymin = ymin.min(0.0);
    }
    if !xmin.is_finite() || !ymin.is_finite() {
        return FrameRange::new(0.0, 1.0, 0.0, 1.0);
    }
    let dx = 0.1 * (xmax - xmin);
    let dy = 0.1 * (ymax - ymin);
    FrameRange::new(xmin - dx, xmax + dx, ymin - dy, ymax + dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphDescriptor;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            Viewport::new(300.0, 300.0),
            PadConfig::default(),
            PaintConfig::default(),
        )
    }

    fn ramp_hist() -> HistogramDescriptor {
        HistogramDescriptor::new_1d("h", 10, 0.0, 10.0)
            .with_content(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0, 2.0, 1.0])
    }

    #[test]
    fn first_painter_builds_the_scales_once() {
        let mut orch = orchestrator();
        orch.add_object(PlotObject::Hist1D(ramp_hist())).unwrap();
        orch.add_object(PlotObject::Hist1D(
            ramp_hist().with_option("SAME"),
        ))
        .unwrap();
        orch.redraw();
        let g = orch.group();
        let scales = g.read().scales.clone().unwrap();
        // Two painters, one shared pair (plus our local handle).
        assert!(Arc::strong_count(&scales) >= 2);
    }

    #[test]
    fn failed_painter_does_not_take_down_siblings() {
        let mut orch = orchestrator();
        orch.add_object(PlotObject::Hist1D(ramp_hist())).unwrap();
        // Corrupt the second object after registration.
        let mut broken = ramp_hist();
        broken.content.truncate(3);
        orch.objects.push(PlotObject::Hist1D(broken));
        let cmds = orch.redraw();
        assert!(cmds.iter().any(|c| matches!(c, RenderCmd::Path { .. })));
    }

    #[test]
    fn invalid_object_is_rejected_at_registration() {
        let mut orch = orchestrator();
        let mut broken = ramp_hist();
        broken.content.clear();
        assert!(orch.add_object(PlotObject::Hist1D(broken)).is_err());
    }

    #[test]
    fn zoom_unzoom_restores_tick_positions() {
        let mut orch = orchestrator();
        orch.add_object(PlotObject::Hist1D(ramp_hist())).unwrap();
        orch.redraw();
        let before = orch.group().read().scales.clone().unwrap().x.ticks(10);
        orch.zoom(2.0, 6.0, 0.0, 4.0);
        orch.redraw();
        let zoomed = orch.group().read().scales.clone().unwrap().x.ticks(10);
        assert_ne!(before, zoomed);
        orch.unzoom(true, true);
        orch.redraw();
        let after = orch.group().read().scales.clone().unwrap().x.ticks(10);
        assert_eq!(before, after);
    }

    #[test]
    fn zoom_effect_maps_pixels_to_data() {
        let mut orch = orchestrator();
        let mut h = HistogramDescriptor::new_1d("h", 10, 0.0, 10.0);
        h.maximum = Some(5.0);
        h.content[1] = 1.0;
        orch.add_object(PlotObject::Hist1D(h)).unwrap();
        orch.redraw();
        orch.apply(Effect::ZoomTo {
            pmin: DVec2::new(50.0, 50.0),
            pmax: DVec2::new(200.0, 150.0),
        });
        let zoom = orch.group().read().zoom;
        assert!((zoom.xmin - 50.0 / 300.0 * 10.0).abs() < 1e-9);
        assert!((zoom.xmax - 200.0 / 300.0 * 10.0).abs() < 1e-9);
        // y is inverted: pixel 150 is halfway up.
        assert!(zoom.ymin < zoom.ymax);
    }

    #[test]
    fn stat_box_toggles_through_the_menu() {
        let mut orch = orchestrator();
        orch.add_object(PlotObject::Hist1D(ramp_hist())).unwrap();
        let with_stats = orch.redraw();
        let has_entries = |cmds: &[RenderCmd]| {
            cmds.iter().any(|c| {
                matches!(c, RenderCmd::Text { text, .. } if text.starts_with("Entries"))
            })
        };
        assert!(has_entries(&with_stats));
        let without = orch.exe_menu_cmd("togstat");
        assert!(!has_entries(&without));
    }

    #[test]
    fn menu_lists_2d_entries_for_a_2d_histogram() {
        let mut orch = orchestrator();
        let mut h = HistogramDescriptor::new_2d("h2", 4, 0.0, 4.0, 4, 0.0, 4.0);
        h.content[7] = 3.0;
        h.option = "COL".into();
        orch.add_object(PlotObject::Hist2D(h)).unwrap();
        let items = orch.menu_items();
        assert!(items.iter().any(|m| m.cmd == "draw3d"));
        assert!(items.iter().any(|m| m.cmd == "col"));
        orch.exe_menu_cmd("col");
        if let Some(PlotObject::Hist2D(h)) = orch.objects.first() {
            assert!(!h.option.to_uppercase().contains("COL"));
        } else {
            panic!("first object vanished");
        }
    }

    #[test]
    fn toggling_col_off_takes_the_palette_suffix_along() {
        let mut orch = orchestrator();
        let mut h = HistogramDescriptor::new_2d("h2", 4, 0.0, 4.0, 4, 0.0, 4.0);
        h.content[7] = 3.0;
        h.option = "COLZ".into();
        orch.add_object(PlotObject::Hist2D(h)).unwrap();
        orch.exe_menu_cmd("col");
        if let Some(PlotObject::Hist2D(h)) = orch.objects.first() {
            assert!(h.option.is_empty());
        } else {
            panic!("first object vanished");
        }
    }

    #[test]
    fn update_object_keeps_the_zoom() {
        let mut orch = orchestrator();
        let idx = orch.add_object(PlotObject::Hist1D(ramp_hist())).unwrap();
        orch.redraw();
        orch.zoom(2.0, 6.0, 0.0, 4.0);
        let refreshed = ramp_hist().with_content(&[1.0; 10]);
        orch.update_object(idx, &PlotObject::Hist1D(refreshed))
            .unwrap();
        assert!(orch.group().read().zoom.x_active());
        let err = orch.update_object(idx, &PlotObject::Graph(GraphDescriptor::default()));
        assert!(err.is_err());
    }

    #[test]
    fn graph_range_covers_error_bars() {
        let mut g = GraphDescriptor::new("g", vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 15.0]);
        g.ey_low = Some(vec![2.0, 2.0, 2.0]);
        g.ey_high = Some(vec![2.0, 2.0, 2.0]);
        let layout = graph::layout(&g);
        let range = graph_range(&layout);
        assert!(range.ymin < 8.0);
        assert!(range.ymax > 22.0);
    }

    #[test]
    fn tooltip_overlay_reports_coordinates() {
        let mut orch = orchestrator();
        orch.add_object(PlotObject::Hist1D(ramp_hist())).unwrap();
        orch.redraw();
        // Probe below the peak bin (content 5 at x ~ 5.5).
        let scales = orch.group().read().scales.clone().unwrap();
        let at = scales.map(DVec2::new(5.5, 2.0));
        let cmds = orch.tooltip_overlay(at);
        assert!(cmds.iter().any(|c| matches!(c, RenderCmd::Rect { .. })));
        assert!(cmds.iter().any(|c| {
            matches!(c, RenderCmd::Text { text, .. } if text.starts_with("x = "))
        }));
    }
}
