//! Frame decoration: border, tick marks with labels, grid lines, the pad
//! title and the statistics box.

use crate::core::{AxisSpec, Color, PadConfig, PaintConfig, Viewport};
use crate::render::{RenderCmd, Stroke, TextAlign};
use crate::scale::{AxisScale, ScaleKind, ScalePair};
use crate::style;
use glam::DVec2;

const TICK_LEN: f64 = 5.0;
const MINOR_TICK_LEN: f64 = 3.0;
const LABEL_SIZE: f64 = 12.0;
const TITLE_SIZE: f64 = 16.0;

/// Frame border rectangle.
pub fn frame(view: Viewport) -> RenderCmd {
    RenderCmd::Rect {
        origin: DVec2::ZERO,
        size: DVec2::new(view.width, view.height),
        stroke: Some(Stroke::solid(Color::BLACK, 1.0)),
        fill: None,
    }
}

/// Shortest decimal label for a tick value.
fn tick_label(v: f64) -> String {
    if v == 0.0 {
        "0".to_owned()
    } else {
        format!("{v}")
    }
}

/// Tick marks and labels for both axes. `axis_pos` moves the x labels to the
/// top edge (`X+`, tens digit) and the y labels to the right edge (`Y+`,
/// units digit).
pub fn axes(
    scales: &ScalePair,
    view: Viewport,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    axis_pos: i32,
) -> Vec<RenderCmd> {
    let mut cmds = Vec::new();
    let x_on_top = axis_pos >= 10;
    let y_on_right = axis_pos % 10 == 1;

    let (xn1, xn2, _) = x_axis.divisions();
    let x_base = if x_on_top { 0.0 } else { view.height };
    let x_dir = if x_on_top { 1.0 } else { -1.0 };
    let x_label_y = if x_on_top {
        -LABEL_SIZE * 0.5
    } else {
        view.height + LABEL_SIZE + 3.0
    };
    let ticks = scales.x.ticks(xn1);
    emit_minor_ticks(&mut cmds, &scales.x, &ticks, xn2, |px, len| {
        RenderCmd::line(
            DVec2::new(px, x_base),
            DVec2::new(px, x_base + x_dir * len),
            Stroke::solid(Color::BLACK, 1.0),
        )
    });
    for t in &ticks {
        let px = scales.x.map(*t);
        cmds.push(RenderCmd::line(
            DVec2::new(px, x_base),
            DVec2::new(px, x_base + x_dir * TICK_LEN),
            Stroke::solid(Color::BLACK, 1.0),
        ));
        cmds.push(RenderCmd::Text {
            at: DVec2::new(px, x_label_y),
            text: tick_label(*t),
            size: LABEL_SIZE,
            color: Color::BLACK,
            align: TextAlign::Center,
            rotation: 0.0,
        });
    }

    let (yn1, yn2, _) = y_axis.divisions();
    let y_base = if y_on_right { view.width } else { 0.0 };
    let y_dir = if y_on_right { -1.0 } else { 1.0 };
    let ticks = scales.y.ticks(yn1);
    emit_minor_ticks(&mut cmds, &scales.y, &ticks, yn2, |px, len| {
        RenderCmd::line(
            DVec2::new(y_base, px),
            DVec2::new(y_base + y_dir * len, px),
            Stroke::solid(Color::BLACK, 1.0),
        )
    });
    for t in &ticks {
        let px = scales.y.map(*t);
        cmds.push(RenderCmd::line(
            DVec2::new(y_base, px),
            DVec2::new(y_base + y_dir * TICK_LEN, px),
            Stroke::solid(Color::BLACK, 1.0),
        ));
        let (label_x, align) = if y_on_right {
            (view.width + 6.0, TextAlign::Left)
        } else {
            (-6.0, TextAlign::Right)
        };
        cmds.push(RenderCmd::Text {
            at: DVec2::new(label_x, px + LABEL_SIZE * 0.35),
            text: tick_label(*t),
            size: LABEL_SIZE,
            color: Color::BLACK,
            align,
            rotation: 0.0,
        });
    }

    if let Some(title) = &x_axis.title {
        cmds.push(RenderCmd::Text {
            at: DVec2::new(view.width, view.height + 2.5 * LABEL_SIZE),
            text: title.clone(),
            size: LABEL_SIZE,
            color: Color::BLACK,
            align: TextAlign::Right,
            rotation: 0.0,
        });
    }
    if let Some(title) = &y_axis.title {
        cmds.push(RenderCmd::Text {
            at: DVec2::new(-2.5 * LABEL_SIZE, 0.0),
            text: title.clone(),
            size: LABEL_SIZE,
            color: Color::BLACK,
            align: TextAlign::Right,
            rotation: 90.0,
        });
    }
    cmds
}

/// Minor ticks between consecutive primary ticks; linear axes only, log
/// axes already return decade sub-ticks when the domain is short.
fn emit_minor_ticks(
    cmds: &mut Vec<RenderCmd>,
    scale: &AxisScale,
    primary: &[f64],
    n2: u32,
    make: impl Fn(f64, f64) -> RenderCmd,
) {
    if scale.kind != ScaleKind::Linear || n2 < 2 || primary.len() < 2 {
        return;
    }
    for pair in primary.windows(2) {
        let step = (pair[1] - pair[0]) / f64::from(n2);
        for k in 1..n2 {
            let v = pair[0] + f64::from(k) * step;
            cmds.push(make(scale.map(v), MINOR_TICK_LEN));
        }
    }
}

/// Dashed grid lines at the primary tick positions of the enabled axes.
pub fn grids(scales: &ScalePair, view: Viewport, pad: &PadConfig, x_axis: &AxisSpec, y_axis: &AxisSpec) -> Vec<RenderCmd> {
    let dash = style::line_dash(style::GRID_LINE_STYLE).to_owned();
    let stroke = Stroke {
        color: Color::BLACK,
        width: 1.0,
        dash,
    };
    let mut cmds = Vec::new();
    if pad.grid_x {
        let (n1, _, _) = x_axis.divisions();
        for t in scales.x.ticks(n1) {
            let px = scales.x.map(t);
            cmds.push(RenderCmd::line(
                DVec2::new(px, 0.0),
                DVec2::new(px, view.height),
                stroke.clone(),
            ));
        }
    }
    if pad.grid_y {
        let (n1, _, _) = y_axis.divisions();
        for t in scales.y.ticks(n1) {
            let py = scales.y.map(t);
            cmds.push(RenderCmd::line(
                DVec2::new(0.0, py),
                DVec2::new(view.width, py),
                stroke.clone(),
            ));
        }
    }
    cmds
}

/// Pad title centered above the frame.
pub fn title(text: &str, view: Viewport) -> Option<RenderCmd> {
    if text.is_empty() {
        return None;
    }
    Some(RenderCmd::Text {
        at: DVec2::new(view.width / 2.0, -0.6 * TITLE_SIZE),
        text: text.to_owned(),
        size: TITLE_SIZE,
        color: Color::BLACK,
        align: TextAlign::Center,
        rotation: 0.0,
    })
}

/// Statistics box: white backing rectangle plus one text line per entry,
/// positioned by the fractional geometry in [`PaintConfig`].
pub fn stat_box(lines: &[String], view: Viewport, cfg: &PaintConfig) -> Vec<RenderCmd> {
    if lines.is_empty() {
        return Vec::new();
    }
    let origin = DVec2::new(cfg.stat_x * view.width, cfg.stat_y * view.height);
    let size = DVec2::new(cfg.stat_w * view.width, cfg.stat_h * view.height);
    let mut cmds = vec![RenderCmd::Rect {
        origin,
        size,
        stroke: Some(Stroke::solid(Color::BLACK, 1.0)),
        fill: Some(Color::WHITE),
    }];
    let step = size.y / lines.len() as f64;
    for (i, line) in lines.iter().enumerate() {
        cmds.push(RenderCmd::Text {
            at: DVec2::new(origin.x + 4.0, origin.y + (i as f64 + 0.75) * step),
            text: line.clone(),
            size: LABEL_SIZE,
            color: Color::BLACK,
            align: TextAlign::Left,
            rotation: 0.0,
        });
    }
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ZoomWindow;
    use crate::scale::FrameRange;

    fn scales(view: Viewport) -> ScalePair {
        ScalePair::build(
            FrameRange::new(0.0, 10.0, 0.0, 100.0),
            &ZoomWindow::UNSET,
            view,
            false,
            false,
        )
    }

    #[test]
    fn axes_emit_ticks_and_labels() {
        let view = Viewport::new(400.0, 300.0);
        let cmds = axes(
            &scales(view),
            view,
            &AxisSpec::new(10, 0.0, 10.0),
            &AxisSpec::default(),
            0,
        );
        let labels: Vec<&String> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCmd::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert!(labels.iter().any(|t| t.as_str() == "0"));
        assert!(labels.iter().any(|t| t.as_str() == "10"));
        assert!(cmds.iter().any(|c| matches!(c, RenderCmd::Line { .. })));
    }

    #[test]
    fn y_plus_moves_labels_to_the_right() {
        let view = Viewport::new(400.0, 300.0);
        let cmds = axes(
            &scales(view),
            view,
            &AxisSpec::new(10, 0.0, 10.0),
            &AxisSpec::default(),
            1,
        );
        let right_labels = cmds.iter().any(|c| {
            matches!(c, RenderCmd::Text { at, align, .. }
                if at.x > view.width && *align == TextAlign::Left)
        });
        assert!(right_labels);
    }

    #[test]
    fn grid_lines_follow_pad_flags() {
        let view = Viewport::new(400.0, 300.0);
        let pad = PadConfig {
            grid_y: true,
            ..PadConfig::default()
        };
        let x = AxisSpec::new(10, 0.0, 10.0);
        let y = AxisSpec::default();
        let cmds = grids(&scales(view), view, &pad, &x, &y);
        assert!(!cmds.is_empty());
        // All grid lines are horizontal and dashed.
        for c in &cmds {
            let RenderCmd::Line { from, to, stroke } = c else {
                panic!("grid emitted a non-line command");
            };
            assert_eq!(from.y, to.y);
            assert_eq!(stroke.dash, "1, 2");
        }
        let none = grids(&scales(view), view, &PadConfig::default(), &x, &y);
        assert!(none.is_empty());
    }

    #[test]
    fn stat_box_backing_comes_first() {
        let view = Viewport::new(400.0, 300.0);
        let cfg = PaintConfig::default();
        let cmds = stat_box(&["h".into(), "Entries = 5".into()], view, &cfg);
        assert!(matches!(cmds[0], RenderCmd::Rect { .. }));
        assert_eq!(cmds.len(), 3);
        assert!(stat_box(&[], view, &cfg).is_empty());
    }
}
