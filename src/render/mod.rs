//! Backend-agnostic render output. A paint pass produces an ordered
//! [`RenderCmd`] list in frame pixel coordinates (y grows downwards); any
//! 2-D surface that can stroke lines, fill shapes and place text can replay
//! it. Emission order is back-to-front.

pub mod axes;
pub mod func;
pub mod graph;
pub mod hist1d;
pub mod hist2d;

use crate::core::{Color, StyleAttr};
use crate::style::{self, MarkerGlyph};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Resolved stroke attributes: indices already looked up in the style
/// tables, dash pattern spelled out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dash: String,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: String::new(),
        }
    }

    /// Stroke from numeric style attributes, with the steel-blue series
    /// default for an unset line color.
    pub fn from_attr(attr: &StyleAttr) -> Self {
        Self {
            color: style::series_color(attr.line_color),
            width: f64::from(attr.line_width.max(1)),
            dash: style::line_dash(attr.line_style).to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One drawing primitive. Coordinates are frame pixels; text outside the
/// frame (axis labels, titles) simply uses coordinates beyond the frame
/// bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RenderCmd {
    Line {
        from: DVec2,
        to: DVec2,
        stroke: Stroke,
    },
    Rect {
        origin: DVec2,
        size: DVec2,
        stroke: Option<Stroke>,
        fill: Option<Color>,
    },
    Path {
        points: Vec<DVec2>,
        closed: bool,
        stroke: Option<Stroke>,
        fill: Option<Color>,
    },
    Marker {
        at: DVec2,
        glyph: MarkerGlyph,
        size: f64,
        color: Color,
    },
    Text {
        at: DVec2,
        text: String,
        size: f64,
        color: Color,
        align: TextAlign,
        /// Rotation in degrees, counter-clockwise around `at`.
        rotation: f64,
    },
}

impl RenderCmd {
    pub fn line(from: DVec2, to: DVec2, stroke: Stroke) -> Self {
        RenderCmd::Line { from, to, stroke }
    }

    pub fn text(at: DVec2, text: impl Into<String>, size: f64) -> Self {
        RenderCmd::Text {
            at,
            text: text.into(),
            size,
            color: Color::BLACK,
            align: TextAlign::Left,
            rotation: 0.0,
        }
    }
}

/// Tooltip probe in data-space coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipQuery {
    pub x: f64,
    pub y: f64,
}

/// One object's answer to a tooltip probe. `dist` ranks competing answers
/// (smaller wins); the rectangle marks the region the tip describes.
#[derive(Clone, Debug, PartialEq)]
pub struct TipHit {
    pub dist: f64,
    pub lines: Vec<String>,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Decimal rendering with a fixed number of significant digits.
pub fn precision(v: f64, digits: usize) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v:.0$}", digits.saturating_sub(1));
    }
    let magnitude = v.abs().log10().floor() as i64;
    let decimals = (digits as i64 - 1 - magnitude).clamp(0, 17) as usize;
    format!("{v:.decimals$}")
}

/// Fill color for numeric fill attributes; hollow fill styles (the
/// 4000..4100 band) and an unset color produce no fill at all.
pub fn fill_color(attr: &StyleAttr) -> Option<Color> {
    if (4000..4100).contains(&attr.fill_style) || attr.fill_color == 0 {
        None
    } else {
        Some(style::root_color(attr.fill_color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_resolves_unset_color_to_series_default() {
        let attr = StyleAttr {
            line_color: 0,
            ..StyleAttr::default()
        };
        assert_eq!(Stroke::from_attr(&attr).color, Color::DEFAULT_SERIES);
    }

    #[test]
    fn hollow_fill_styles_produce_no_fill() {
        let mut attr = StyleAttr {
            fill_color: 2,
            fill_style: 1001,
            ..StyleAttr::default()
        };
        assert!(fill_color(&attr).is_some());
        attr.fill_style = 4050;
        assert!(fill_color(&attr).is_none());
        attr.fill_style = 1001;
        attr.fill_color = 0;
        assert!(fill_color(&attr).is_none());
    }

    #[test]
    fn precision_keeps_significant_digits() {
        assert_eq!(precision(4.9193, 4), "4.919");
        assert_eq!(precision(0.0123456, 4), "0.01235");
        assert_eq!(precision(123.0, 4), "123.0");
        assert_eq!(precision(0.0, 4), "0.000");
    }

    #[test]
    fn commands_serialize() {
        let cmd = RenderCmd::line(
            DVec2::ZERO,
            DVec2::new(10.0, 0.0),
            Stroke::solid(Color::BLACK, 1.0),
        );
        let json = serde_json::to_string(&cmd).unwrap();
        let back: RenderCmd = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }
}
