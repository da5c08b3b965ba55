//! Graph painting: line/curve/bar/marker modes, asymmetric error bars and
//! the exclusion band encoded in oversized line widths.

use crate::core::{Color, GraphDescriptor, PadConfig, Viewport};
use crate::options::GraphOptions;
use crate::render::{self, RenderCmd, Stroke, TipHit, TipQuery};
use crate::scale::ScalePair;
use crate::style;
use glam::DVec2;
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
    pub exlow: f64,
    pub exhigh: f64,
    pub eylow: f64,
    pub eyhigh: f64,
}

#[derive(Clone, Debug)]
pub struct GraphLayout {
    pub opts: GraphOptions,
    pub points: Vec<GraphPoint>,
    pub draw_errors: bool,
    /// Bar width in data units (bar mode only).
    pub bar_width: f64,
}

fn err_at(v: &Option<Vec<f64>>, i: usize) -> f64 {
    v.as_ref().and_then(|e| e.get(i)).copied().unwrap_or(0.0)
}

/// Decode the graph option and build the point list. Symmetric errors whose
/// maximum is numerically zero disable error drawing entirely.
pub fn layout(graph: &GraphDescriptor) -> GraphLayout {
    let opts = GraphOptions::decode(&graph.option);
    let n = graph.npoints();

    let mut draw_errors = graph.has_errors();
    if draw_errors {
        let max_err = |v: &Option<Vec<f64>>| {
            v.as_ref()
                .map(|e| e.iter().copied().fold(0.0f64, f64::max))
                .unwrap_or(0.0)
        };
        let mex = max_err(&graph.ex_low).max(max_err(&graph.ex_high));
        let mey = max_err(&graph.ey_low).max(max_err(&graph.ey_high));
        if mex < 1.0e-300 && mey < 1.0e-300 {
            draw_errors = false;
        }
    }

    let bar_width = if opts.bar == 1 && n > 0 {
        let xmin = graph.x.iter().copied().fold(f64::INFINITY, f64::min);
        let xmax = graph.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (xmax - xmin) / n as f64
    } else {
        0.0
    };

    let points = (0..n)
        .map(|p| {
            if opts.bar == 1 {
                GraphPoint {
                    x: graph.x[p] - bar_width / 2.0,
                    y: graph.y[p],
                    ..GraphPoint::default()
                }
            } else {
                GraphPoint {
                    x: graph.x[p],
                    y: graph.y[p],
                    exlow: err_at(&graph.ex_low, p),
                    exhigh: err_at(&graph.ex_high, p),
                    eylow: err_at(&graph.ey_low, p),
                    eyhigh: err_at(&graph.ey_high, p),
                }
            }
        })
        .collect();

    GraphLayout {
        opts,
        points,
        draw_errors,
        bar_width,
    }
}

/// The marker style the graph actually paints with; the `*` option forces
/// style 3.
pub fn effective_marker_style(graph: &GraphDescriptor, opts: &GraphOptions) -> u16 {
    if opts.star == 1 { 3 } else { graph.style.marker_style }
}

/// Exclusion band polygon in data space, plus the residual line width. The
/// band exists when the encoded line width exceeds 99: hundreds carry the
/// band width in per-mille of the frame diagonal, values above 32767 flip
/// the band to the other side of the line.
#[derive(Clone, Debug)]
pub struct ExclusionBand {
    pub points: Vec<DVec2>,
    pub line_width: f64,
    pub fill: Color,
}

pub fn exclusion_band(
    graph: &GraphDescriptor,
    scales: &ScalePair,
    view: Viewport,
    pad: &PadConfig,
) -> Option<ExclusionBand> {
    let encoded = i64::from(graph.style.line_width);
    if encoded <= 99 {
        return None;
    }
    let n = graph.npoints();
    if n < 2 {
        return None;
    }
    let mut glw = encoded;
    if glw > 32767 {
        glw = 65536 - glw;
    }
    let line_width = (glw % 100) as f64;
    let mut wk = (glw as f64 / 100.0) * 0.005;
    if encoded > 32767 {
        wk = -wk;
    }

    let (w, h) = (view.width, view.height);
    let ratio = w / h;
    let full = scales.full;
    let (xmin, xmax) = (full.xmin, full.xmax);
    let (ymin, ymax) = (full.ymin, full.ymax);

    // Normalize to the unit square, corrected for the frame aspect ratio so
    // the band width is isotropic in pixels.
    let mut xo = vec![0.0; n];
    let mut yo = vec![0.0; n];
    for i in 0..n {
        xo[i] = (graph.x[i] - xmin) / (xmax - xmin);
        yo[i] = (graph.y[i] - ymin) / (ymax - ymin);
        if w > h {
            yo[i] /= ratio;
        } else if h > w {
            xo[i] /= ratio;
        }
    }

    // Leading part of the polygon: the graph itself, identical neighbours
    // collapsed.
    let mut xf = Vec::with_capacity(2 * n + 2);
    let mut yf = Vec::with_capacity(2 * n + 2);
    xf.push(xo[0]);
    yf.push(yo[0]);
    for i in 1..n {
        if xo[i] == xo[i - 1] && yo[i] == yo[i - 1] {
            continue;
        }
        xf.push(xo[i]);
        yf.push(yo[i]);
        let k = xf.len() - 1;
        if xf[k] == xf[k - 1] {
            xf[k] += 0.000001; // avoid exact vertical segments
        }
    }
    let nf = xf.len() - 1;
    if nf < 1 {
        return None;
    }

    // Offset twin of every point; endpoints get the one-sided normal.
    let mut xt = vec![0.0; nf + 1];
    let mut yt = vec![0.0; nf + 1];
    let a = if xf[1] == xf[0] {
        PI / 2.0
    } else {
        ((yf[1] - yf[0]) / (xf[1] - xf[0])).atan()
    };
    if xf[0] <= xf[1] {
        xt[0] = xf[0] - wk * a.sin();
        yt[0] = yf[0] + wk * a.cos();
    } else {
        xt[0] = xf[0] + wk * a.sin();
        yt[0] = yf[0] - wk * a.cos();
    }
    let a = if xf[nf] == xf[nf - 1] {
        PI / 2.0
    } else {
        ((yf[nf] - yf[nf - 1]) / (xf[nf] - xf[nf - 1])).atan()
    };
    if xf[nf] >= xf[nf - 1] {
        xt[nf] = xf[nf] - wk * a.sin();
        yt[nf] = yf[nf] + wk * a.cos();
    } else {
        xt[nf] = xf[nf] + wk * a.sin();
        yt[nf] = yf[nf] - wk * a.cos();
    }

    for i in 1..nf {
        let (xi0, yi0) = (xf[i], yf[i]);
        let (xi1, yi1) = (xf[i + 1], yf[i + 1]);
        let (xi2, yi2) = (xf[i - 1], yf[i - 1]);
        let mut a1 = if xi1 == xi0 {
            PI / 2.0
        } else {
            ((yi1 - yi0) / (xi1 - xi0)).atan()
        };
        if xi1 < xi0 {
            a1 += PI;
        }
        let mut a2 = if xi2 == xi0 {
            PI / 2.0
        } else {
            ((yi0 - yi2) / (xi0 - xi2)).atan()
        };
        if xi0 < xi2 {
            a2 += PI;
        }
        let x1 = xi0 - wk * a1.sin();
        let y1 = yi0 + wk * a1.cos();
        let x2 = xi0 - wk * a2.sin();
        let y2 = yi0 + wk * a2.cos();
        let xm = (x1 + x2) * 0.5;
        let ym = (y1 + y2) * 0.5;
        let a3 = if xm == xi0 {
            PI / 2.0
        } else {
            ((ym - yi0) / (xm - xi0)).atan()
        };
        let mut x3 = xi0 - wk * (a3 + PI / 2.0).sin();
        let mut y3 = yi0 + wk * (a3 + PI / 2.0).cos();
        // Flip to the midpoint side when the normal landed on the wrong one.
        if (xm - xi0) * (x3 - xi0) < 0.0 && (ym - yi0) * (y3 - yi0) < 0.0 {
            x3 = 2.0 * xi0 - x3;
            y3 = 2.0 * yi0 - y3;
        }
        if xm == x1 && ym == y1 {
            x3 = xm;
            y3 = ym;
        }
        xt[i] = x3;
        yt[i] = y3;
    }

    // Closed input polygon: average the two end offsets.
    if xf[nf] == xf[0] && yf[nf] == yf[0] {
        let xm = (xt[nf] + xt[0]) * 0.5;
        let ym = (yt[nf] + yt[0]) * 0.5;
        let a3 = if xm == xf[0] {
            PI / 2.0
        } else {
            ((ym - yf[0]) / (xm - xf[0])).atan()
        };
        let mut x3 = xf[0] + wk * (a3 + PI / 2.0).sin();
        let mut y3 = yf[0] - wk * (a3 + PI / 2.0).cos();
        if (xm - xf[0]) * (x3 - xf[0]) < 0.0 && (ym - yf[0]) * (y3 - yf[0]) < 0.0 {
            x3 = 2.0 * xf[0] - x3;
            y3 = 2.0 * yf[0] - y3;
        }
        xt[nf] = x3;
        xt[0] = x3;
        yt[nf] = y3;
        yt[0] = y3;
    }

    // Walk the offset points backwards, replacing self-crossing segment
    // pairs with their intersection.
    let mut i = nf;
    while i > 0 {
        let mut cross = false;
        let mut j = i - 1;
        while j > 0 {
            if xt[i - 1] != xt[i] && xt[j - 1] != xt[j] {
                let c1 = (yt[i - 1] - yt[i]) / (xt[i - 1] - xt[i]);
                let b1 = yt[i] - c1 * xt[i];
                let c2 = (yt[j - 1] - yt[j]) / (xt[j - 1] - xt[j]);
                let b2 = yt[j] - c2 * xt[j];
                if c1 != c2 {
                    let xc = (b2 - b1) / (c1 - c2);
                    let yc = c1 * xc + b1;
                    if xc > xt[i].min(xt[i - 1])
                        && xc < xt[i].max(xt[i - 1])
                        && xc > xt[j].min(xt[j - 1])
                        && xc < xt[j].max(xt[j - 1])
                        && yc > yt[i].min(yt[i - 1])
                        && yc < yt[i].max(yt[i - 1])
                        && yc > yt[j].min(yt[j - 1])
                        && yc < yt[j].max(yt[j - 1])
                    {
                        xf.push(xt[i]);
                        yf.push(yt[i]);
                        xf.push(xc);
                        yf.push(yc);
                        i = j;
                        cross = true;
                        break;
                    }
                }
            }
            j -= 1;
        }
        if !cross {
            xf.push(xt[i]);
            yf.push(yt[i]);
        }
        i -= 1;
    }
    xf.push(xt[0]);
    yf.push(yt[0]);

    // Back to data space, clamping non-positive log coordinates.
    let points = xf
        .iter()
        .zip(&yf)
        .map(|(&x, &y)| {
            let (mut dx, mut dy) = if w > h {
                (xmin + x * (xmax - xmin), ymin + y * (ymax - ymin) * ratio)
            } else if h > w {
                (xmin + x * (xmax - xmin) * ratio, ymin + y * (ymax - ymin))
            } else {
                (xmin + x * (xmax - xmin), ymin + y * (ymax - ymin))
            };
            if pad.log_x && dx <= 0.0 {
                dx = xmin;
            }
            if pad.log_y && dy <= 0.0 {
                dy = ymin;
            }
            DVec2::new(dx, dy)
        })
        .collect();

    Some(ExclusionBand {
        points,
        line_width,
        fill: style::root_color(graph.style.fill_color).with_a(0.20),
    })
}

/// Paint the graph. Order: bars, exclusion band, line/area, error bars,
/// markers.
pub fn draw(
    graph: &GraphDescriptor,
    layout: &GraphLayout,
    scales: &ScalePair,
    view: Viewport,
    pad: &PadConfig,
) -> Vec<RenderCmd> {
    let opts = &layout.opts;
    if opts.none == 1 {
        return Vec::new();
    }
    let mut cmds = Vec::new();
    let line_color = style::root_color(graph.style.line_color);
    let mut show_marker = opts.mark == 1 || opts.star == 1;
    let mut draw_errors = layout.draw_errors;

    if opts.bar == 1 {
        draw_errors = false;
        let fill = style::root_color(graph.style.fill_color);
        let (d0, d1) = scales.x.domain();
        let bar_px = view.width / (d1 - d0) - 1.0;
        for p in &layout.points {
            let top = scales.y.map(p.y);
            let height = scales.y.map(p.y) - scales.y.map(2.0 * p.y);
            cmds.push(RenderCmd::Rect {
                origin: DVec2::new(scales.x.map(p.x), top),
                size: DVec2::new(bar_px, height),
                stroke: None,
                fill: Some(fill),
            });
        }
    }

    let band = exclusion_band(graph, scales, view, pad);
    let mut line_width = f64::from(graph.style.line_width.max(1));
    let mut line_on = opts.line == 1 || opts.curve == 1;
    if let Some(band) = &band {
        show_marker = false;
        line_width = band.line_width;
        if line_width > 0.0 {
            line_on = true;
        }
        cmds.push(RenderCmd::Path {
            points: band.points.iter().map(|p| scales.map(*p)).collect(),
            closed: true,
            stroke: None,
            fill: Some(band.fill),
        });
    }

    let series_line = opts.line == 1 || opts.curve == 1 || opts.fill == 1 || opts.curve_fill == 1;
    if series_line || band.is_some() {
        let points: Vec<DVec2> = layout
            .points
            .iter()
            .map(|p| scales.map(DVec2::new(p.x, p.y)))
            .collect();
        let fill = if opts.fill == 1 || opts.curve_fill == 1 {
            Some(style::root_color(graph.style.fill_color))
        } else {
            None
        };
        let stroke = line_on.then(|| Stroke {
            color: line_color,
            width: line_width,
            dash: style::line_dash(graph.style.line_style).to_owned(),
        });
        if stroke.is_some() || fill.is_some() {
            cmds.push(RenderCmd::Path {
                points,
                closed: false,
                stroke,
                fill,
            });
        }
    }

    if draw_errors {
        let stroke = Stroke::solid(line_color, f64::from(graph.style.line_width.min(99).max(1)));
        for p in &layout.points {
            let xc = scales.x.map(p.x);
            let yc = scales.y.map(p.y);
            if p.exlow > 0.0 || p.exhigh > 0.0 {
                let xl = scales.x.map(p.x - p.exlow);
                let xr = scales.x.map(p.x + p.exhigh);
                cmds.push(RenderCmd::line(
                    DVec2::new(xl, yc),
                    DVec2::new(xr, yc),
                    stroke.clone(),
                ));
                if p.exlow > 0.0 {
                    cmds.push(RenderCmd::line(
                        DVec2::new(xl, yc - 3.0),
                        DVec2::new(xl, yc + 3.0),
                        stroke.clone(),
                    ));
                }
                if p.exhigh > 0.0 {
                    cmds.push(RenderCmd::line(
                        DVec2::new(xr, yc - 3.0),
                        DVec2::new(xr, yc + 3.0),
                        stroke.clone(),
                    ));
                }
            }
            if p.eylow > 0.0 || p.eyhigh > 0.0 {
                let yb = scales.y.map(p.y - p.eylow);
                let yt = scales.y.map(p.y + p.eyhigh);
                cmds.push(RenderCmd::line(
                    DVec2::new(xc, yb),
                    DVec2::new(xc, yt),
                    stroke.clone(),
                ));
                if p.eylow > 0.0 {
                    cmds.push(RenderCmd::line(
                        DVec2::new(xc - 3.0, yb),
                        DVec2::new(xc + 3.0, yb),
                        stroke.clone(),
                    ));
                }
                if p.eyhigh > 0.0 {
                    cmds.push(RenderCmd::line(
                        DVec2::new(xc - 3.0, yt),
                        DVec2::new(xc + 3.0, yt),
                        stroke.clone(),
                    ));
                }
            }
        }
    }

    if show_marker {
        let marker_style = effective_marker_style(graph, opts);
        let glyph = style::marker_glyph(marker_style);
        let scale = if marker_style == 1 {
            1.0
        } else if glyph.shape == style::MarkerShape::Circle {
            32.0
        } else {
            64.0
        };
        let color = style::root_color(graph.style.marker_color);
        for p in &layout.points {
            cmds.push(RenderCmd::Marker {
                at: scales.map(DVec2::new(p.x, p.y)),
                glyph,
                size: graph.style.marker_size * scale,
                color,
            });
        }
    }
    cmds
}

/// Euclidean nearest point in data space.
pub fn tooltip(graph: &GraphDescriptor, layout: &GraphLayout, tip: &TipQuery) -> Option<TipHit> {
    if layout.opts.none == 1 {
        return None;
    }
    let (nbin, min) = layout
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let d = (p.x - tip.x).powi(2) + (p.y - tip.y).powi(2);
            (i, d)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    let p = layout.points[nbin];
    let mut lines = vec![format!("graph:{}", graph.name), format!("bin: {nbin}")];
    if layout.draw_errors {
        lines.push(format!(
            "error x = -{}/+{}",
            render::precision(p.exlow, 4),
            render::precision(p.exhigh, 4)
        ));
        lines.push(format!(
            "error y = -{}/+{}",
            render::precision(p.eylow, 4),
            render::precision(p.eyhigh, 4)
        ));
    }
    Some(TipHit {
        dist: min.sqrt(),
        lines,
        x1: p.x,
        x2: p.x,
        y1: p.y,
        y2: p.y,
    })
}
