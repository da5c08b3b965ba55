use crate::{PaintError, Result};
use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Substitute used whenever a color index resolves to 0 (unset).
    pub const DEFAULT_SERIES: Self = Self::rgb8(0x45, 0x72, 0xa7);
}

/// One histogram axis: bounds, bin count and the packed division spec
/// (`n1 + 100*n2 + 10000*n3`, primary/secondary/tertiary tick counts).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub nbins: usize,
    pub log: bool,
    pub ndivisions: u32,
    pub title: Option<String>,
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            nbins: 1,
            log: false,
            ndivisions: 510,
            title: None,
        }
    }
}

impl AxisSpec {
    pub fn new(nbins: usize, min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            nbins,
            ..Self::default()
        }
    }

    pub fn bin_width(&self) -> f64 {
        if self.nbins == 0 {
            0.0
        } else {
            (self.max - self.min) / self.nbins as f64
        }
    }

    /// Unpack the division spec into (primary, secondary, tertiary) counts.
    pub fn divisions(&self) -> (u32, u32, u32) {
        let n1 = self.ndivisions % 100;
        let n2 = (self.ndivisions % 10_000 - n1) / 100;
        let n3 = self.ndivisions / 10_000;
        (n1.max(1), n2, n3)
    }
}

/// Numeric style attributes carried by every drawable object. Indices are
/// resolved against the static style tables in [`crate::style`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StyleAttr {
    pub line_color: u16,
    pub line_width: u16,
    pub line_style: u16,
    pub fill_color: u16,
    pub fill_style: u16,
    pub marker_color: u16,
    pub marker_style: u16,
    pub marker_size: f64,
}

impl Default for StyleAttr {
    fn default() -> Self {
        Self {
            line_color: 1,
            line_width: 1,
            line_style: 1,
            fill_color: 0,
            fill_style: 0,
            marker_color: 1,
            marker_style: 1,
            marker_size: 1.0,
        }
    }
}

/// Binned distribution supplied by the caller per draw call. The content
/// array carries under/overflow in the first and last slot of each axis, so
/// a 1-D histogram with `n` bins stores `n + 2` values and a 2-D one
/// `(nx + 2) * (ny + 2)` values in row-major order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistogramDescriptor {
    pub name: String,
    pub title: String,
    pub dim: u8,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub content: Vec<f64>,
    pub errors: Option<Vec<f64>>,
    pub style: StyleAttr,
    pub option: String,
    /// Caller-forced display minimum/maximum (replaces the content scan).
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl HistogramDescriptor {
    pub fn new_1d(name: impl Into<String>, nbins: usize, xmin: f64, xmax: f64) -> Self {
        Self {
            name: name.into(),
            dim: 1,
            x_axis: AxisSpec::new(nbins, xmin, xmax),
            y_axis: AxisSpec::new(1, 0.0, 1.0),
            content: vec![0.0; nbins + 2],
            style: StyleAttr::default(),
            ..Self::default()
        }
    }

    pub fn new_2d(
        name: impl Into<String>,
        nx: usize,
        xmin: f64,
        xmax: f64,
        ny: usize,
        ymin: f64,
        ymax: f64,
    ) -> Self {
        Self {
            name: name.into(),
            dim: 2,
            x_axis: AxisSpec::new(nx, xmin, xmax),
            y_axis: AxisSpec::new(ny, ymin, ymax),
            content: vec![0.0; (nx + 2) * (ny + 2)],
            style: StyleAttr::default(),
            ..Self::default()
        }
    }

    /// Fill the in-range 1-D bins from a plain slice (no under/overflow).
    pub fn with_content(mut self, values: &[f64]) -> Self {
        for (i, v) in values.iter().enumerate().take(self.x_axis.nbins) {
            self.content[i + 1] = *v;
        }
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = option.into();
        self
    }

    /// In-range bin content, zero-based bin index.
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.content.get(bin + 1).copied().unwrap_or(0.0)
    }

    pub fn bin_content_2d(&self, i: usize, j: usize) -> f64 {
        let row = self.x_axis.nbins + 2;
        self.content.get((j + 1) * row + (i + 1)).copied().unwrap_or(0.0)
    }

    /// Per-bin error: the explicit error slot when present, otherwise the
    /// Poisson estimate `sqrt(|content|)`.
    pub fn bin_error(&self, bin: usize) -> f64 {
        match &self.errors {
            Some(errs) => errs.get(bin + 1).copied().unwrap_or(0.0),
            None => self.bin_content(bin).abs().sqrt(),
        }
    }

    pub fn underflow(&self) -> f64 {
        self.content.first().copied().unwrap_or(0.0)
    }

    pub fn overflow(&self) -> f64 {
        self.content.last().copied().unwrap_or(0.0)
    }

    fn expected_len(&self) -> usize {
        match self.dim {
            2 => (self.x_axis.nbins + 2) * (self.y_axis.nbins + 2),
            _ => self.x_axis.nbins + 2,
        }
    }

    /// Validate the pieces a draw call cannot work without. A zero-bin or
    /// degenerate-range histogram is *not* an error here; it only disables
    /// content rendering downstream.
    pub fn validate(&self) -> Result<()> {
        if self.dim != 1 && self.dim != 2 {
            return Err(Report::new(PaintError)
                .attach(format!("unsupported dimension {}", self.dim)));
        }
        if self.content.is_empty() {
            return Err(Report::new(PaintError).attach("missing bin content array"));
        }
        if self.content.len() != self.expected_len() {
            return Err(Report::new(PaintError).attach(format!(
                "content length {} does not match axis spec (expected {})",
                self.content.len(),
                self.expected_len()
            )));
        }
        if let Some(errs) = &self.errors {
            if errs.len() != self.content.len() {
                return Err(
                    Report::new(PaintError).attach("error array length mismatch")
                );
            }
        }
        Ok(())
    }

    /// Replace the bin content and ranges in place, keeping painter-side
    /// state (zoom, options) intact unless the option string changed.
    pub fn update_from(&mut self, other: &HistogramDescriptor) {
        self.content = other.content.clone();
        self.errors = other.errors.clone();
        self.x_axis.min = other.x_axis.min;
        self.x_axis.max = other.x_axis.max;
        self.x_axis.nbins = other.x_axis.nbins;
        self.y_axis.min = other.y_axis.min;
        self.y_axis.max = other.y_axis.max;
        self.y_axis.nbins = other.y_axis.nbins;
        self.minimum = other.minimum;
        self.maximum = other.maximum;
        self.style = other.style;
        self.title = other.title.clone();
        self.option = other.option.clone();
    }
}

/// Scatter graph with optional asymmetric point errors.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphDescriptor {
    pub name: String,
    pub title: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub ex_low: Option<Vec<f64>>,
    pub ex_high: Option<Vec<f64>>,
    pub ey_low: Option<Vec<f64>>,
    pub ey_high: Option<Vec<f64>>,
    pub style: StyleAttr,
    pub option: String,
}

impl GraphDescriptor {
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            style: StyleAttr::default(),
            ..Self::default()
        }
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = option.into();
        self
    }

    pub fn npoints(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn has_errors(&self) -> bool {
        self.ey_low.is_some() || self.ey_high.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.x.len() != self.y.len() {
            return Err(Report::new(PaintError).attach(format!(
                "graph coordinate arrays disagree: {} x vs {} y",
                self.x.len(),
                self.y.len()
            )));
        }
        Ok(())
    }
}

pub type SampledFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Continuous function sampled across `[xmin, xmax]`. When `saved` samples
/// are present they win over live evaluation (the original object may carry
/// fit results without a callable body).
#[derive(Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    pub title: String,
    pub xmin: f64,
    pub xmax: f64,
    pub npx: usize,
    pub eval: Option<SampledFn>,
    pub saved: Option<Vec<f64>>,
    pub style: StyleAttr,
}

impl std::fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("xmin", &self.xmin)
            .field("xmax", &self.xmax)
            .field("npx", &self.npx)
            .field("saved", &self.saved.as_ref().map(Vec::len))
            .finish()
    }
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        xmin: f64,
        xmax: f64,
        eval: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            xmin,
            xmax,
            npx: 100,
            eval: Some(Arc::new(eval)),
            saved: None,
            style: StyleAttr::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.eval.is_none() && self.saved.is_none() {
            return Err(Report::new(PaintError)
                .attach("function has neither a body nor saved samples"));
        }
        Ok(())
    }
}

/// The four drawable kinds, dispatched through one closed set rather than an
/// open painter hierarchy.
#[derive(Clone, Debug)]
pub enum PlotObject {
    Hist1D(HistogramDescriptor),
    Hist2D(HistogramDescriptor),
    Graph(GraphDescriptor),
    Function(FunctionDescriptor),
}

impl PlotObject {
    pub fn name(&self) -> &str {
        match self {
            PlotObject::Hist1D(h) | PlotObject::Hist2D(h) => &h.name,
            PlotObject::Graph(g) => &g.name,
            PlotObject::Function(f) => &f.name,
        }
    }
}

/// Visible data-space sub-range. The unset sentinel is `min == max` per
/// axis, which lets "unzoom X" and "unzoom Y" reset independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoomWindow {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl ZoomWindow {
    pub const UNSET: Self = Self {
        xmin: 0.0,
        xmax: 0.0,
        ymin: 0.0,
        ymax: 0.0,
    };

    pub fn x_active(&self) -> bool {
        self.xmin != self.xmax
    }

    pub fn y_active(&self) -> bool {
        self.ymin != self.ymax
    }

    pub fn clear_x(&mut self) {
        self.xmin = 0.0;
        self.xmax = 0.0;
    }

    pub fn clear_y(&mut self) {
        self.ymin = 0.0;
        self.ymax = 0.0;
    }
}

/// Per-pad flags the option decoder copies into the decoded record.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PadConfig {
    pub log_x: bool,
    pub log_y: bool,
    pub log_z: bool,
    pub grid_x: bool,
    pub grid_y: bool,
}

/// Tooltip behavior: off, debounced overlay, or immediate per-shape titles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipMode {
    Off,
    #[default]
    Debounced,
    Immediate,
}

/// Explicit rendering configuration threaded through the orchestrator
/// (replaces the original's module-level style singleton).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PaintConfig {
    pub tooltip: TooltipMode,
    pub auto_stat: bool,
    /// Decimal digit mask selecting stat-box lines:
    /// name/entries/mean/rms/underflow/overflow/integral.
    pub opt_stat: u32,
    /// Stat box geometry as fractions of the frame size.
    pub stat_x: f64,
    pub stat_y: f64,
    pub stat_w: f64,
    pub stat_h: f64,
    pub contour_levels: usize,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            tooltip: TooltipMode::Debounced,
            auto_stat: true,
            opt_stat: 1111,
            stat_x: 0.78,
            stat_y: 0.02,
            stat_w: 0.20,
            stat_h: 0.16,
            contour_levels: 20,
        }
    }
}

/// Pixel viewport of the frame the painters draw into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}
