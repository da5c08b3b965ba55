//! Static style tables: the indexed color map, marker glyphs, line dash
//! patterns, font names and the rainbow palette used for 2-D color maps.
//! All lookups are total; out-of-table indices fall back deterministically.

use crate::core::Color;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// First 51 slots of the color table (indices 0..=50).
const BASE_COLORS: [(u8, u8, u8); 51] = [
    (255, 255, 255),
    (0, 0, 0),
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (89, 211, 84),
    (89, 84, 216),
    (254, 254, 254),
    (191, 181, 173),
    (76, 76, 76),
    (102, 102, 102),
    (127, 127, 127),
    (153, 153, 153),
    (178, 178, 178),
    (204, 204, 204),
    (229, 229, 229),
    (242, 242, 242),
    (204, 198, 170),
    (204, 198, 170),
    (193, 191, 168),
    (186, 181, 163),
    (178, 165, 150),
    (183, 163, 155),
    (173, 153, 140),
    (155, 142, 130),
    (135, 102, 86),
    (175, 206, 198),
    (132, 193, 163),
    (137, 168, 160),
    (130, 158, 140),
    (173, 188, 198),
    (122, 142, 153),
    (117, 137, 145),
    (104, 130, 150),
    (109, 122, 132),
    (124, 153, 209),
    (127, 127, 155),
    (170, 165, 191),
    (211, 206, 135),
    (221, 186, 135),
    (188, 158, 130),
    (198, 153, 124),
    (191, 130, 119),
    (206, 94, 96),
    (170, 142, 147),
    (165, 119, 122),
    (147, 104, 112),
    (211, 89, 84),
];

/// Base indices of the hue families laid out on the color wheel ("circle")
/// and on the saturation rectangle, 15 shades each.
const CIRCLE_BASES: [usize; 6] = [632, 416, 600, 400, 616, 432];
const RECT_BASES: [usize; 6] = [800, 820, 840, 860, 880, 900];

const CIRCLE_SETS: [[(u8, u8, u8); 15]; 6] = [
    [
        (255, 204, 204), (255, 153, 153), (204, 153, 153), (255, 102, 102), (204, 102, 102),
        (153, 102, 102), (255, 51, 51), (204, 51, 51), (153, 51, 51), (102, 51, 51),
        (255, 0, 0), (204, 0, 0), (153, 0, 0), (102, 0, 0), (51, 0, 0),
    ],
    [
        (204, 255, 204), (153, 255, 153), (153, 204, 153), (102, 255, 102), (102, 204, 102),
        (102, 153, 102), (51, 255, 51), (51, 204, 51), (51, 153, 51), (51, 102, 51),
        (0, 255, 0), (0, 204, 0), (0, 153, 0), (0, 102, 0), (0, 51, 0),
    ],
    [
        (204, 204, 255), (153, 153, 255), (153, 153, 204), (102, 102, 255), (102, 102, 204),
        (102, 102, 153), (51, 51, 255), (51, 51, 204), (51, 51, 153), (51, 51, 102),
        (0, 0, 255), (0, 0, 204), (0, 0, 153), (0, 0, 102), (0, 0, 51),
    ],
    [
        (255, 255, 204), (255, 255, 153), (204, 204, 153), (255, 255, 102), (204, 204, 102),
        (153, 153, 102), (255, 255, 51), (204, 204, 51), (153, 153, 51), (102, 102, 51),
        (255, 255, 0), (204, 204, 0), (153, 153, 0), (102, 102, 0), (51, 51, 0),
    ],
    [
        (255, 204, 255), (255, 153, 255), (204, 153, 204), (255, 102, 255), (204, 102, 204),
        (153, 102, 153), (255, 51, 255), (204, 51, 204), (153, 51, 153), (102, 51, 102),
        (255, 0, 255), (204, 0, 204), (153, 0, 153), (102, 0, 102), (51, 0, 51),
    ],
    [
        (204, 255, 255), (153, 255, 255), (153, 204, 204), (102, 255, 255), (102, 204, 204),
        (102, 153, 153), (51, 255, 255), (51, 204, 204), (51, 153, 153), (51, 102, 102),
        (0, 255, 255), (0, 204, 204), (0, 153, 153), (0, 102, 102), (0, 51, 51),
    ],
];

const RECT_SETS: [[(u8, u8, u8); 15]; 6] = [
    [
        (255, 204, 153), (204, 153, 102), (153, 102, 51), (153, 102, 0), (204, 153, 51),
        (255, 204, 102), (255, 153, 0), (255, 204, 51), (204, 153, 0), (255, 204, 0),
        (255, 153, 51), (204, 102, 0), (102, 51, 0), (153, 51, 0), (204, 102, 51),
    ],
    [
        (153, 255, 51), (102, 204, 0), (51, 102, 0), (51, 153, 0), (102, 204, 51),
        (153, 255, 102), (102, 255, 0), (102, 255, 51), (51, 204, 0), (51, 255, 0),
        (204, 255, 153), (153, 204, 102), (102, 153, 51), (102, 153, 0), (153, 204, 51),
    ],
    [
        (153, 255, 204), (102, 204, 153), (51, 153, 102), (0, 153, 102), (51, 204, 153),
        (102, 255, 204), (0, 255, 102), (51, 255, 204), (0, 204, 153), (0, 255, 204),
        (51, 255, 153), (0, 204, 102), (0, 102, 51), (0, 153, 51), (51, 204, 102),
    ],
    [
        (153, 204, 255), (102, 153, 204), (51, 102, 153), (0, 51, 153), (51, 102, 204),
        (102, 153, 255), (0, 102, 255), (51, 102, 255), (0, 51, 204), (0, 51, 255),
        (51, 153, 255), (0, 102, 204), (0, 51, 102), (0, 102, 153), (51, 153, 204),
    ],
    [
        (204, 153, 255), (153, 102, 204), (102, 51, 153), (102, 0, 153), (153, 51, 204),
        (204, 102, 255), (153, 0, 255), (204, 51, 255), (153, 0, 204), (204, 0, 255),
        (153, 51, 255), (102, 0, 204), (51, 0, 102), (51, 0, 153), (102, 51, 204),
    ],
    [
        (255, 51, 153), (204, 0, 102), (102, 0, 51), (153, 0, 51), (204, 51, 102),
        (255, 102, 153), (255, 0, 102), (255, 51, 102), (204, 0, 51), (255, 0, 51),
        (255, 153, 204), (204, 102, 153), (153, 51, 102), (153, 0, 102), (204, 51, 153),
    ],
];

const COLOR_TABLE_LEN: usize = 1000;

fn color_table() -> &'static [Option<Color>; COLOR_TABLE_LEN] {
    static TABLE: OnceLock<[Option<Color>; COLOR_TABLE_LEN]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [None; COLOR_TABLE_LEN];
        for (i, &(r, g, b)) in BASE_COLORS.iter().enumerate() {
            table[i] = Some(Color::rgb8(r, g, b));
        }
        for i in 0..6 {
            for j in 0..15 {
                let (r, g, b) = CIRCLE_SETS[i][j];
                table[CIRCLE_BASES[i] + j - 10] = Some(Color::rgb8(r, g, b));
                let (r, g, b) = RECT_SETS[i][j];
                table[RECT_BASES[i] + j - 9] = Some(Color::rgb8(r, g, b));
            }
        }
        table
    })
}

/// Indexed color lookup; unassigned slots resolve to black.
pub fn root_color(index: u16) -> Color {
    color_table()
        .get(index as usize)
        .copied()
        .flatten()
        .unwrap_or(Color::BLACK)
}

/// Series color lookup: index 0 means "unset" and resolves to the steel-blue
/// default rather than to table slot 0 (white).
pub fn series_color(index: u16) -> Color {
    if index == 0 {
        Color::DEFAULT_SERIES
    } else {
        root_color(index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Circle,
    Cross,
    Diamond,
    Square,
    TriangleUp,
    TriangleDown,
    Star,
    Asterisk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerGlyph {
    pub shape: MarkerShape,
    pub filled: bool,
    pub rotated: bool,
}

/// Marker style table. The prefix encodes fill/rotation: filled, open,
/// rotated, or the asterisk-like cross drawn as bare strokes.
const MARKERS: [&str; 35] = [
    "fcircle", "fcircle", "fcross", "dcross", "ocircle", "gcross", "fcircle", "fcircle",
    "fcircle", "fcircle", "fcircle", "fcircle", "fcircle", "fcircle", "fcircle", "fcircle",
    "fcircle", "fcircle", "fcircle", "fcircle", "fcircle", "fsquare", "ftriangle-up",
    "ftriangle-down", "ocircle", "osquare", "otriangle-up", "odiamond", "ocross", "fstar",
    "ostar", "dcross", "otriangle-down", "fdiamond", "fcross",
];

/// Resolve a numeric marker style; indices wrap around the table.
pub fn marker_glyph(style: u16) -> MarkerGlyph {
    let spec = MARKERS[style as usize % MARKERS.len()];
    let (mut filled, mut rotated) = (true, false);
    let body = match spec.as_bytes()[0] {
        b'd' => {
            return MarkerGlyph {
                shape: MarkerShape::Asterisk,
                filled: false,
                rotated: false,
            };
        }
        b'o' => {
            filled = false;
            &spec[1..]
        }
        b'g' => {
            rotated = true;
            &spec[1..]
        }
        _ => &spec[1..],
    };
    let shape = match body {
        "cross" => MarkerShape::Cross,
        "diamond" => MarkerShape::Diamond,
        "square" => MarkerShape::Square,
        "triangle-up" => MarkerShape::TriangleUp,
        "triangle-down" => MarkerShape::TriangleDown,
        "star" => MarkerShape::Star,
        _ => MarkerShape::Circle,
    };
    MarkerGlyph {
        shape,
        filled,
        rotated,
    }
}

/// Dash patterns by line style index; index 11 is the grid pattern.
const LINE_STYLES: [&str; 12] = [
    "",
    "",
    "3, 3",
    "1, 2",
    "3, 4, 1, 4",
    "5, 3, 1, 3",
    "5, 3, 1, 3, 1, 3, 1, 3",
    "5, 5",
    "5, 3, 1, 3, 1, 3",
    "20, 5",
    "20, 10, 1, 10",
    "1, 2",
];

pub const GRID_LINE_STYLE: u16 = 11;

/// Dash pattern for a line style index; empty means solid.
pub fn line_dash(style: u16) -> &'static str {
    LINE_STYLES[style as usize % LINE_STYLES.len()]
}

const FONTS: [&str; 16] = [
    "Arial",
    "Times New Roman",
    "bold Times New Roman",
    "bold italic Times New Roman",
    "Arial",
    "oblique Arial",
    "bold Arial",
    "bold oblique Arial",
    "Courier New",
    "oblique Courier New",
    "bold Courier New",
    "bold oblique Courier New",
    "Symbol",
    "Times New Roman",
    "Wingdings",
    "Symbol",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontSpec {
    pub name: &'static str,
    pub weight: &'static str,
    pub style: &'static str,
}

/// Font details for a packed font index (`fTextFont / 10` family slot).
pub fn font_details(index: u16) -> FontSpec {
    let mut spec = FONTS[index as usize % FONTS.len()];
    let mut weight = "";
    let mut style = "";
    if let Some(rest) = spec.strip_prefix("bold ") {
        weight = "bold";
        spec = rest;
    }
    if let Some(rest) = spec.strip_prefix("italic ") {
        style = "italic";
        spec = rest;
    } else if let Some(rest) = spec.strip_prefix("oblique ") {
        style = "oblique";
        spec = rest;
    }
    FontSpec {
        name: spec,
        weight,
        style,
    }
}

const PALETTE_LEN: usize = 50;

fn hls_to_rgb(h: f64, l: f64, s: f64) -> Color {
    if s < 1e-300 {
        return Color::rgb(l as f32, l as f32, l as f32);
    }
    fn hue(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Color::rgb8(
        (hue(p, q, h + 1.0 / 3.0) * 255.0).round() as u8,
        (hue(p, q, h) * 255.0).round() as u8,
        (hue(p, q, h - 1.0 / 3.0) * 255.0).round() as u8,
    )
}

/// Rainbow palette running from hue 280 (violet) down to 0 (red), computed
/// once per process.
pub fn default_palette() -> &'static [Color; PALETTE_LEN] {
    static PALETTE: OnceLock<[Color; PALETTE_LEN]> = OnceLock::new();
    PALETTE.get_or_init(|| {
        let mut palette = [Color::BLACK; PALETTE_LEN];
        for (i, slot) in palette.iter_mut().enumerate() {
            let hue = (280.0 - (i as f64 + 1.0) * (280.0 / PALETTE_LEN as f64)) / 360.0;
            *slot = hls_to_rgb(hue, 0.5, 1.0);
        }
        palette
    })
}

/// Palette slot for a cell value within `[wlmin, wlmax]` split into `ndivz`
/// contour levels. Inputs below the range clamp to the lowest slot.
pub fn value_color_index(mut zc: f64, wlmin: f64, wlmax: f64, ndivz: usize) -> usize {
    let ndivz = ndivz.max(16) as f64;
    let ncolors = PALETTE_LEN as f64;
    if zc < wlmin {
        zc = wlmin;
    }
    let scale = ndivz / (wlmax - wlmin);
    let level = (0.01 + (zc - wlmin) * scale).round();
    let the_color = ((level + 0.99) * ncolors / ndivz).round();
    let icol = the_color as i64 % PALETTE_LEN as i64;
    if icol < 0 { 0 } else { icol as usize }
}

pub fn value_color(zc: f64, wlmin: f64, wlmax: f64, ndivz: usize) -> Color {
    default_palette()[value_color_index(zc, wlmin, wlmax, ndivz)]
}
