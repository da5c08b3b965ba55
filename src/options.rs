//! Draw-option decoding: a compact textual option language is turned into a
//! normalized flags record. The scan works on an uppercased copy of the
//! input and blanks every consumed token in place, so later scans cannot
//! re-trigger on overlapping text; the input itself is never mutated.

use crate::core::{HistogramDescriptor, PadConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordSystem {
    #[default]
    Cartesian,
    Polar,
    Cylindrical,
    Spherical,
    Rapidity,
}

/// Normalized histogram draw options. Numeric fields keep the original
/// encoding: a base mode plus `10 + sub-mode` variants (e.g. `error == 11`
/// for `E1`, `lego == 12` for `LEGO2`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawOptions {
    pub axis: i32,
    pub bar: i32,
    pub curve: i32,
    pub error: i32,
    pub hist: i32,
    pub line: i32,
    pub mark: i32,
    pub fill: i32,
    pub same: i32,
    pub func: i32,
    pub scat: i32,
    pub star: i32,
    pub arrow: i32,
    pub boxes: i32,
    pub text: i32,
    pub char_mode: i32,
    pub color: i32,
    pub contour: i32,
    pub lego: i32,
    pub surf: i32,
    pub off: i32,
    pub tri: i32,
    pub proj: i32,
    pub axis_pos: i32,
    pub spec: i32,
    pub pie: i32,
    pub list: i32,
    pub zscale: i32,
    pub front_box: i32,
    pub back_box: i32,
    pub system: CoordSystem,
    pub high_res: i32,
    pub zero: i32,
    pub log_x: bool,
    pub log_y: bool,
    pub log_z: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            axis: 0,
            bar: 0,
            curve: 0,
            error: 0,
            hist: 0,
            line: 0,
            mark: 0,
            fill: 0,
            same: 0,
            func: 0,
            scat: 0,
            star: 0,
            arrow: 0,
            boxes: 0,
            text: 0,
            char_mode: 0,
            color: 0,
            contour: 0,
            lego: 0,
            surf: 0,
            off: 0,
            tri: 0,
            proj: 0,
            axis_pos: 0,
            spec: 0,
            pie: 0,
            list: 0,
            zscale: 0,
            front_box: 1,
            back_box: 1,
            system: CoordSystem::Cartesian,
            high_res: 0,
            zero: 0,
            log_x: false,
            log_y: false,
            log_z: false,
        }
    }
}

/// Scanner over an uppercased copy of the option string. Consumed tokens are
/// blanked (not removed) so offsets stay valid for sub-mode digits.
struct OptScanner {
    buf: Vec<u8>,
}

impl OptScanner {
    fn new(opt: &str) -> Self {
        let mut buf: Vec<u8> = opt.to_ascii_uppercase().into_bytes();
        // Blank a bracketed cut specification verbatim, keeping offsets.
        if let Some(left) = buf.iter().position(|&b| b == b'[') {
            if let Some(right) = buf.iter().position(|&b| b == b']') {
                if right > left + 1 {
                    for b in &mut buf[left..=right] {
                        *b = b' ';
                    }
                }
            }
        }
        Self { buf }
    }

    fn find(&self, kw: &str) -> Option<usize> {
        let kw = kw.as_bytes();
        if kw.is_empty() || self.buf.len() < kw.len() {
            return None;
        }
        (0..=self.buf.len() - kw.len()).find(|&i| &self.buf[i..i + kw.len()] == kw)
    }

    /// Blank the first occurrence of `kw`, returning its start offset.
    fn remove(&mut self, kw: &str) -> Option<usize> {
        let pos = self.find(kw)?;
        for b in &mut self.buf[pos..pos + kw.len()] {
            *b = b' ';
        }
        Some(pos)
    }

    fn contains(&self, kw: &str) -> bool {
        self.find(kw).is_some()
    }

    /// Sub-mode digit immediately after a keyword: consumed when inside the
    /// accepted range, left alone otherwise.
    fn digit_at(&mut self, pos: usize, lo: u8, hi: u8) -> Option<i32> {
        let b = *self.buf.get(pos)?;
        if b.is_ascii_digit() && b - b'0' >= lo && b - b'0' <= hi {
            self.buf[pos] = b' ';
            Some((b - b'0') as i32)
        } else {
            None
        }
    }

    /// Leading rotation-angle digits (used by TEXT); consumed.
    fn leading_number(&mut self) -> Option<i32> {
        let digits: Vec<usize> = self
            .buf
            .iter()
            .enumerate()
            .take_while(|(_, b)| b.is_ascii_digit())
            .map(|(i, _)| i)
            .collect();
        if digits.is_empty() {
            return None;
        }
        let mut value: i32 = 0;
        for &i in &digits {
            value = value.saturating_mul(10) + (self.buf[i] - b'0') as i32;
            self.buf[i] = b' ';
        }
        Some(value)
    }
}

impl DrawOptions {
    /// Decode `opt` for a histogram of the given dimension. Unrecognized
    /// tokens are ignored; 2-D-only modes requested on a 1-D histogram fall
    /// back to plain Hist mode.
    pub fn decode(opt: &str, histo: &HistogramDescriptor, pad: &PadConfig) -> Self {
        let hdim = i32::from(histo.dim.max(1));
        let nch = opt.len();
        let mut o = DrawOptions::default();
        let mut s = OptScanner::new(opt);

        if hdim > 1 {
            o.scat = 1;
        }
        if nch == 0 {
            o.hist = 1;
        }
        if histo.errors.is_some() && hdim == 1 {
            o.error = 2;
        }

        if s.remove("SPEC").is_some() {
            o.scat = 0;
            o.spec = 1600;
            o.copy_pad_flags(pad);
            return o;
        }
        s.remove("GL");
        if s.remove("X+").is_some() {
            o.axis_pos = 10;
        }
        if s.remove("Y+").is_some() {
            o.axis_pos += 1;
        }
        if (o.axis_pos == 10 || o.axis_pos == 1) && nch == 2 {
            o.hist = 1;
        }
        if o.axis_pos == 11 && nch == 4 {
            o.hist = 1;
        }
        if s.remove("SAMES").is_some() {
            if nch == 5 {
                o.hist = 1;
            }
            o.same = 2;
        }
        if s.remove("SAME").is_some() {
            if nch == 4 {
                o.hist = 1;
            }
            o.same = 1;
        }
        if s.remove("PIE").is_some() {
            o.pie = 1;
        }
        if let Some(l) = s.remove("LEGO") {
            o.scat = 0;
            o.lego = 1;
            if let Some(d) = s.digit_at(l + 4, 1, 3) {
                o.lego = 10 + d;
            }
            if s.remove("FB").is_some() {
                o.front_box = 0;
            }
            if s.remove("BB").is_some() {
                o.back_box = 0;
            }
            if s.remove("0").is_some() {
                o.zero = 1;
            }
        }
        if let Some(l) = s.remove("SURF") {
            o.scat = 0;
            o.surf = 1;
            if let Some(d) = s.digit_at(l + 4, 1, 7) {
                o.surf = 10 + d;
            }
            if s.remove("FB").is_some() {
                o.front_box = 0;
            }
            if s.remove("BB").is_some() {
                o.back_box = 0;
            }
        }
        if s.remove("TF3").is_some() || s.remove("ISO").is_some() {
            if s.remove("FB").is_some() {
                o.front_box = 0;
            }
            if s.remove("BB").is_some() {
                o.back_box = 0;
            }
        }
        if s.remove("LIST").is_some() {
            o.list = 1;
        }
        if let Some(l) = s.remove("CONT") {
            if hdim > 1 {
                o.scat = 0;
                o.contour = 1;
                if let Some(d) = s.digit_at(l + 4, 1, 5) {
                    o.contour = 10 + d;
                }
            } else {
                o.hist = 1;
            }
        }
        if let Some(l) = s.remove("HBAR") {
            o.hist = 0;
            o.bar = 20;
            if let Some(d) = s.digit_at(l + 4, 1, 4) {
                o.bar = 20 + d;
            }
        }
        if let Some(l) = s.remove("BAR") {
            o.hist = 0;
            o.bar = 10;
            if let Some(d) = s.digit_at(l + 3, 1, 4) {
                o.bar = 10 + d;
            }
        }
        if s.remove("ARR").is_some() {
            if hdim > 1 {
                o.arrow = 1;
                o.scat = 0;
            } else {
                o.hist = 1;
            }
        }
        if let Some(l) = s.remove("BOX") {
            if hdim > 1 {
                o.scat = 0;
                o.boxes = 1;
                if let Some(d) = s.digit_at(l + 3, 1, 1) {
                    o.boxes = 10 + d;
                }
            } else {
                o.hist = 1;
            }
        }
        if s.remove("COLZ").is_some() {
            if hdim > 1 {
                o.color = 2;
                o.scat = 0;
                o.zscale = 1;
            } else {
                o.hist = 1;
            }
        }
        if s.remove("COL").is_some() {
            if hdim > 1 {
                o.color = 1;
                o.scat = 0;
            } else {
                o.hist = 1;
            }
        }
        if s.remove("CHAR").is_some() {
            o.char_mode = 1;
            o.scat = 0;
        }
        if s.remove("FUNC").is_some() {
            o.func = 2;
            o.hist = 0;
        }
        if s.remove("HIST").is_some() {
            o.hist = 2;
            o.func = 0;
            o.error = 0;
        }
        if s.remove("AXIS").is_some() {
            o.axis = 1;
        }
        if s.remove("AXIG").is_some() {
            o.axis = 2;
        }
        if s.remove("SCAT").is_some() {
            o.scat = 1;
        }
        if s.remove("TEXT").is_some() {
            o.text = match s.leading_number() {
                Some(angle) => 1000 + angle.clamp(0, 90),
                None => 1,
            };
            o.scat = 0;
        }
        if s.remove("POL").is_some() {
            o.system = CoordSystem::Polar;
        }
        if s.remove("CYL").is_some() {
            o.system = CoordSystem::Cylindrical;
        }
        if s.remove("SPH").is_some() {
            o.system = CoordSystem::Spherical;
        }
        if s.remove("PSR").is_some() {
            o.system = CoordSystem::Rapidity;
        }
        if s.remove("TRI").is_some() {
            o.scat = 0;
            o.color = 0;
            o.tri = 1;
            if s.remove("FB").is_some() {
                o.front_box = 0;
            }
            if s.remove("BB").is_some() {
                o.back_box = 0;
            }
            s.remove("ERR");
        }
        if s.remove("AITOFF").is_some() {
            o.proj = 1;
        }
        if s.remove("MERCATOR").is_some() {
            o.proj = 2;
        }
        if s.remove("SINUSOIDAL").is_some() {
            o.proj = 3;
        }
        if s.remove("PARABOLIC").is_some() {
            o.proj = 4;
        }
        if o.proj > 0 {
            o.scat = 0;
            o.contour = 14;
        }

        // Single-letter modifiers scan what is left after keyword blanking.
        if s.contains("A") {
            o.axis = -1;
        }
        if s.contains("B") {
            o.bar = 1;
        }
        if s.contains("C") {
            o.curve = 1;
            o.hist = -1;
        }
        if s.contains("F") {
            o.fill = 1;
        }
        if s.contains("][") {
            o.off = 1;
            o.hist = 1;
        }
        if s.contains("F2") {
            o.fill = 2;
        }
        if s.contains("L") {
            o.line = 1;
            o.hist = -1;
        }
        if s.contains("P") {
            o.mark = 1;
            o.hist = -1;
        }
        if s.contains("Z") {
            o.zscale = 1;
        }
        if s.contains("*") {
            o.star = 1;
        }
        if s.contains("H") {
            o.hist = 2;
        }
        if s.contains("P0") {
            o.mark = 10;
        }
        if s.contains("E") {
            if hdim == 1 {
                o.error = 1;
                for d in 0..=6 {
                    if s.contains(&format!("E{d}")) {
                        o.error = 10 + d;
                    }
                }
                if s.contains("X0") {
                    if o.error == 1 {
                        o.error += 20;
                    }
                    o.error += 10;
                }
            } else {
                if o.error == 0 {
                    o.error = 100;
                    o.scat = 0;
                }
                if o.text > 0 {
                    o.text += 2000;
                    o.error = 0;
                }
            }
        }
        if s.contains("9") {
            o.high_res = 1;
        }

        // SURF5 exists only in non-cartesian, non-polar systems.
        if o.surf == 15
            && matches!(o.system, CoordSystem::Polar | CoordSystem::Cartesian)
        {
            o.surf = 13;
        }
        o.copy_pad_flags(pad);
        if o.bar == 1 {
            o.hist = -1;
        }
        o
    }

    fn copy_pad_flags(&mut self, pad: &PadConfig) {
        self.log_x = pad.log_x;
        self.log_y = pad.log_y;
        self.log_z = pad.log_z;
    }

    /// True when any 3-D shape mode is active. Mutually exclusive shape
    /// keywords collapse through the sequential scan: the last one decoded
    /// overwrote the flag of the earlier one.
    pub fn mode_3d(&self) -> bool {
        self.lego > 0 || self.surf > 0 || self.tri > 0
    }

    /// Re-emit the explicit flags as a normalized option string. Flags the
    /// decoder derives on its own (default Hist mode, the implicit scatter
    /// mode of 2-D histograms, error mode 2 from a present error array) are
    /// not emitted, so decoding the result reproduces the same record.
    pub fn as_string(&self) -> String {
        let mut res = String::new();
        match self.same {
            2 => res.push_str("SAMES"),
            1 => res.push_str("SAME"),
            _ => {}
        }
        match self.axis {
            1 => res.push_str("AXIS"),
            2 => res.push_str("AXIG"),
            -1 => res.push('A'),
            _ => {}
        }
        if self.lego > 0 {
            res.push_str("LEGO");
            if self.lego > 10 {
                res.push_str(&(self.lego - 10).to_string());
            }
            if self.zero == 1 {
                res.push('0');
            }
        }
        if self.surf > 0 {
            res.push_str("SURF");
            if self.surf > 10 {
                res.push_str(&(self.surf - 10).to_string());
            }
        }
        if self.contour > 0 && self.proj == 0 {
            res.push_str("CONT");
            if self.contour > 10 {
                res.push_str(&(self.contour - 10).to_string());
            }
        }
        match self.bar {
            10..=14 => {
                res.push_str("BAR");
                if self.bar > 10 {
                    res.push_str(&(self.bar - 10).to_string());
                }
            }
            20..=24 => {
                res.push_str("HBAR");
                if self.bar > 20 {
                    res.push_str(&(self.bar - 20).to_string());
                }
            }
            1 => res.push('B'),
            _ => {}
        }
        match self.color {
            2 => res.push_str("COLZ"),
            1 => res.push_str("COL"),
            _ => {}
        }
        match self.boxes {
            11 => res.push_str("BOX1"),
            1 => res.push_str("BOX"),
            _ => {}
        }
        if self.arrow > 0 {
            res.push_str("ARR");
        }
        if self.char_mode > 0 {
            res.push_str("CHAR");
        }
        if self.text > 0 {
            if self.text >= 1000 {
                res.push_str(&(self.text % 1000).min(90).to_string());
            }
            res.push_str("TEXT");
        }
        if self.func == 2 {
            res.push_str("FUNC");
        }
        if self.hist == 2 {
            res.push_str("HIST");
        }
        if self.line == 1 {
            res.push('L');
        }
        if self.curve == 1 {
            res.push('C');
        }
        match self.fill {
            2 => res.push_str("F2"),
            1 => res.push('F'),
            _ => {}
        }
        match self.mark {
            10 => res.push_str("P0"),
            1 => res.push('P'),
            _ => {}
        }
        if self.star == 1 {
            res.push('*');
        }
        if self.off == 1 {
            res.push_str("][");
        }
        match self.error {
            1 | 100 => res.push('E'),
            10..=16 => res.push_str(&format!("E{}", self.error - 10)),
            20..=26 => res.push_str(&format!("E{}X0", self.error - 20)),
            31 => res.push_str("EX0"),
            _ => {}
        }
        if self.zscale == 1 && self.color != 2 {
            res.push('Z');
        }
        if self.high_res == 1 {
            res.push('9');
        }
        res
    }
}

/// Graph draw options: a smaller single-letter language decoded separately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphOptions {
    pub line: i32,
    pub axis: i32,
    pub curve: i32,
    pub star: i32,
    pub mark: i32,
    pub bar: i32,
    pub range: i32,
    pub one: i32,
    pub err_band: i32,
    pub fill: i32,
    pub curve_fill: i32,
    pub none: i32,
}

impl GraphOptions {
    pub fn decode(opt: &str) -> Self {
        let mut o = GraphOptions::default();
        let mut s = OptScanner::new(opt);
        s.remove("SAME");

        if s.contains("L") {
            o.line = 1;
        }
        if s.contains("A") {
            o.axis = 1;
        }
        if s.contains("C") {
            o.curve = 1;
        }
        if s.contains("*") {
            o.star = 1;
        }
        if s.contains("P") {
            o.mark = 1;
        }
        if s.contains("B") {
            o.bar = 1;
        }
        if s.contains("R") {
            o.range = 1;
        }
        if s.contains("1") {
            o.one = 1;
        }
        if s.contains("F") {
            o.fill = 1;
        }
        if s.contains("2") || s.contains("3") || s.contains("4") || s.contains("5") {
            o.err_band = 1;
        }

        // Nothing selected: an empty option means plain line, any other
        // leftover means "draw nothing".
        if o.line + o.fill + o.curve + o.star + o.mark + o.bar + o.err_band == 0 {
            if opt.is_empty() {
                o.line = 1;
            } else {
                debug!(option = opt, "no graph draw mode recognized, drawing nothing");
                o.none = 1;
                return o;
            }
        }
        if o.curve == 1 && o.fill == 1 {
            o.curve_fill = 1;
            o.fill = 0;
        }
        o
    }
}
