//! Weighted statistics over the visible bin range, plus the stat-box text
//! contract (labels, digit counts, large-value formatting).

use crate::core::{HistogramDescriptor, ZoomWindow};

/// Half-open bin range `[left, right)` restricted by an active x zoom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleRange {
    pub left: usize,
    pub right: usize,
}

impl VisibleRange {
    /// Derive the visible x-bin range. The left edge floors, the right edge
    /// rounds half a bin up, so a partially covered bin stays included.
    pub fn of(histo: &HistogramDescriptor, zoom: &ZoomWindow) -> Self {
        let nbins = histo.x_axis.nbins;
        if !zoom.x_active() {
            return Self {
                left: 0,
                right: nbins,
            };
        }
        let bw = histo.x_axis.bin_width();
        if bw <= 0.0 {
            return Self {
                left: 0,
                right: nbins,
            };
        }
        let left = ((zoom.xmin - histo.x_axis.min) / bw).floor().max(0.0) as usize;
        let right = (((zoom.xmax - histo.x_axis.min) / bw + 0.5).round() as usize).min(nbins);
        Self {
            left: left.min(nbins),
            right,
        }
    }

    pub fn len(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left
    }
}

/// Accumulated statistics of the visible range. `entries`, `underflow` and
/// `overflow` always describe the full content array regardless of zoom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HistStats {
    pub sum0: f64,
    pub sum1: f64,
    pub sum2: f64,
    pub entries: f64,
    pub underflow: f64,
    pub overflow: f64,
}

impl HistStats {
    pub fn mean(&self) -> f64 {
        if self.sum0 > 0.0 {
            self.sum1 / self.sum0
        } else {
            0.0
        }
    }

    pub fn rms(&self) -> f64 {
        if self.sum0 > 0.0 {
            let m = self.mean();
            (self.sum2 / self.sum0 - m * m).max(0.0).sqrt()
        } else {
            0.0
        }
    }

    /// Sum of visible bin contents (the stat-box "Integral" line).
    pub fn integral(&self) -> f64 {
        self.sum0
    }
}

/// Weighted sums over the visible bins of a 1-D histogram, using the left
/// bin edge as the coordinate.
pub fn compute_stats_1d(histo: &HistogramDescriptor, range: VisibleRange) -> HistStats {
    let bw = histo.x_axis.bin_width();
    let mut st = HistStats {
        entries: histo.content.iter().sum(),
        underflow: histo.underflow(),
        overflow: histo.overflow(),
        ..HistStats::default()
    };
    for bin in range.left..range.right {
        let x = histo.x_axis.min + bin as f64 * bw;
        let w = histo.bin_content(bin);
        st.sum0 += w;
        st.sum1 += x * w;
        st.sum2 += x * x * w;
    }
    st
}

/// 2-D variant: x statistics with each column weighted by the sum of its
/// visible rows.
pub fn compute_stats_2d(
    histo: &HistogramDescriptor,
    range: VisibleRange,
    zoom: &ZoomWindow,
) -> HistStats {
    let bw = histo.x_axis.bin_width();
    let bh = histo.y_axis.bin_width();
    let mut st = HistStats {
        entries: histo.content.iter().sum(),
        underflow: histo.underflow(),
        overflow: histo.overflow(),
        ..HistStats::default()
    };
    for i in range.left..range.right {
        let x = histo.x_axis.min + i as f64 * bw;
        let mut w = 0.0;
        for j in 0..histo.y_axis.nbins {
            if zoom.y_active() {
                let yc = histo.y_axis.min + (j as f64 + 0.5) * bh;
                if yc < zoom.ymin || yc > zoom.ymax {
                    continue;
                }
            }
            w += histo.bin_content_2d(i, j);
        }
        st.sum0 += w;
        st.sum1 += x * w;
        st.sum2 += x * x * w;
    }
    st
}

/// Fixed-point rendering with `digits` fractional digits; magnitudes above
/// 1e8 switch to an exponential mantissa with three fractional digits and an
/// explicit exponent sign (`1.000e+8`).
pub fn format_stat(value: f64, digits: usize) -> String {
    if value.abs() > 1e8 {
        let s = format!("{value:.3e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    } else {
        format!("{value:.digits$}")
    }
}

/// Stat-box lines selected by the decimal digit mask: units pick the name,
/// then each higher decimal place enables entries, mean, RMS, underflow,
/// overflow and integral in turn. The default mask 1111 shows the first four.
pub fn stat_lines(histo: &HistogramDescriptor, st: &HistStats, opt_stat: u32) -> Vec<String> {
    let print_name = opt_stat % 10;
    let print_entries = (opt_stat / 10) % 10;
    let print_mean = (opt_stat / 100) % 10;
    let print_rms = (opt_stat / 1000) % 10;
    let print_under = (opt_stat / 10_000) % 10;
    let print_over = (opt_stat / 100_000) % 10;
    let print_integral = (opt_stat / 1_000_000) % 10;

    let mut lines = Vec::new();
    if print_name > 0 {
        lines.push(histo.name.clone());
    }
    if print_entries > 0 {
        lines.push(format!("Entries = {}", format_stat(st.entries, 0)));
    }
    if print_mean > 0 {
        lines.push(format!("Mean = {}", format_stat(st.mean(), 2)));
    }
    if print_rms > 0 {
        lines.push(format!("RMS = {}", format_stat(st.rms(), 3)));
    }
    if print_under > 0 {
        lines.push(format!("Underflow = {}", format_stat(st.underflow, 0)));
    }
    if print_over > 0 {
        lines.push(format!("Overflow = {}", format_stat(st.overflow, 0)));
    }
    if print_integral > 0 {
        lines.push(format!("Integral = {}", format_stat(st.integral(), 0)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_histo() -> HistogramDescriptor {
        // Ten bins over [0, 10), triangle-ish content.
        HistogramDescriptor::new_1d("hstat", 10, 0.0, 10.0)
            .with_content(&[1.0, 2.0, 4.0, 8.0, 16.0, 16.0, 8.0, 4.0, 2.0, 1.0])
    }

    #[test]
    fn full_range_without_zoom() {
        let h = sample_histo();
        let r = VisibleRange::of(&h, &ZoomWindow::UNSET);
        assert_eq!((r.left, r.right), (0, 10));
    }

    #[test]
    fn zoomed_range_keeps_partially_covered_bins() {
        let h = sample_histo();
        let zoom = ZoomWindow {
            xmin: 2.4,
            xmax: 6.6,
            ..ZoomWindow::UNSET
        };
        let r = VisibleRange::of(&h, &zoom);
        assert_eq!(r.left, 2);
        // round((6.6 - 0)/1 + 0.5) = 7: bin 6 covering [6, 7) is the last
        // partially covered bin and `right` is exclusive.
        assert_eq!(r.right, 7);
    }

    #[test]
    fn zoom_beyond_edges_clamps() {
        let h = sample_histo();
        let zoom = ZoomWindow {
            xmin: -5.0,
            xmax: 50.0,
            ..ZoomWindow::UNSET
        };
        let r = VisibleRange::of(&h, &zoom);
        assert_eq!((r.left, r.right), (0, 10));
    }

    #[test]
    fn mean_and_rms_over_full_range() {
        let h = sample_histo();
        let st = compute_stats_1d(&h, VisibleRange::of(&h, &ZoomWindow::UNSET));
        assert_eq!(st.sum0, 62.0);
        // Content symmetric over left edges 0..=9.
        assert!((st.mean() - 4.5).abs() < 1e-12);
        assert!(st.rms() > 0.0);
    }

    #[test]
    fn empty_visible_range_yields_zero_not_nan() {
        let h = HistogramDescriptor::new_1d("hempty", 10, 0.0, 10.0);
        let st = compute_stats_1d(&h, VisibleRange::of(&h, &ZoomWindow::UNSET));
        assert_eq!(st.mean(), 0.0);
        assert_eq!(st.rms(), 0.0);
    }

    #[test]
    fn entries_include_under_and_overflow() {
        let mut h = sample_histo();
        h.content[0] = 3.0;
        *h.content.last_mut().unwrap() = 7.0;
        let st = compute_stats_1d(&h, VisibleRange::of(&h, &ZoomWindow::UNSET));
        assert_eq!(st.entries, 72.0);
        assert_eq!(st.underflow, 3.0);
        assert_eq!(st.overflow, 7.0);
        // Integral stays the in-range sum.
        assert_eq!(st.integral(), 62.0);
    }

    #[test]
    fn large_values_switch_to_exponential() {
        assert_eq!(format_stat(1e8, 0), "100000000");
        assert_eq!(format_stat(1.0e9, 0), "1.000e+9");
        assert_eq!(format_stat(2.5e10, 2), "2.500e+10");
        assert_eq!(format_stat(12.3456, 2), "12.35");
    }

    #[test]
    fn stat_mask_selects_lines() {
        let h = sample_histo();
        let st = compute_stats_1d(&h, VisibleRange::of(&h, &ZoomWindow::UNSET));
        let lines = stat_lines(&h, &st, 1111);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "hstat");
        assert_eq!(lines[1], "Entries = 62");
        assert_eq!(lines[2], "Mean = 4.50");
        let lines = stat_lines(&h, &st, 1_111_111);
        assert_eq!(lines.len(), 7);
        assert!(lines[6].starts_with("Integral = "));
        assert!(stat_lines(&h, &st, 0).is_empty());
    }

    #[test]
    fn stats_2d_sum_rows_per_column() {
        let mut h = HistogramDescriptor::new_2d("h2", 2, 0.0, 2.0, 2, 0.0, 2.0);
        // Column 0 holds 3 total, column 1 holds 1.
        let row = h.x_axis.nbins + 2;
        h.content[row + 1] = 1.0; // (0,0)
        h.content[2 * row + 1] = 2.0; // (0,1)
        h.content[2 * row + 2] = 1.0; // (1,1)
        let st = compute_stats_2d(
            &h,
            VisibleRange::of(&h, &ZoomWindow::UNSET),
            &ZoomWindow::UNSET,
        );
        assert_eq!(st.sum0, 4.0);
        // Column left edges at 0 and 1 with weights 3 and 1.
        assert!((st.mean() - 0.25).abs() < 1e-12);
    }
}
