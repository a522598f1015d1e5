//! Size statistics for the adaptive merge thresholds.

use crate::geometry::Orientation;

use super::normalize::ProcessedLine;

/// Median of `values`; 0 for an empty slice. Sorts `values` in place.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Median that ignores stray fragments much smaller than the typical line.
///
/// Sizes below `raw_median * min_line_ratio` are dropped before taking the
/// median again. Falls back to the raw median, then to `fallback`, when the
/// result is not positive.
pub fn robust_median(sizes: &[f64], min_line_ratio: f64, fallback: f64) -> f64 {
    let mut all = sizes.to_vec();
    let raw = median(&mut all);
    let mut primary: Vec<f64> = sizes
        .iter()
        .copied()
        .filter(|&s| s >= raw * min_line_ratio)
        .collect();
    let robust = median(&mut primary);
    if robust > 0.0 {
        robust
    } else if raw > 0.0 {
        raw
    } else {
        fallback
    }
}

/// Robust median line size per orientation for one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineScales {
    pub horizontal: f64,
    pub vertical: f64,
}

impl LineScales {
    pub fn from_lines(lines: &[ProcessedLine], min_line_ratio: f64, fallback: f64) -> Self {
        let sizes = |o: Orientation| -> Vec<f64> {
            lines
                .iter()
                .filter(|l| l.orientation == o)
                .map(|l| l.font_size)
                .collect()
        };
        Self {
            horizontal: robust_median(&sizes(Orientation::Horizontal), min_line_ratio, fallback),
            vertical: robust_median(&sizes(Orientation::Vertical), min_line_ratio, fallback),
        }
    }

    pub fn get(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => self.horizontal,
            Orientation::Vertical => self.vertical,
        }
    }
}
