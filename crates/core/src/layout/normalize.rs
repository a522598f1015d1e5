//! Per-line geometry normalization.

use crate::geometry::{BBox, ImageSize, Orientation};
use crate::types::OcrLine;

/// A line prepared for one clustering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedLine {
    /// Index of the source line in the caller's slice.
    pub original_index: usize,
    pub orientation: Orientation,
    /// Extent perpendicular to the reading axis, in canonical units.
    pub font_size: f64,
    pub bbox: BBox,
    pub pixel_top: f64,
    pub pixel_bottom: f64,
}

impl ProcessedLine {
    pub fn is_vertical(&self) -> bool {
        self.orientation.is_vertical()
    }

    /// Extent along the axis perpendicular to reading direction.
    pub fn perpendicular_extent(&self) -> f64 {
        match self.orientation {
            Orientation::Vertical => self.bbox.height(),
            Orientation::Horizontal => self.bbox.width(),
        }
    }
}

/// Normalizes one line on an image of `size`.
///
/// A box no wider than it is tall reads vertically; square boxes count as
/// vertical.
pub fn normalize_line(original_index: usize, line: &OcrLine, size: ImageSize) -> ProcessedLine {
    let rect = &line.tight_bounding_box;
    let h = size.height as f64;
    let bbox = rect.to_canonical(size);
    let orientation = if bbox.width() <= bbox.height() {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    };
    let font_size = match orientation {
        Orientation::Vertical => bbox.width(),
        Orientation::Horizontal => bbox.height(),
    };
    ProcessedLine {
        original_index,
        orientation,
        font_size,
        bbox,
        pixel_top: rect.y * h,
        pixel_bottom: rect.bottom() * h,
    }
}

/// Normalizes every line of a page, keeping input order.
pub fn normalize_lines(lines: &[OcrLine], size: ImageSize) -> Vec<ProcessedLine> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| normalize_line(i, line, size))
        .collect()
}
