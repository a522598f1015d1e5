//! Vertical chunking of tall pages.
//!
//! Clustering is quadratic in the number of lines of a chunk, so long
//! scrolling pages are cut into slices no taller than the configured ceiling.
//! Lines in different chunks are never merged.

use std::ops::Range;

use ordered_float::OrderedFloat;

use super::normalize::ProcessedLine;

/// Sorts `lines` by pixel top and returns contiguous chunk ranges into it.
///
/// The sort is stable, so lines with equal tops keep input order. Pages no
/// taller than `ceiling` form one chunk. Otherwise each chunk starts at the
/// first unconsumed line and extends while a line's bottom stays within
/// `ceiling` of the chunk's top; a line that alone exceeds the ceiling still
/// forms its own chunk.
pub fn partition_chunks(
    lines: &mut [ProcessedLine],
    image_height: f64,
    ceiling: f64,
) -> Vec<Range<usize>> {
    lines.sort_by_key(|l| OrderedFloat(l.pixel_top));

    if lines.is_empty() {
        return Vec::new();
    }
    if image_height <= ceiling {
        return vec![0..lines.len()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < lines.len() {
        let chunk_top = lines[start].pixel_top;
        let mut end = start + 1;
        while end < lines.len() && lines[end].pixel_bottom - chunk_top <= ceiling {
            end += 1;
        }
        chunks.push(start..end);
        start = end;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BBox, Orientation};

    fn line(index: usize, top: f64, bottom: f64) -> ProcessedLine {
        ProcessedLine {
            original_index: index,
            orientation: Orientation::Horizontal,
            font_size: 10.0,
            bbox: BBox {
                x0: 0.0,
                top,
                x1: 100.0,
                bottom,
            },
            pixel_top: top,
            pixel_bottom: bottom,
        }
    }

    #[test]
    fn short_page_is_one_chunk() {
        let mut lines = vec![line(0, 500.0, 520.0), line(1, 100.0, 120.0)];
        let chunks = partition_chunks(&mut lines, 2000.0, 3000.0);
        assert_eq!(chunks, vec![0..2]);
        assert_eq!(lines[0].original_index, 1);
    }

    #[test]
    fn tall_page_is_cut_greedily() {
        let mut lines = vec![
            line(0, 0.0, 100.0),
            line(1, 2800.0, 2950.0),
            line(2, 2900.0, 3050.0),
            line(3, 9000.0, 9100.0),
        ];
        let chunks = partition_chunks(&mut lines, 10_000.0, 3000.0);
        assert_eq!(chunks, vec![0..2, 2..3, 3..4]);
    }

    #[test]
    fn oversized_first_line_still_forms_a_chunk() {
        let mut lines = vec![line(0, 0.0, 4000.0), line(1, 10.0, 50.0)];
        let chunks = partition_chunks(&mut lines, 5000.0, 3000.0);
        assert_eq!(chunks, vec![0..2]);

        let mut lines = vec![line(0, 0.0, 4000.0), line(1, 3500.0, 3600.0)];
        let chunks = partition_chunks(&mut lines, 5000.0, 3000.0);
        assert_eq!(chunks, vec![0..1, 1..2]);
    }
}
