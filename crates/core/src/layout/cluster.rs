//! Line-to-group clustering.
//!
//! Lines of one chunk are compared pairwise and joined in a union-find
//! forest when they pass every gate of [`should_merge`]. The thresholds are
//! relative to a robust median line size per orientation, so they adapt to
//! the scan resolution and lettering size of each page.

use tracing::{debug, trace};

use crate::geometry::{ImageSize, Orientation};
use crate::types::{Group, OcrLine};

use super::chunk::partition_chunks;
use super::normalize::{ProcessedLine, normalize_lines};
use super::params::Config;
use super::sort::{SortRule, sort_reading_order};
use super::stats::LineScales;
use super::union_find::{Component, UnionFind};

/// Decides whether two lines of the same chunk belong to the same group.
///
/// Gates, in order:
/// - same orientation
/// - size ratio within `autoMergeFontRatio`, or the tighter
///   `autoMergeFontRatioForMixed` when exactly one line is primary
/// - gap along the reading axis within `autoMergeDistK` robust medians
/// - perpendicular overlap of at least `autoMergeOverlapMin` of the smaller
///   extent, and `autoMergeMixedMinOverlapRatio` for mixed pairs
///
/// ```text
///  vertical pair          horizontal pair
///  +--+  +--+  -          +----------+
///  |  |  |  |  | overlap  |    a     |
///  |b |  |a |  |          +----------+ -
///  |  |  |  |  -                       | gap
///  +--+  +--+                 +------------+ -
///      |<>| gap               |     b      |
///                             +------------+
///                             |<---->| overlap
/// ```
pub fn should_merge(
    a: &ProcessedLine,
    b: &ProcessedLine,
    scales: &LineScales,
    config: &Config,
) -> bool {
    if a.orientation != b.orientation {
        return false;
    }
    if a.font_size <= 0.0 || b.font_size <= 0.0 {
        return false;
    }

    let scale = scales.get(a.orientation);
    let primary_floor = scale * config.auto_merge_min_line_ratio;
    let mixed = (a.font_size >= primary_floor) != (b.font_size >= primary_floor);

    let ratio_limit = if mixed {
        config.auto_merge_font_ratio_for_mixed
    } else {
        config.auto_merge_font_ratio
    };
    let font_ratio = (a.font_size / b.font_size).max(b.font_size / a.font_size);
    if font_ratio > ratio_limit {
        return false;
    }

    let (reading_gap, perp_overlap) = match a.orientation {
        Orientation::Vertical => (a.bbox.hgap(&b.bbox), a.bbox.voverlap(&b.bbox)),
        Orientation::Horizontal => (a.bbox.vgap(&b.bbox), a.bbox.hoverlap(&b.bbox)),
    };
    if reading_gap > config.auto_merge_dist_k * scale {
        return false;
    }

    let smaller_perp = a.perpendicular_extent().min(b.perpendicular_extent());
    if smaller_perp <= 0.0 {
        return false;
    }
    let overlap_ratio = perp_overlap / smaller_perp;
    if overlap_ratio < config.auto_merge_overlap_min {
        return false;
    }
    if mixed && overlap_ratio < config.auto_merge_mixed_min_overlap_ratio {
        return false;
    }
    true
}

/// Clusters one chunk; returned components hold chunk-local indices.
pub fn cluster_chunk(chunk: &[ProcessedLine], config: &Config) -> Vec<Component> {
    let scales = LineScales::from_lines(
        chunk,
        config.auto_merge_min_line_ratio,
        config.fallback_median,
    );
    let mut uf = UnionFind::new(chunk.len());
    for i in 0..chunk.len() {
        for j in (i + 1)..chunk.len() {
            if should_merge(&chunk[i], &chunk[j], &scales, config) {
                uf.union(i, j);
            }
        }
    }
    trace!(
        lines = chunk.len(),
        horizontal_scale = scales.horizontal,
        vertical_scale = scales.vertical,
        "clustered chunk"
    );
    uf.components()
}

fn passthrough(lines: &[OcrLine]) -> Vec<Group> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| Group::singleton(i, line))
        .collect()
}

/// Groups the lines of one page image into reading groups.
///
/// Every input index appears in exactly one output group. Pages with fewer
/// than two lines or unknown dimensions yield one group per line in input
/// order, as does a config with auto-merge disabled.
pub fn group_lines(lines: &[OcrLine], size: ImageSize, config: &Config) -> Vec<Group> {
    if !config.auto_merge_enabled {
        return passthrough(lines);
    }
    auto_merge(lines, size, config)
}

/// Auto-merge regardless of `autoMergeEnabled`.
pub fn auto_merge(lines: &[OcrLine], size: ImageSize, config: &Config) -> Vec<Group> {
    if lines.len() < 2 || !size.is_known() {
        return passthrough(lines);
    }

    let mut processed = normalize_lines(lines, size);
    let chunks = partition_chunks(&mut processed, size.height as f64, config.chunk_max_height);
    let rule = SortRule::Strict {
        tolerance: config.sort_tolerance,
    };

    let mut groups = Vec::new();
    for range in chunks {
        let chunk = &processed[range];
        for component in cluster_chunk(chunk, config) {
            let mut members: Vec<&ProcessedLine> = component.iter().map(|&i| &chunk[i]).collect();
            sort_reading_order(&mut members, |l| l.bbox, rule);
            let indices: Vec<usize> = members.iter().map(|l| l.original_index).collect();
            if let Some(group) = Group::from_members(indices, lines) {
                groups.push(group);
            }
        }
    }

    debug!(
        initial = lines.len(),
        groups = groups.len(),
        "auto-merge finished"
    );
    groups
}
