//! Layout analysis: from OCR lines to ordered reading groups.
//!
//! This module contains:
//! - Layout parameters (Config)
//! - Geometry normalization of OCR lines
//! - Vertical chunking of tall pages
//! - Union-find clustering with adaptive thresholds
//! - Reading-order sorting

pub mod chunk;
pub mod cluster;
pub mod normalize;
pub mod params;
pub mod sort;
pub mod stats;
pub mod union_find;

// Re-export params
pub use params::*;

pub use chunk::partition_chunks;
pub use cluster::{auto_merge, cluster_chunk, group_lines, should_merge};
pub use normalize::{ProcessedLine, normalize_line, normalize_lines};
pub use sort::{SortRule, compare_reading_order, sort_reading_order};
pub use stats::{LineScales, median, robust_median};
pub use union_find::UnionFind;
