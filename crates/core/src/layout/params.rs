//! Layout and fitting parameters.
//!
//! Contains the `Config` struct threaded through every clustering, merge and
//! fitting call. Field names serialize in camelCase so a settings object
//! exported by the overlay front end deserializes directly; unknown keys are
//! ignored and missing keys take their defaults.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Pixel height above which a page is clustered in vertical chunks.
pub const DEFAULT_CHUNK_MAX_HEIGHT: f64 = 3000.0;

/// Scale estimate used when a chunk has no usable line sizes at all.
pub const DEFAULT_FALLBACK_MEDIAN: f64 = 20.0;

/// Upper bound of the font-size binary search, in pixels.
pub const DEFAULT_FIT_CEILING: u32 = 200;

/// Shrink applied to the fit size of manually merged lines.
pub const DEFAULT_MERGED_SHRINK: f64 = 0.8;

/// Canonical-unit tolerance under which two positions count as equal when sorting.
pub const DEFAULT_SORT_TOLERANCE: f64 = 0.1;

/// Fraction of the average width under which two vertical lines share a column.
pub const DEFAULT_COLUMN_TOLERANCE: f64 = 0.8;

/// How the fitted orientation of a text box is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextOrientation {
    /// Use whichever orientation lets the text render larger.
    #[default]
    Smart,
    ForceHorizontal,
    ForceVertical,
}

impl FromStr for TextOrientation {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "smart" => Ok(TextOrientation::Smart),
            "forceHorizontal" | "force-horizontal" => Ok(TextOrientation::ForceHorizontal),
            "forceVertical" | "force-vertical" => Ok(TextOrientation::ForceVertical),
            other => Err(LayoutError::UnknownOrientation(other.to_string())),
        }
    }
}

/// Parameters for grouping, reading order and font fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// If false, every line becomes its own group.
    pub auto_merge_enabled: bool,

    /// Maximum gap along the reading axis, relative to the robust median
    /// line size of that orientation.
    pub auto_merge_dist_k: f64,

    /// Maximum size ratio between two lines of the same class.
    pub auto_merge_font_ratio: f64,

    /// Minimum perpendicular overlap, relative to the smaller line's extent.
    pub auto_merge_overlap_min: f64,

    /// Lines at or above this fraction of the median size are primary.
    pub auto_merge_min_line_ratio: f64,

    /// Maximum size ratio between a primary and a secondary line.
    pub auto_merge_font_ratio_for_mixed: f64,

    /// Minimum perpendicular overlap for a primary/secondary pair.
    pub auto_merge_mixed_min_overlap_ratio: f64,

    pub text_orientation: TextOrientation,
    pub font_multiplier_horizontal: f64,
    pub font_multiplier_vertical: f64,

    /// Pixels added to a box's width and height before fitting text into it.
    pub bounding_box_adjustment: f64,

    pub chunk_max_height: f64,
    pub fallback_median: f64,
    pub fit_ceiling: u32,
    pub merged_shrink: f64,
    pub sort_tolerance: f64,
    pub column_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_merge_enabled: true,
            auto_merge_dist_k: 1.3,
            auto_merge_font_ratio: 1.3,
            auto_merge_overlap_min: 0.1,
            auto_merge_min_line_ratio: 0.5,
            auto_merge_font_ratio_for_mixed: 1.1,
            auto_merge_mixed_min_overlap_ratio: 0.5,
            text_orientation: TextOrientation::Smart,
            font_multiplier_horizontal: 1.0,
            font_multiplier_vertical: 1.0,
            bounding_box_adjustment: 5.0,
            chunk_max_height: DEFAULT_CHUNK_MAX_HEIGHT,
            fallback_median: DEFAULT_FALLBACK_MEDIAN,
            fit_ceiling: DEFAULT_FIT_CEILING,
            merged_shrink: DEFAULT_MERGED_SHRINK,
            sort_tolerance: DEFAULT_SORT_TOLERANCE,
            column_tolerance: DEFAULT_COLUMN_TOLERANCE,
        }
    }
}

impl Config {
    /// Parses a JSON settings object and validates it.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects non-finite or negative thresholds and an empty chunk ceiling.
    pub fn validate(&self) -> Result<()> {
        let fields: [(&'static str, f64); 13] = [
            ("autoMergeDistK", self.auto_merge_dist_k),
            ("autoMergeFontRatio", self.auto_merge_font_ratio),
            ("autoMergeOverlapMin", self.auto_merge_overlap_min),
            ("autoMergeMinLineRatio", self.auto_merge_min_line_ratio),
            ("autoMergeFontRatioForMixed", self.auto_merge_font_ratio_for_mixed),
            (
                "autoMergeMixedMinOverlapRatio",
                self.auto_merge_mixed_min_overlap_ratio,
            ),
            ("fontMultiplierHorizontal", self.font_multiplier_horizontal),
            ("fontMultiplierVertical", self.font_multiplier_vertical),
            ("fallbackMedian", self.fallback_median),
            ("mergedShrink", self.merged_shrink),
            ("sortTolerance", self.sort_tolerance),
            ("columnTolerance", self.column_tolerance),
            ("chunkMaxHeight", self.chunk_max_height),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }
        if self.chunk_max_height == 0.0 {
            return Err(LayoutError::InvalidConfig {
                field: "chunkMaxHeight",
                value: self.chunk_max_height,
            });
        }
        // Padding may shrink a box, but not to NaN.
        if !self.bounding_box_adjustment.is_finite() {
            return Err(LayoutError::InvalidConfig {
                field: "boundingBoxAdjustment",
                value: self.bounding_box_adjustment,
            });
        }
        if self.fit_ceiling == 0 {
            return Err(LayoutError::InvalidConfig {
                field: "fitCeiling",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Font multiplier for the given orientation.
    pub fn font_multiplier(&self, vertical: bool) -> f64 {
        if vertical {
            self.font_multiplier_vertical
        } else {
            self.font_multiplier_horizontal
        }
    }
}
