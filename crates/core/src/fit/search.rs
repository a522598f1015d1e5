//! Binary-search font fitting and orientation choice.

use crate::geometry::Orientation;
use crate::layout::params::{Config, TextOrientation};
use crate::types::LineMark;

use super::measure::{Extent, TextMeasurer, WritingMode};

/// Smallest size the search can return.
pub const FIT_FLOOR: u32 = 1;

/// Largest integer size in `1..=ceiling` whose rendered text fits.
///
/// Horizontal probes must fit `available.width`, vertical probes
/// `available.height`. Returns [`FIT_FLOOR`] when nothing fits. Assumes the
/// measured extent grows with the font size.
pub fn best_fit_size<M>(
    measurer: &mut M,
    text: &str,
    available: Extent,
    mode: WritingMode,
    ceiling: u32,
) -> u32
where
    M: TextMeasurer + ?Sized,
{
    let mut low = FIT_FLOOR;
    let mut high = ceiling;
    let mut best = FIT_FLOOR;
    while low <= high {
        let mid = low + (high - low) / 2;
        let extent = measurer.measure(text, mid, mode);
        let fits = match mode {
            WritingMode::HorizontalTb => extent.width <= available.width,
            WritingMode::VerticalRl => extent.height <= available.height,
        };
        if fits {
            best = mid;
            match mid.checked_add(1) {
                Some(next) => low = next,
                None => break,
            }
        } else {
            high = mid - 1;
        }
    }
    best
}

/// Outcome of fitting one text box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    /// Final pixel size, multiplier applied.
    pub font_size: f64,
    pub orientation: Orientation,
    /// Fit sizes of both probes, merged shrink applied, multiplier not.
    pub horizontal_fit: f64,
    pub vertical_fit: f64,
}

/// Sizes text boxes against one measurement surface.
pub struct FontFitSizer<'c, M> {
    measurer: M,
    config: &'c Config,
}

impl<'c, M: TextMeasurer> FontFitSizer<'c, M> {
    pub fn new(measurer: M, config: &'c Config) -> Self {
        Self { measurer, config }
    }

    pub fn measurer_mut(&mut self) -> &mut M {
        &mut self.measurer
    }

    pub fn into_inner(self) -> M {
        self.measurer
    }

    /// Fits `text` into a rendered box of `box_width` x `box_height` pixels.
    ///
    /// Returns None for empty text or a box with no room after padding;
    /// such boxes are left unstyled.
    pub fn fit(
        &mut self,
        text: &str,
        box_width: f64,
        box_height: f64,
        mark: LineMark,
    ) -> Option<FitResult> {
        let available = Extent::new(
            box_width + self.config.bounding_box_adjustment,
            box_height + self.config.bounding_box_adjustment,
        );
        if text.is_empty() || !(available.width > 0.0 && available.height > 0.0) {
            return None;
        }

        let ceiling = self.config.fit_ceiling;
        let shrink = if mark.is_merged() {
            self.config.merged_shrink
        } else {
            1.0
        };
        let horizontal_fit = best_fit_size(
            &mut self.measurer,
            text,
            available,
            WritingMode::HorizontalTb,
            ceiling,
        ) as f64
            * shrink;
        let vertical_fit = best_fit_size(
            &mut self.measurer,
            text,
            available,
            WritingMode::VerticalRl,
            ceiling,
        ) as f64
            * shrink;

        let orientation = if mark.forces_vertical() {
            Orientation::Vertical
        } else {
            match self.config.text_orientation {
                TextOrientation::ForceVertical => Orientation::Vertical,
                TextOrientation::ForceHorizontal => Orientation::Horizontal,
                TextOrientation::Smart if vertical_fit > horizontal_fit => Orientation::Vertical,
                TextOrientation::Smart => Orientation::Horizontal,
            }
        };
        let fit = match orientation {
            Orientation::Vertical => vertical_fit,
            Orientation::Horizontal => horizontal_fit,
        };
        Some(FitResult {
            font_size: fit * self.config.font_multiplier(orientation.is_vertical()),
            orientation,
            horizontal_fit,
            vertical_fit,
        })
    }
}
