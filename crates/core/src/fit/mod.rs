//! Font fitting: the largest pixel size at which a text box's content fits.

pub mod measure;
pub mod search;

pub use measure::{Extent, HeuristicMeasurer, TextMeasurer, WritingMode};
pub use search::{FIT_FLOOR, FitResult, FontFitSizer, best_fit_size};
