//! fukidashi - speech-bubble grouping and font fitting for manga OCR overlays.
//!
//! Takes the text lines an OCR backend found on a page image and decides
//! which of them belong to the same bubble, in which order they read, and
//! how large their translated text can be drawn.

pub mod error;
pub mod fit;
pub mod geometry;
pub mod ingest;
pub mod layout;
pub mod overlay;
pub mod text;
pub mod types;

pub use error::{LayoutError, Result};
pub use fit::{Extent, FitResult, FontFitSizer, HeuristicMeasurer, TextMeasurer, WritingMode};
pub use geometry::{BBox, FracRect, ImageSize, Orientation};
pub use ingest::{Ingested, RawPage, Rejected, ingest_json, ingest_records};
pub use layout::{Config, TextOrientation, group_lines};
pub use overlay::{MergeOutcome, OverlayGroup, OverlayStore, PageOverlay};
pub use types::{Group, GroupId, LineId, LineMark, OcrLine};
