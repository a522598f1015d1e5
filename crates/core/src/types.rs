//! Line and group records exchanged with the OCR backend and the renderer.

use serde::{Deserialize, Serialize};

use crate::geometry::{FracRect, ImageSize, Orientation};

/// One recognized line of text as reported by the OCR backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
    #[serde(rename = "tightBoundingBox")]
    pub tight_bounding_box: FracRect,
}

impl OcrLine {
    pub fn new(text: impl Into<String>, tight_bounding_box: FracRect) -> Self {
        Self {
            text: text.into(),
            tight_bounding_box,
        }
    }
}

/// A reading group produced by auto-merge.
///
/// `members` index into the line slice the group was built from, in reading
/// order; `bbox` is the union of the members' tight boxes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub members: Vec<usize>,
    pub bbox: FracRect,
}

impl Group {
    /// Single-line group.
    pub fn singleton(index: usize, line: &OcrLine) -> Self {
        Self {
            members: vec![index],
            bbox: line.tight_bounding_box,
        }
    }

    /// Builds a group from ordered member indices into `lines`.
    ///
    /// Returns None when `members` is empty.
    pub fn from_members(members: Vec<usize>, lines: &[OcrLine]) -> Option<Self> {
        let bbox = FracRect::union_all(members.iter().map(|&i| &lines[i].tight_bounding_box))?;
        Some(Self { members, bbox })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Orientation implied by the group box's pixel aspect.
    pub fn orientation(&self, size: ImageSize) -> Orientation {
        self.bbox.orientation(size)
    }
}

/// How a line in a page overlay came to be in its group.
///
/// Lines of a manually merged group carry the merged group's orientation so
/// the font fitter can honor it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LineMark {
    #[default]
    Plain,
    MergedAnchor(Orientation),
}

impl LineMark {
    pub fn is_merged(self) -> bool {
        matches!(self, LineMark::MergedAnchor(_))
    }

    /// True when a manual merge pinned the line vertical.
    pub fn forces_vertical(self) -> bool {
        matches!(self, LineMark::MergedAnchor(Orientation::Vertical))
    }
}

/// Stable handle of a line within one page overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineId(pub u32);

/// Stable handle of a group within one page overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupId(pub u32);
