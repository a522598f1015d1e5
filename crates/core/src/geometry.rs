//! Geometric primitives.
//!
//! Two coordinate spaces are in play:
//! - `FracRect`: image-fraction coordinates (0..1, origin top-left) as the
//!   OCR backend reports them and as the renderer consumes them.
//! - `BBox`: the canonical space, where the image width maps to
//!   [`NORMALIZED_WIDTH`] units and the height keeps the image aspect.

use serde::{Deserialize, Serialize};

/// Width of the canonical coordinate space.
pub const NORMALIZED_WIDTH: f64 = 1000.0;

/// Writing orientation of a line or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Orientation implied by a box's aspect: strictly taller than wide is vertical.
    pub fn from_aspect(width: f64, height: f64) -> Self {
        if height > width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }
}

/// Natural pixel size of a page image. Zero in either dimension means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Scale factor from pixels to canonical units.
    pub fn norm_scale(&self) -> f64 {
        NORMALIZED_WIDTH / self.width as f64
    }
}

/// A rectangle in image-fraction coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FracRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FracRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Smallest rectangle enclosing every rectangle in `rects`.
    ///
    /// Returns None for an empty input.
    pub fn union_all<'a, I>(rects: I) -> Option<FracRect>
    where
        I: IntoIterator<Item = &'a FracRect>,
    {
        let mut x0 = f64::INFINITY;
        let mut top = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        let mut any = false;
        for r in rects {
            any = true;
            x0 = x0.min(r.x);
            top = top.min(r.y);
            x1 = x1.max(r.right());
            bottom = bottom.max(r.bottom());
        }
        any.then(|| FracRect::new(x0, top, x1 - x0, bottom - top))
    }

    /// This rectangle expressed as fractions of `outer`'s position and size.
    ///
    /// Returns None when `outer` has no area.
    pub fn relative_to(&self, outer: &FracRect) -> Option<FracRect> {
        if !outer.has_area() {
            return None;
        }
        Some(FracRect::new(
            (self.x - outer.x) / outer.width,
            (self.y - outer.y) / outer.height,
            self.width / outer.width,
            self.height / outer.height,
        ))
    }

    /// Canonical-space box for this rectangle on an image of `size`.
    pub fn to_canonical(&self, size: ImageSize) -> BBox {
        let w = size.width as f64;
        let h = size.height as f64;
        let scale = size.norm_scale();
        let x0 = self.x * w * scale;
        let top = self.y * h * scale;
        BBox {
            x0,
            top,
            x1: x0 + self.width * w * scale,
            bottom: top + self.height * h * scale,
        }
    }

    /// Orientation implied by this rectangle's pixel aspect on an image of `size`.
    pub fn orientation(&self, size: ImageSize) -> Orientation {
        Orientation::from_aspect(
            self.width * size.width as f64,
            self.height * size.height as f64,
        )
    }
}

/// A canonical-space box stored as edges, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f64 {
        self.x0 + self.width() / 2.0
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Horizontal gap between the two boxes, zero when they overlap.
    pub fn hgap(&self, other: &BBox) -> f64 {
        (self.x0.max(other.x0) - self.x1.min(other.x1)).max(0.0)
    }

    /// Vertical gap between the two boxes, zero when they overlap.
    pub fn vgap(&self, other: &BBox) -> f64 {
        (self.top.max(other.top) - self.bottom.min(other.bottom)).max(0.0)
    }

    /// Length of the shared horizontal span, zero when disjoint.
    pub fn hoverlap(&self, other: &BBox) -> f64 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Length of the shared vertical span, zero when disjoint.
    pub fn voverlap(&self, other: &BBox) -> f64 {
        (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0)
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_aspect(self.width(), self.height())
    }

    /// Back-projects this canonical box to image fractions.
    pub fn to_frac(&self, size: ImageSize) -> FracRect {
        let w = size.width as f64;
        let h = size.height as f64;
        let scale = size.norm_scale();
        FracRect::new(
            self.x0 / scale / w,
            self.top / scale / h,
            self.width() / scale / w,
            self.height() / scale / h,
        )
    }
}
