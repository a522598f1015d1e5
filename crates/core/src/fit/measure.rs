//! Text measurement capability.
//!
//! The fitter never lays text out itself: it asks a [`TextMeasurer`] how big
//! a string renders at a given pixel size. A renderer plugs in its real
//! layout engine; [`HeuristicMeasurer`] is a dependency-free approximation.

use crate::geometry::Orientation;
use crate::text::ANCHOR_MARKER;

/// CSS-style writing mode of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritingMode {
    HorizontalTb,
    VerticalRl,
}

impl From<Orientation> for WritingMode {
    fn from(o: Orientation) -> Self {
        match o {
            Orientation::Horizontal => WritingMode::HorizontalTb,
            Orientation::Vertical => WritingMode::VerticalRl,
        }
    }
}

/// Rendered size of a probe, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measures rendered text.
///
/// `text` may contain `\n` line breaks (merged content). Takes `&mut self`
/// because real measurement surfaces are mutated by every probe.
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, font_size_px: u32, mode: WritingMode) -> Extent;
}

impl<F> TextMeasurer for F
where
    F: FnMut(&str, u32, WritingMode) -> Extent,
{
    fn measure(&mut self, text: &str, font_size_px: u32, mode: WritingMode) -> Extent {
        self(text, font_size_px, mode)
    }
}

fn is_wide(ch: char) -> bool {
    matches!(ch,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}'
        | '\u{20000}'..='\u{3FFFD}')
}

/// Approximate advance of `ch` in em.
fn char_advance_em(ch: char) -> f64 {
    if ch == ANCHOR_MARKER {
        return 0.1;
    }
    if matches!(ch, '\u{200B}'..='\u{200D}' | '\u{FEFF}') {
        return 0.0;
    }
    if is_wide(ch) {
        return 1.0;
    }
    match ch {
        ' ' => 0.33,
        '.' | ',' | ':' | ';' | '!' | '\'' => 0.28,
        '(' | ')' | '[' | ']' | '{' | '}' | '/' | '-' | '_' => 0.33,
        '?' => 0.5,
        '0'..='9' => 0.56,
        'I' => 0.30,
        'W' => 0.85,
        'A'..='Z' => 0.60,
        'i' | 'l' => 0.28,
        'm' | 'w' => 0.78,
        'a'..='z' => 0.5,
        _ => 0.6,
    }
}

/// Glyph-class based measurer.
///
/// Full-width (CJK) glyphs advance 1em, Latin glyphs use per-class widths.
/// In vertical mode every glyph advances down the column by the same amount
/// it would advance across a horizontal line. Lines stack at `line_height`
/// em.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMeasurer {
    pub line_height: f64,
}

impl Default for HeuristicMeasurer {
    fn default() -> Self {
        Self { line_height: 1.2 }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&mut self, text: &str, font_size_px: u32, mode: WritingMode) -> Extent {
        if text.is_empty() {
            return Extent::default();
        }
        let size = font_size_px as f64;
        let mut lines = 0usize;
        let mut longest = 0.0f64;
        for line in text.split('\n') {
            lines += 1;
            let advance: f64 = line.chars().map(char_advance_em).sum();
            longest = longest.max(advance);
        }
        let along = longest * size;
        let across = lines as f64 * size * self.line_height;
        match mode {
            WritingMode::HorizontalTb => Extent::new(along, across),
            WritingMode::VerticalRl => Extent::new(across, along),
        }
    }
}
