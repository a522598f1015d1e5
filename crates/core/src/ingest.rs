//! Boundary validation of raw OCR records.
//!
//! Records are validated one by one: a malformed record is excluded from the
//! batch and reported, the rest of the page still clusters normally.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{LayoutError, Result};
use crate::geometry::{FracRect, ImageSize};
use crate::types::OcrLine;

#[derive(Debug, Default, Deserialize)]
struct RawBox {
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawLine {
    text: Option<String>,
    #[serde(rename = "tightBoundingBox")]
    tight_bounding_box: Option<RawBox>,
}

/// A record excluded at ingestion.
#[derive(Debug)]
pub struct Rejected {
    pub index: usize,
    pub error: LayoutError,
}

/// Result of validating a batch of records.
#[derive(Debug, Default)]
pub struct Ingested {
    pub lines: Vec<OcrLine>,
    pub rejected: Vec<Rejected>,
}

/// A page as delivered by the OCR collaborator.
///
/// Missing or zero dimensions mean the image size is not known yet.
#[derive(Debug, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub lines: Vec<Value>,
}

impl RawPage {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    /// Natural pixel size, rounded to whole pixels.
    pub fn size(&self) -> Result<ImageSize> {
        let valid = |v: f64| v.is_finite() && v >= 0.0 && v <= u32::MAX as f64;
        if !valid(self.width) || !valid(self.height) {
            return Err(LayoutError::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(ImageSize::new(
            self.width.round() as u32,
            self.height.round() as u32,
        ))
    }

    /// Validates the page's records, consuming the page.
    pub fn ingest(self) -> Result<(ImageSize, Ingested)> {
        let size = self.size()?;
        Ok((size, ingest_records(self.lines)))
    }
}

fn invalid(index: usize, reason: impl Into<String>) -> LayoutError {
    LayoutError::InvalidLine {
        index,
        reason: reason.into(),
    }
}

/// Validates a single raw record.
pub fn validate_record(index: usize, value: Value) -> Result<OcrLine> {
    let raw: RawLine = serde_json::from_value(value).map_err(|e| invalid(index, e.to_string()))?;
    let text = raw.text.ok_or_else(|| invalid(index, "missing text"))?;
    let b = raw
        .tight_bounding_box
        .ok_or_else(|| invalid(index, "missing tightBoundingBox"))?;
    let field = |name: &str, v: Option<f64>| -> Result<f64> {
        match v {
            Some(v) if v.is_finite() => Ok(v),
            Some(_) => Err(invalid(index, format!("non-finite {name}"))),
            None => Err(invalid(index, format!("missing {name}"))),
        }
    };
    let rect = FracRect::new(
        field("x", b.x)?,
        field("y", b.y)?,
        field("width", b.width)?,
        field("height", b.height)?,
    );
    if rect.width < 0.0 || rect.height < 0.0 {
        return Err(invalid(index, "negative box size"));
    }
    Ok(OcrLine::new(text, rect))
}

/// Validates a batch, keeping input order among the accepted lines.
pub fn ingest_records(values: Vec<Value>) -> Ingested {
    let mut out = Ingested::default();
    for (index, value) in values.into_iter().enumerate() {
        match validate_record(index, value) {
            Ok(line) => out.lines.push(line),
            Err(error) => {
                warn!(index, %error, "rejecting OCR record");
                out.rejected.push(Rejected { index, error });
            }
        }
    }
    out
}

/// Parses a JSON array of records and validates each one.
pub fn ingest_json(s: &str) -> Result<Ingested> {
    let values: Vec<Value> = serde_json::from_str(s)?;
    Ok(ingest_records(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_records_are_excluded() {
        let ingested = ingest_records(vec![
            json!({"text": "a", "tightBoundingBox": {"x": 0.1, "y": 0.1, "width": 0.2, "height": 0.05}}),
            json!({"text": "b", "tightBoundingBox": {"x": 0.1, "y": 0.1, "width": 0.2}}),
            json!({"tightBoundingBox": {"x": 0.1, "y": 0.1, "width": 0.2, "height": 0.05}}),
            json!({"text": "d", "tightBoundingBox": {"x": "left", "y": 0.1, "width": 0.2, "height": 0.05}}),
            json!({"text": "e", "tightBoundingBox": {"x": 0.3, "y": 0.4, "width": 0.2, "height": 0.05}}),
        ]);
        assert_eq!(ingested.lines.len(), 2);
        assert_eq!(ingested.lines[0].text, "a");
        assert_eq!(ingested.lines[1].text, "e");
        let rejected: Vec<usize> = ingested.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 2, 3]);
    }

    #[test]
    fn negative_size_is_rejected() {
        let err = validate_record(
            7,
            json!({"text": "x", "tightBoundingBox": {"x": 0.1, "y": 0.1, "width": -0.2, "height": 0.05}}),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidLine { index: 7, .. }));
    }

    #[test]
    fn raw_page_defaults_unknown_size() {
        let page = RawPage::from_json_str(r#"{"lines": []}"#).unwrap();
        assert!(!page.size().unwrap().is_known());
    }

    #[test]
    fn raw_page_rejects_negative_size() {
        let page = RawPage::from_json_str(r#"{"width": -5, "height": 100, "lines": []}"#).unwrap();
        assert!(matches!(
            page.size(),
            Err(LayoutError::InvalidImageSize { .. })
        ));
    }

    #[test]
    fn raw_page_ingests_lines() {
        let page = RawPage::from_json_str(
            r#"{"width": 800, "height": 1200, "lines": [
                {"text": "a", "tightBoundingBox": {"x": 0.1, "y": 0.1, "width": 0.2, "height": 0.05}},
                {"text": "b"}
            ]}"#,
        )
        .unwrap();
        let (size, ingested) = page.ingest().unwrap();
        assert_eq!(size, ImageSize::new(800, 1200));
        assert_eq!(ingested.lines.len(), 1);
        assert_eq!(ingested.rejected.len(), 1);
    }
}
