//! Error types for the fukidashi layout library.

use thiserror::Error;

/// Primary error type for ingestion and configuration.
///
/// The clustering, sorting and fitting paths are infallible; only the
/// boundary functions that accept external data return this error.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("line {index}: {reason}")]
    InvalidLine { index: usize, reason: String },

    #[error("invalid image dimensions: {width}x{height}")]
    InvalidImageSize { width: f64, height: f64 },

    #[error("unknown text orientation: {0}")]
    UnknownOrientation(String),

    #[error("invalid config value for {field}: {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    #[error("overlay lock poisoned")]
    LockPoisoned,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
