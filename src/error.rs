use std::path::PathBuf;
use thiserror::Error;

use crate::check::CheckReport;

/// Boxed error returned by an external inference engine.
pub type InferenceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for quantclass operations.
#[derive(Debug, Error)]
pub enum QuantclassError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Resampling failed: {0}")]
    ResamplingFailed(String),

    #[error("Image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Label count mismatch: {scores} score(s) but {labels} label(s)")]
    LabelCountMismatch { scores: usize, labels: usize },

    #[error("Inference failed: {0}")]
    InferenceFailed(#[source] InferenceError),

    #[error("Invalid tensor shape {shape:?}: {message}")]
    InvalidShape { shape: [usize; 4], message: String },

    #[error("Unsupported element type '{0}' (supported: uint8)")]
    UnsupportedElementType(String),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageProbe {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to parse model descriptor {path}: {message}")]
    DescriptorParse { path: PathBuf, message: String },

    #[error("Failed to read label file {path}: {source}")]
    LabelFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration check failed with {error_count} error(s) and {warning_count} warning(s)")]
    CheckFailed {
        error_count: usize,
        warning_count: usize,
        report: CheckReport,
    },

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
