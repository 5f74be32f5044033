//! Error kinds raised while processing a single station map.
//!
//! Every variant aborts the current image only. The batch driver catches
//! them at the per-image boundary and records the failure.

use std::io;
use thiserror::Error;

/// Direction in which a platform band was being grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowDirection {
    Up,
    Down,
}

impl std::fmt::Display for GrowDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowDirection::Up => write!(f, "up"),
            GrowDirection::Down => write!(f, "down"),
        }
    }
}

/// Errors produced by the segmentation and correlation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no pixels matched while extracting {what}")]
    EmptyMask { what: &'static str },

    #[error("platform band grew {direction} past row {row} (mask has {height} rows)")]
    RowGrowthOutOfRange {
        row: i64,
        height: u32,
        direction: GrowDirection,
    },

    #[error("no OCR line contains {query:?}")]
    NoMatch { query: String },

    #[error("OCR position {position:.1} does not fall in any detected section")]
    NoSection { position: f64 },

    #[error("OCR failed: {0}")]
    OcrProcess(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PipelineError {
    /// Short, stable identifier used in failure records.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::EmptyMask { .. } => "EmptyMask",
            PipelineError::RowGrowthOutOfRange { .. } => "RowGrowthOutOfRange",
            PipelineError::NoMatch { .. } => "NoMatch",
            PipelineError::NoSection { .. } => "NoSection",
            PipelineError::OcrProcess(_) => "OcrProcess",
            PipelineError::Image(_) => "Image",
            PipelineError::Io(_) => "Io",
        }
    }
}
