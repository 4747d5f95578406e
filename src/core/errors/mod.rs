//! Error handling for the evaluation pipeline.

mod types;

pub use types::{OCRError, OcrResult, ProcessingStage};
