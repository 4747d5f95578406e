//! The core module of the evaluation pipeline.
//!
//! This module contains the building blocks shared by the predictor, the
//! dataset readers and the metrics:
//! - Configuration of ONNX Runtime sessions
//! - Error handling
//! - The inference session wrapper

pub mod config;
pub mod errors;
pub mod inference;

pub use config::{OrtExecutionProvider, OrtSessionConfig, parse_device_config};
pub use errors::{OCRError, OcrResult, ProcessingStage};
pub use inference::OrtInfer;
