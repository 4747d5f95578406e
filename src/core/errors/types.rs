//! Core error types for the evaluation pipeline.
//!
//! This module defines the `OCRError` enum used by every stage of an evaluation
//! run (dataset loading, inference, metric accumulation) together with the
//! `ProcessingStage` enum that gives processing failures their context.

use std::path::PathBuf;
use thiserror::Error;

/// Enum representing different stages of processing in the evaluation pipeline.
///
/// This enum is used to identify which stage an error occurred in,
/// providing context for debugging and error handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred while normalizing images into a batch.
    Normalization,
    /// Error occurred while decoding model outputs.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Enum representing the errors that can occur during an evaluation run.
///
/// None of these are recovered from: the binary reports the error chain
/// and exits with a non-zero status.
#[derive(Error, Debug)]
pub enum OCRError {
    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error occurred during inference.
    #[error("inference failed in model '{model_name}': {context}")]
    Inference {
        /// The name of the model where inference failed.
        model_name: String,
        /// Additional context about the inference error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error reading or validating a dataset.
    #[error("dataset '{}': {message}", path.display())]
    Dataset {
        /// Image folder or label file the error relates to.
        path: PathBuf,
        /// A message describing the dataset error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from basic tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// Error writing a report as JSON.
    #[error("json")]
    Json(#[from] serde_json::Error),

    /// Error loading a model file, with context and suggestions.
    #[error("model load failed for '{model_path}': {reason}{suggestion}")]
    ModelLoad {
        /// Path to the model that failed to load
        model_path: String,
        /// Short reason string
        reason: String,
        /// Optional suggestion (prefixed with '; ' when present)
        suggestion: String,
        /// Underlying source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<image::ImageError> for OCRError {
    /// Converts an image::ImageError to OCRError::ImageLoad.
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

/// Convenience alias used across the crate.
pub type OcrResult<T> = Result<T, OCRError>;

impl OCRError {
    /// Creates a configuration error with enhanced context and details.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use oar_ocr_eval::core::errors::OCRError;
    /// let err = OCRError::config_error_detailed(
    ///     "dataset selection",
    ///     "--img_folder requires --label_file"
    /// );
    /// assert!(matches!(err, OCRError::ConfigError { .. }));
    /// ```
    pub fn config_error_detailed(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ConfigError {
            message: format!("{}: {}", context.into(), details.into()),
        }
    }

    /// Creates a configuration error with a suggestion for recovery.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use oar_ocr_eval::core::errors::OCRError;
    /// let err = OCRError::config_error_with_suggestion(
    ///     "model loading",
    ///     "model file not found at 'models/db_resnet50.onnx'",
    ///     "export the model to ONNX and place it in the models directory"
    /// );
    /// assert!(matches!(err, OCRError::ConfigError { .. }));
    /// ```
    pub fn config_error_with_suggestion(
        context: impl Into<String>,
        details: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::ConfigError {
            message: format!(
                "{}: {}; suggestion: {}",
                context.into(),
                details.into(),
                suggestion.into()
            ),
        }
    }

    /// Creates a configuration error for invalid field values.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ConfigError {
            message: format!(
                "invalid value for field '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual.into()
            ),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a dataset error for the given path.
    pub fn dataset(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Dataset {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a normalization error without an underlying source.
    pub fn normalization_error(context: impl Into<String>) -> Self {
        Self::Processing {
            kind: ProcessingStage::Normalization,
            context: context.into(),
            source: None,
        }
    }

    /// Creates a tensor shape error raised while decoding model outputs.
    pub fn unexpected_output_shape(
        model_name: impl Into<String>,
        expected: impl Into<String>,
        actual: &[usize],
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::PostProcessing,
            context: format!(
                "model '{}' produced output shape {:?}, expected {}",
                model_name.into(),
                actual,
                expected.into()
            ),
            source: None,
        }
    }

    /// Wraps an ONNX Runtime failure with the model it happened in.
    pub fn inference_error(
        model_name: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            context: context.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_error_mentions_path() {
        let err = OCRError::dataset("/data/FUNSD/labels.json", "missing image 'a.png'");
        let message = err.to_string();
        assert!(message.contains("/data/FUNSD/labels.json"));
        assert!(message.contains("missing image 'a.png'"));
    }

    #[test]
    fn test_invalid_field_message() {
        let err = OCRError::invalid_field("iou", "a value in [0, 1]", "1.5");
        assert_eq!(
            err.to_string(),
            "configuration: invalid value for field 'iou': expected a value in [0, 1], got 1.5"
        );
    }

    #[test]
    fn test_processing_stage_display() {
        let err = OCRError::normalization_error("image 5x2 does not fit batch slot 4x4");
        assert_eq!(
            err.to_string(),
            "normalization failed: image 5x2 does not fit batch slot 4x4"
        );
    }

    #[test]
    fn test_json_error_keeps_its_source() {
        fn render(value: f64) -> OcrResult<String> {
            Ok(serde_json::to_string(&std::collections::BTreeMap::from([(
                vec![value],
                1,
            )]))?)
        }

        let err = render(0.5).unwrap_err();
        assert!(matches!(err, OCRError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
