//! ONNX Runtime session wrapper shared by the detection and recognition models.

mod ort_infer_config;

use crate::core::config::OrtSessionConfig;
use crate::core::errors::{OCRError, OcrResult};
use ndarray::{Array4, ArrayD, IxDyn};
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

/// A loaded ONNX model with a single image input.
///
/// The session is kept behind a mutex so that models can be driven through
/// shared references.
pub struct OrtInfer {
    session: Mutex<Session>,
    model_name: String,
    input_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .finish()
    }
}

impl OrtInfer {
    /// Loads a model from disk, applying the optional session configuration.
    pub fn from_file(
        model_path: &Path,
        model_name: impl Into<String>,
        config: Option<&OrtSessionConfig>,
    ) -> OcrResult<Self> {
        let model_name = model_name.into();
        if !model_path.is_file() {
            return Err(OCRError::ModelLoad {
                model_path: model_path.display().to_string(),
                reason: "file does not exist".to_string(),
                suggestion: "; export the model to ONNX and place it in the models directory"
                    .to_string(),
                source: None,
            });
        }

        let mut builder = Session::builder()?;
        if let Some(cfg) = config {
            builder = Self::apply_ort_config(builder, cfg)?;
        }

        let session = builder
            .commit_from_file(model_path)
            .map_err(|e| OCRError::ModelLoad {
                model_path: model_path.display().to_string(),
                reason: "ONNX Runtime rejected the model".to_string(),
                suggestion: String::new(),
                source: Some(Box::new(e)),
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| OCRError::ModelLoad {
                model_path: model_path.display().to_string(),
                reason: "model declares no inputs".to_string(),
                suggestion: String::new(),
                source: None,
            })?;

        tracing::info!(
            "Loaded model '{}' from {} (input '{}')",
            model_name,
            model_path.display(),
            input_name
        );

        Ok(Self {
            session: Mutex::new(session),
            model_name,
            input_name,
        })
    }

    /// Name used for this model in logs and errors.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Runs the model on a batch of NCHW images and returns its first output.
    pub fn infer_4d(&self, input: &Array4<f32>) -> OcrResult<ArrayD<f32>> {
        let shape = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_array((shape.as_slice(), data)).map_err(|e| {
            OCRError::inference_error(
                &self.model_name,
                format!("building input tensor of shape {shape:?}"),
                e,
            )
        })?;

        let mut session = self.session.lock().map_err(|_| {
            OCRError::invalid_input(format!(
                "session for model '{}' is poisoned",
                self.model_name
            ))
        })?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| {
                OCRError::inference_error(
                    &self.model_name,
                    format!("forward pass on input shape {shape:?}"),
                    e,
                )
            })?;

        let (out_shape, out_data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            OCRError::inference_error(&self.model_name, "extracting f32 output", e)
        })?;
        let dims: Vec<usize> = out_shape.iter().map(|&d| d.max(0) as usize).collect();

        tracing::debug!(
            "Model '{}' mapped input {:?} to output {:?}",
            self.model_name,
            shape,
            dims
        );

        Ok(ArrayD::from_shape_vec(IxDyn(&dims), out_data.to_vec())?)
    }
}
