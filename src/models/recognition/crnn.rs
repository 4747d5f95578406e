//! CRNN text recognition model with CTC output.

use crate::core::config::OrtSessionConfig;
use crate::core::inference::OrtInfer;
use crate::core::{OCRError, OcrResult};
use crate::processors::{CTCLabelDecode, NormalizeImage, resize_keep_ratio};
use image::RgbImage;
use ndarray::{Array4, ArrayD, Ix3};
use rayon::prelude::*;
use std::path::Path;

/// Preprocessing configuration for CRNN models.
#[derive(Debug, Clone, PartialEq)]
pub struct CRNNPreprocessConfig {
    /// Network input size as `(height, width)`.
    pub input_size: (u32, u32),
    /// Channel-wise normalization mean, on a `[0, 1]` scale.
    pub mean: [f32; 3],
    /// Channel-wise normalization std, on a `[0, 1]` scale.
    pub std: [f32; 3],
}

impl Default for CRNNPreprocessConfig {
    fn default() -> Self {
        Self {
            input_size: (32, 128),
            mean: [0.694, 0.695, 0.693],
            std: [0.299, 0.296, 0.301],
        }
    }
}

/// Word-crop recognizer.
#[derive(Debug)]
pub struct CRNNModel {
    inference: OrtInfer,
    normalizer: NormalizeImage,
    config: CRNNPreprocessConfig,
    decoder: CTCLabelDecode,
}

impl CRNNModel {
    /// Creates a recognition model around a loaded session.
    pub fn new(
        inference: OrtInfer,
        config: CRNNPreprocessConfig,
        vocab: &str,
    ) -> OcrResult<Self> {
        let normalizer = NormalizeImage::from_rgb_stats(config.mean, config.std)?;
        Ok(Self {
            inference,
            normalizer,
            config,
            decoder: CTCLabelDecode::new(vocab),
        })
    }

    /// Resizes crops into the input slot and stacks them, right- and
    /// bottom-padded.
    pub fn preprocess(&self, crops: &[RgbImage]) -> OcrResult<Array4<f32>> {
        let (height, width) = self.config.input_size;
        let resized: Vec<RgbImage> = crops
            .par_iter()
            .map(|crop| resize_keep_ratio(crop, width, height))
            .collect();
        self.normalizer
            .apply_batch(&resized, height as usize, width as usize)
    }

    /// Decodes `[N, T, C]` logits; `[N, C, T]` is transposed first.
    pub fn postprocess(&self, output: ArrayD<f32>) -> OcrResult<Vec<(String, f32)>> {
        let shape = output.shape().to_vec();
        let logits = output.into_dimensionality::<Ix3>().map_err(|_| {
            OCRError::unexpected_output_shape(self.inference.model_name(), "[N, T, C]", &shape)
        })?;

        let classes = self.decoder.num_classes();
        let logits = if shape[2] != classes && shape[1] == classes {
            logits.permuted_axes([0, 2, 1])
        } else {
            logits
        };
        self.decoder.decode(&logits.view())
    }

    /// Recognizes one batch of crops.
    pub fn forward(&self, crops: &[RgbImage]) -> OcrResult<Vec<(String, f32)>> {
        if crops.is_empty() {
            return Ok(Vec::new());
        }
        let batch = self.preprocess(crops)?;
        let output = self.inference.infer_4d(&batch)?;
        let words = self.postprocess(output)?;
        if words.len() != crops.len() {
            return Err(OCRError::invalid_input(format!(
                "{} returned {} words for {} crops",
                self.inference.model_name(),
                words.len(),
                crops.len()
            )));
        }
        Ok(words)
    }
}

/// Builder for [`CRNNModel`].
#[derive(Debug, Default)]
pub struct CRNNModelBuilder {
    model_name: Option<String>,
    preprocess_config: Option<CRNNPreprocessConfig>,
    vocab: Option<String>,
    ort_config: Option<OrtSessionConfig>,
}

impl CRNNModelBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name used in logs and errors.
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Sets the preprocessing configuration.
    pub fn preprocess_config(mut self, config: CRNNPreprocessConfig) -> Self {
        self.preprocess_config = Some(config);
        self
    }

    /// Sets the character vocabulary. Defaults to the French vocabulary.
    pub fn vocab(mut self, vocab: impl Into<String>) -> Self {
        self.vocab = Some(vocab.into());
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.ort_config = Some(config);
        self
    }

    /// Loads the model file and builds the recognition model.
    pub fn build(self, model_path: &Path) -> OcrResult<CRNNModel> {
        let name = self
            .model_name
            .unwrap_or_else(|| "text_recognition".to_string());
        let inference = OrtInfer::from_file(model_path, name, self.ort_config.as_ref())?;
        let vocab = self.vocab.unwrap_or_else(super::vocabs::french);
        CRNNModel::new(
            inference,
            self.preprocess_config.unwrap_or_default(),
            &vocab,
        )
    }
}
