//! Segmentation-style text detection model (DBNet, LinkNet).
//!
//! The network is an opaque ONNX graph mapping a fixed-size page to a
//! per-pixel text probability map; box extraction happens in
//! [`DBPostProcess`].

use crate::core::config::OrtSessionConfig;
use crate::core::inference::OrtInfer;
use crate::core::{OCRError, OcrResult};
use crate::processors::{DBPostProcess, NormalizeImage, RelativeDetection, resize_exact};
use image::RgbImage;
use ndarray::{Array4, ArrayD, Axis, Ix3};
use rayon::prelude::*;
use std::path::Path;

/// Preprocessing configuration for a detection model.
#[derive(Debug, Clone, PartialEq)]
pub struct DBPreprocessConfig {
    /// Network input size as `(height, width)`.
    pub input_size: (u32, u32),
    /// Channel-wise normalization mean, on a `[0, 1]` scale.
    pub mean: [f32; 3],
    /// Channel-wise normalization std, on a `[0, 1]` scale.
    pub std: [f32; 3],
    /// Whether the graph emits raw logits that still need a sigmoid.
    pub output_is_logits: bool,
}

impl Default for DBPreprocessConfig {
    fn default() -> Self {
        Self {
            input_size: (1024, 1024),
            mean: [0.798, 0.785, 0.772],
            std: [0.264, 0.2749, 0.287],
            output_is_logits: true,
        }
    }
}

/// Text detection model producing relative word boxes per page.
#[derive(Debug)]
pub struct DBModel {
    inference: OrtInfer,
    normalizer: NormalizeImage,
    config: DBPreprocessConfig,
    postprocess: DBPostProcess,
}

impl DBModel {
    /// Creates a detection model around a loaded session.
    pub fn new(
        inference: OrtInfer,
        config: DBPreprocessConfig,
        postprocess: DBPostProcess,
    ) -> OcrResult<Self> {
        let normalizer = NormalizeImage::from_rgb_stats(config.mean, config.std)?;
        Ok(Self {
            inference,
            normalizer,
            config,
            postprocess,
        })
    }

    /// Resizes pages to the network input and stacks them into a batch.
    pub fn preprocess(&self, images: &[RgbImage]) -> OcrResult<Array4<f32>> {
        let (height, width) = self.config.input_size;
        let resized: Vec<RgbImage> = images
            .par_iter()
            .map(|img| resize_exact(img, width, height))
            .collect();
        self.normalizer
            .apply_batch(&resized, height as usize, width as usize)
    }

    /// Runs the network on a preprocessed batch.
    pub fn infer(&self, batch: &Array4<f32>) -> OcrResult<ArrayD<f32>> {
        self.inference.infer_4d(batch)
    }

    /// Converts raw network output into relative boxes, one list per page.
    ///
    /// Accepts `[N, 1, H, W]` and `[N, H, W]` outputs.
    pub fn postprocess(&self, output: ArrayD<f32>) -> OcrResult<Vec<Vec<RelativeDetection>>> {
        let shape = output.shape().to_vec();
        let maps = match shape.len() {
            4 if shape[1] == 1 => output.index_axis_move(Axis(1), 0),
            3 => output,
            _ => {
                return Err(OCRError::unexpected_output_shape(
                    self.inference.model_name(),
                    "[N, 1, H, W] or [N, H, W]",
                    &shape,
                ));
            }
        };
        let mut maps = maps.into_dimensionality::<Ix3>()?;
        if self.config.output_is_logits {
            maps.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp()));
        }

        Ok(maps
            .axis_iter(Axis(0))
            .map(|map| self.postprocess.apply(&map))
            .collect())
    }

    /// Runs the complete forward pass: preprocess -> infer -> postprocess.
    pub fn forward(&self, images: &[RgbImage]) -> OcrResult<Vec<Vec<RelativeDetection>>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        let batch = self.preprocess(images)?;
        let output = self.infer(&batch)?;
        let boxes = self.postprocess(output)?;
        tracing::debug!(
            "{}: {} boxes over {} pages",
            self.inference.model_name(),
            boxes.iter().map(Vec::len).sum::<usize>(),
            images.len()
        );
        Ok(boxes)
    }
}

/// Builder for [`DBModel`].
#[derive(Debug, Default)]
pub struct DBModelBuilder {
    model_name: Option<String>,
    preprocess_config: Option<DBPreprocessConfig>,
    postprocess: Option<DBPostProcess>,
    ort_config: Option<OrtSessionConfig>,
}

impl DBModelBuilder {
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
    pub fn preprocess_config(mut self, config: DBPreprocessConfig) -> Self {
        self.preprocess_config = Some(config);
        self
    }

    /// Sets the post-processing parameters.
    pub fn postprocess(mut self, postprocess: DBPostProcess) -> Self {
        self.postprocess = Some(postprocess);
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.ort_config = Some(config);
        self
    }

    /// Loads the model file and builds the detection model.
    pub fn build(self, model_path: &Path) -> OcrResult<DBModel> {
        let name = self
            .model_name
            .unwrap_or_else(|| "text_detection".to_string());
        let inference = OrtInfer::from_file(model_path, name, self.ort_config.as_ref())?;
        DBModel::new(
            inference,
            self.preprocess_config.unwrap_or_default(),
            self.postprocess.unwrap_or_default(),
        )
    }
}
