//! Image normalization for model inputs.
//!
//! Converts RGB images into NCHW `f32` batches, applying the per-channel
//! `(pixel * scale - mean) / std` normalization each architecture was
//! trained with.

use crate::core::OCRError;
use image::RgbImage;
use ndarray::{Array3, Array4, s};
use rayon::prelude::*;

/// Normalizes images for model inference.
///
/// Normalization is stored as `alpha = scale / std` and `beta = -mean / std`
/// so that each pixel costs a single multiply-add.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std)
    pub alpha: [f32; 3],
    /// Offset values for each channel (beta = -mean / std)
    pub beta: [f32; 3],
}

impl NormalizeImage {
    /// Creates a new normalizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the scale or any standard deviation is not strictly
    /// positive, or if any resulting coefficient is not finite.
    pub fn new(scale: f32, mean: [f32; 3], std: [f32; 3]) -> Result<Self, OCRError> {
        if scale <= 0.0 {
            return Err(OCRError::invalid_field(
                "scale",
                "a value greater than 0",
                scale.to_string(),
            ));
        }

        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(OCRError::ConfigError {
                    message: format!(
                        "Standard deviation at index {i} must be greater than 0, got {s}"
                    ),
                });
            }
        }

        let alpha = [scale / std[0], scale / std[1], scale / std[2]];
        let beta = [-mean[0] / std[0], -mean[1] / std[1], -mean[2] / std[2]];

        if alpha.iter().chain(beta.iter()).any(|v| !v.is_finite()) {
            return Err(OCRError::ConfigError {
                message: "Normalization coefficients must be finite".to_string(),
            });
        }

        Ok(Self { alpha, beta })
    }

    /// Normalizer for `[0, 255]` pixels with the given RGB mean and std.
    pub fn from_rgb_stats(mean: [f32; 3], std: [f32; 3]) -> Result<Self, OCRError> {
        Self::new(1.0 / 255.0, mean, std)
    }

    /// Normalizes a single image into a CHW array.
    pub fn apply(&self, image: &RgbImage) -> Array3<f32> {
        let (width, height) = image.dimensions();
        let mut out = Array3::<f32>::zeros((3, height as usize, width as usize));
        for (x, y, pixel) in image.enumerate_pixels() {
            for c in 0..3 {
                out[[c, y as usize, x as usize]] =
                    pixel[c] as f32 * self.alpha[c] + self.beta[c];
            }
        }
        out
    }

    /// Normalizes a batch of images into a zero-padded NCHW tensor.
    ///
    /// Every image must fit inside `height x width`; smaller images are placed
    /// in the top-left corner and the remainder stays at zero.
    pub fn apply_batch(
        &self,
        images: &[RgbImage],
        height: usize,
        width: usize,
    ) -> Result<Array4<f32>, OCRError> {
        if let Some(img) = images
            .iter()
            .find(|img| img.height() as usize > height || img.width() as usize > width)
        {
            return Err(OCRError::normalization_error(format!(
                "image {}x{} does not fit batch slot {}x{}",
                img.width(),
                img.height(),
                width,
                height
            )));
        }

        let normalized: Vec<Array3<f32>> = images.par_iter().map(|img| self.apply(img)).collect();

        let mut batch = Array4::<f32>::zeros((images.len(), 3, height, width));
        for (i, chw) in normalized.iter().enumerate() {
            let (_, h, w) = chw.dim();
            batch.slice_mut(s![i, .., ..h, ..w]).assign(chw);
        }
        Ok(batch)
    }
}
