//! OCR predictors and their output document model.

pub mod document;
pub mod ocr;
pub mod zoo;

pub use document::{Block, Document, DocumentBuilder, Line, Page, Word};
pub use ocr::{OCRPredictor, PredictorOptions, ocr_predictor};

use crate::core::OcrResult;
use image::RgbImage;

/// End-to-end OCR over pages, plus recognition of pre-cropped words.
pub trait Predictor {
    /// Detects and recognizes the words of each page.
    fn predict(&self, pages: &[RgbImage]) -> OcrResult<Document>;

    /// Recognizes word crops, returning `(text, confidence)` per crop.
    fn recognize(&self, crops: &[RgbImage]) -> OcrResult<Vec<(String, f32)>>;
}
