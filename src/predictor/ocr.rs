//! Two-stage OCR predictor: text detection followed by word recognition.

use super::Predictor;
use super::document::{Document, DocumentBuilder, Word};
use super::zoo::{ResolvedModel, resolve_detection, resolve_recognition};
use crate::core::OcrResult;
use crate::core::config::OrtSessionConfig;
use crate::datasets::Boxes;
use crate::models::recognition::vocabs;
use crate::models::{CRNNModel, CRNNModelBuilder, DBModel, DBModelBuilder};
use crate::processors::DBPostProcess;
use crate::utils::extract_crops;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Options for [`ocr_predictor`].
#[derive(Debug, Clone)]
pub struct PredictorOptions {
    models_dir: PathBuf,
    det_bs: usize,
    reco_bs: usize,
    ort_config: Option<OrtSessionConfig>,
    postprocess: DBPostProcess,
    document_builder: DocumentBuilder,
}

impl Default for PredictorOptions {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            det_bs: 2,
            reco_bs: 128,
            ort_config: None,
            postprocess: DBPostProcess::default(),
            document_builder: DocumentBuilder::default(),
        }
    }
}

impl PredictorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding `<arch>.onnx` graphs and `<arch>.txt` vocabularies.
    pub fn models_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.models_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Number of pages per detection forward pass.
    pub fn det_bs(mut self, batch_size: usize) -> Self {
        self.det_bs = batch_size.max(1);
        self
    }

    /// Number of word crops per recognition forward pass.
    pub fn reco_bs(mut self, batch_size: usize) -> Self {
        self.reco_bs = batch_size.max(1);
        self
    }

    /// ONNX Runtime session configuration shared by both models.
    pub fn with_ort_config(mut self, config: OrtSessionConfig) -> Self {
        self.ort_config = Some(config);
        self
    }

    pub fn postprocess(mut self, postprocess: DBPostProcess) -> Self {
        self.postprocess = postprocess;
        self
    }

    pub fn document_builder(mut self, builder: DocumentBuilder) -> Self {
        self.document_builder = builder;
        self
    }
}

/// Builds a predictor from a detection and a recognition architecture.
///
/// Each argument is a registered architecture name, looked up as
/// `<models_dir>/<arch>.onnx`, or a path to an existing `.onnx` file.
/// The recognition vocabulary is read from the `.txt` file next to the
/// recognition graph when present, and falls back to the French vocabulary.
pub fn ocr_predictor(
    det_arch: &str,
    reco_arch: &str,
    options: PredictorOptions,
) -> OcrResult<OCRPredictor> {
    let det = resolve_detection(det_arch, &options.models_dir)?;
    let reco = resolve_recognition(reco_arch, &options.models_dir)?;

    let mut det_builder = DBModelBuilder::new()
        .model_name(&det.name)
        .preprocess_config(det.detection_config())
        .postprocess(options.postprocess.clone());
    let mut reco_builder = CRNNModelBuilder::new()
        .model_name(&reco.name)
        .preprocess_config(reco.recognition_config())
        .vocab(recognition_vocab(&reco)?);
    if let Some(cfg) = &options.ort_config {
        det_builder = det_builder.with_ort_config(cfg.clone());
        reco_builder = reco_builder.with_ort_config(cfg.clone());
    }

    Ok(OCRPredictor {
        det_model: det_builder.build(&det.model_path)?,
        reco_model: reco_builder.build(&reco.model_path)?,
        det_name: det.name,
        reco_name: reco.name,
        det_bs: options.det_bs,
        reco_bs: options.reco_bs,
        document_builder: options.document_builder,
    })
}

fn recognition_vocab(reco: &ResolvedModel) -> OcrResult<String> {
    let path = reco.vocab_path();
    if path.is_file() {
        tracing::info!("Using vocabulary {}", path.display());
        vocabs::load_vocab(&path)
    } else {
        tracing::debug!("No vocabulary at {}, using the French vocabulary", path.display());
        Ok(vocabs::french())
    }
}

/// Detection + recognition pipeline over ONNX models.
#[derive(Debug)]
pub struct OCRPredictor {
    det_model: DBModel,
    reco_model: CRNNModel,
    det_name: String,
    reco_name: String,
    det_bs: usize,
    reco_bs: usize,
    document_builder: DocumentBuilder,
}

impl OCRPredictor {
    pub fn det_name(&self) -> &str {
        &self.det_name
    }

    pub fn reco_name(&self) -> &str {
        &self.reco_name
    }
}

impl Predictor for OCRPredictor {
    fn predict(&self, pages: &[RgbImage]) -> OcrResult<Document> {
        let mut detections = Vec::with_capacity(pages.len());
        for chunk in pages.chunks(self.det_bs) {
            detections.extend(self.det_model.forward(chunk)?);
        }

        let mut document = Document::default();
        for (page, page_detections) in pages.iter().zip(detections) {
            let boxes: Vec<[f32; 4]> = page_detections.iter().map(|d| d.bbox).collect();
            let crops = extract_crops(page, &Boxes::Relative(boxes.clone()));
            let texts = self.recognize(&crops)?;

            let words = boxes
                .into_iter()
                .zip(texts)
                .map(|(bbox, (value, confidence))| Word::new(value, confidence, bbox))
                .collect();
            let (width, height) = page.dimensions();
            document
                .pages
                .push(self.document_builder.build_page(words, (height, width)));
        }
        Ok(document)
    }

    fn recognize(&self, crops: &[RgbImage]) -> OcrResult<Vec<(String, f32)>> {
        let mut words = Vec::with_capacity(crops.len());
        for chunk in crops.chunks(self.reco_bs) {
            words.extend(self.reco_model.forward(chunk)?);
        }
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OCRError;

    #[test]
    fn test_options_clamp_batch_sizes() {
        let options = PredictorOptions::new().reco_bs(0).det_bs(0);
        assert_eq!(options.reco_bs, 1);
        assert_eq!(options.det_bs, 1);
    }

    #[test]
    fn test_missing_models_fail_with_model_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = PredictorOptions::new().models_dir(dir.path());
        let err = ocr_predictor("db_resnet50", "crnn_vgg16_bn", options).unwrap_err();
        assert!(matches!(err, OCRError::ModelLoad { .. }));
    }

    #[test]
    fn test_unknown_architecture_fails_before_loading() {
        let err = ocr_predictor("yolo", "crnn_vgg16_bn", PredictorOptions::new()).unwrap_err();
        assert!(matches!(err, OCRError::ConfigError { .. }));
    }

    #[test]
    fn test_vocab_sidecar_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("crnn_vgg16_bn.txt"), "a\nb\n").unwrap();
        let reco = resolve_recognition("crnn_vgg16_bn", dir.path()).unwrap();
        assert_eq!(recognition_vocab(&reco).unwrap(), "ab");

        let other = resolve_recognition("crnn_mobilenet_v3_small", dir.path()).unwrap();
        assert_eq!(recognition_vocab(&other).unwrap(), vocabs::french());
    }
}
