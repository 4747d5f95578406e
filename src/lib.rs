//! # OAR-OCR evaluation
//!
//! End-to-end evaluation of a two-stage OCR pipeline (text detection followed
//! by word recognition) against labeled page datasets.
//!
//! The crate is organized around the evaluation flow:
//!
//! - [`predictor`] builds an [`predictor::OCRPredictor`] from ONNX detection and
//!   recognition models and defines the [`predictor::Predictor`] seam
//! - [`datasets`] reads labeled pages from an image folder and a JSON label file
//! - [`metrics`] holds the detection, recognition and end-to-end accumulators
//! - [`evaluation`] drives a predictor over datasets and renders the report
//!
//! ```no_run
//! use oar_ocr_eval::datasets::OCRDataset;
//! use oar_ocr_eval::evaluation::Evaluator;
//! use oar_ocr_eval::predictor::{PredictorOptions, ocr_predictor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let predictor = ocr_predictor(
//!     "db_resnet50",
//!     "crnn_vgg16_bn",
//!     PredictorOptions::new().models_dir("models").reco_bs(32),
//! )?;
//! let dataset = OCRDataset::new("data/images", "data/labels.json")?;
//!
//! let mut evaluator = Evaluator::new(&predictor, 0.5);
//! evaluator.run(&dataset)?;
//! println!("{}", evaluator.summary("db_resnet50", "crnn_vgg16_bn", "OCRDataset"));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod datasets;
pub mod evaluation;
pub mod metrics;
pub mod models;
pub mod predictor;
pub mod processors;
pub mod utils;
