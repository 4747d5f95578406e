//! Configuration types for the evaluation binary.

use clap::ValueEnum;
use oar_ocr_eval::core::{OCRError, OcrResult, OrtSessionConfig, parse_device_config};
use oar_ocr_eval::processors::DBPostProcess;
use std::path::PathBuf;

/// How the final report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Pretty,
    /// Single JSON object
    Json,
}

/// Which pages to evaluate on.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// A local image folder with its label file.
    Custom {
        img_folder: PathBuf,
        label_file: PathBuf,
    },
    /// Train and test splits of a named dataset under the data root.
    Named { name: String, data_root: PathBuf },
}

impl DatasetSource {
    /// Label used in the report.
    pub fn label(&self) -> &str {
        match self {
            DatasetSource::Custom { .. } => "OCRDataset",
            DatasetSource::Named { name, .. } => name,
        }
    }
}

/// Validated configuration of one evaluation run.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub detection: String,
    pub recognition: String,
    pub iou: f64,
    pub source: DatasetSource,
    pub batch_size: usize,
    pub models_dir: PathBuf,
    pub device: String,
    pub threads: Option<usize>,
    pub use_dilation: bool,
    pub output: OutputFormat,
}

/// Raw command-line values before validation.
pub struct RawArgs {
    pub detection: String,
    pub recognition: String,
    pub iou: f64,
    pub dataset: String,
    pub img_folder: Option<PathBuf>,
    pub label_file: Option<PathBuf>,
    pub batch_size: usize,
    pub models_dir: PathBuf,
    pub data_root: PathBuf,
    pub device: String,
    pub threads: Option<usize>,
    pub use_dilation: bool,
    pub output: OutputFormat,
}

impl EvalConfig {
    pub fn from_args(args: RawArgs) -> OcrResult<Self> {
        if !(0.0..=1.0).contains(&args.iou) {
            return Err(OCRError::invalid_field(
                "iou",
                "a value in [0, 1]",
                args.iou.to_string(),
            ));
        }
        if args.batch_size == 0 {
            return Err(OCRError::invalid_field("batch_size", "at least 1", "0"));
        }
        if args.threads == Some(0) {
            return Err(OCRError::invalid_field("threads", "at least 1", "0"));
        }

        let source = match (args.img_folder, args.label_file) {
            (Some(img_folder), Some(label_file)) => DatasetSource::Custom {
                img_folder,
                label_file,
            },
            (None, None) => DatasetSource::Named {
                name: args.dataset,
                data_root: args.data_root,
            },
            _ => {
                return Err(OCRError::config_error_detailed(
                    "dataset selection",
                    "--img_folder and --label_file must be given together",
                ));
            }
        };

        Ok(Self {
            detection: args.detection,
            recognition: args.recognition,
            iou: args.iou,
            source,
            batch_size: args.batch_size,
            models_dir: args.models_dir,
            device: args.device,
            threads: args.threads,
            use_dilation: args.use_dilation,
            output: args.output,
        })
    }

    /// Session settings for both models, or `None` for ONNX Runtime defaults.
    pub fn ort_config(&self) -> OcrResult<Option<OrtSessionConfig>> {
        let device = parse_device_config(&self.device)?;
        Ok(match self.threads {
            Some(threads) => Some(device.unwrap_or_default().with_intra_threads(threads)),
            None => device,
        })
    }

    pub fn postprocess(&self) -> DBPostProcess {
        DBPostProcess {
            use_dilation: self.use_dilation,
            ..DBPostProcess::default()
        }
    }
}
