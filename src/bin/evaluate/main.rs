//! OAR-OCR end-to-end evaluation
//!
//! Scores a text detection + recognition pipeline on a labeled dataset.
//!
//! # Usage
//!
//! ```bash
//! oar-ocr-eval db_resnet50 crnn_vgg16_bn --dataset FUNSD --data-root data
//! oar-ocr-eval db_resnet50 crnn_vgg16_bn --img_folder pages/ --label_file labels.json -b 64
//! ```

mod cli;
mod config;

use clap::Parser;
use config::{EvalConfig, OutputFormat, RawArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oar-ocr-eval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "End-to-end OCR evaluation", long_about = None)]
struct Cli {
    /// Text detection model to use for analysis
    detection: String,

    /// Text recognition model to use for analysis
    recognition: String,

    /// IoU threshold to match a pair of boxes
    #[arg(long, default_value_t = 0.5)]
    iou: f64,

    /// Choose a dataset: FUNSD, CORD, SROIE
    #[arg(long, default_value = "FUNSD")]
    dataset: String,

    /// Only for local sets, path to images
    #[arg(long = "img_folder")]
    img_folder: Option<PathBuf>,

    /// Only for local sets, path to labels
    #[arg(long = "label_file")]
    label_file: Option<PathBuf>,

    /// Batch size for recognition
    #[arg(short = 'b', long = "batch_size", default_value_t = 32)]
    batch_size: usize,

    /// Directory holding the ONNX models and vocabularies
    #[arg(long = "models-dir", default_value = "models", env = "OAR_MODELS_DIR")]
    models_dir: PathBuf,

    /// Root directory of the named datasets
    #[arg(long = "data-root", default_value = "data", env = "OAR_DATA_ROOT")]
    data_root: PathBuf,

    /// Device to use (cpu, cuda, cuda:0, etc.)
    #[arg(long, default_value = "cpu", env = "OAR_DEVICE")]
    device: String,

    /// Intra-op threads per ONNX Runtime session
    #[arg(long, env = "OAR_THREADS")]
    threads: Option<usize>,

    /// Dilate the detection mask before extracting word boxes
    #[arg(long = "use-dilation")]
    use_dilation: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    output: OutputFormat,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    oar_ocr_eval::utils::init_tracing();

    let args = Cli::parse();
    let config = EvalConfig::from_args(RawArgs {
        detection: args.detection,
        recognition: args.recognition,
        iou: args.iou,
        dataset: args.dataset,
        img_folder: args.img_folder,
        label_file: args.label_file,
        batch_size: args.batch_size,
        models_dir: args.models_dir,
        data_root: args.data_root,
        device: args.device,
        threads: args.threads,
        use_dilation: args.use_dilation,
        output: args.output,
    })?;

    cli::run(&config)?;
    Ok(())
}
