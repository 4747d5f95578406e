//! Evaluation run: build the predictor, open the datasets, score, report.

use crate::config::{DatasetSource, EvalConfig, OutputFormat};
use oar_ocr_eval::core::OcrResult;
use oar_ocr_eval::datasets::{OCRDataset, named_dataset};
use oar_ocr_eval::evaluation::Evaluator;
use oar_ocr_eval::predictor::{PredictorOptions, ocr_predictor};
use std::time::Instant;
use tracing::info;

fn open_datasets(source: &DatasetSource) -> OcrResult<Vec<OCRDataset>> {
    match source {
        DatasetSource::Custom {
            img_folder,
            label_file,
        } => Ok(vec![OCRDataset::new(img_folder, label_file)?]),
        DatasetSource::Named { name, data_root } => Ok(vec![
            named_dataset(name, data_root, true)?,
            named_dataset(name, data_root, false)?,
        ]),
    }
}

/// Runs a full evaluation and prints the report to stdout.
pub fn run(config: &EvalConfig) -> OcrResult<()> {
    let start = Instant::now();

    let mut options = PredictorOptions::new()
        .models_dir(&config.models_dir)
        .reco_bs(config.batch_size)
        .postprocess(config.postprocess());
    if let Some(ort_config) = config.ort_config()? {
        options = options.with_ort_config(ort_config);
    }

    info!("Initializing predictor...");
    let predictor = ocr_predictor(&config.detection, &config.recognition, options)?;
    info!(
        "Predictor ready in {:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    let datasets = open_datasets(&config.source)?;

    let mut evaluator = Evaluator::new(&predictor, config.iou);
    let eval_start = Instant::now();
    let mut pages = 0;
    for dataset in &datasets {
        pages += evaluator.run(dataset)?;
    }
    info!(
        "Evaluated {} pages in {:.2}s",
        pages,
        eval_start.elapsed().as_secs_f64()
    );

    let summary = evaluator.summary(
        &config.detection,
        &config.recognition,
        config.source.label(),
    );
    match config.output {
        OutputFormat::Pretty => println!("{summary}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
