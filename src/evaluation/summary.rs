//! Final evaluation report.

use crate::metrics::{LocalizationSummary, OCRSummary, TextMatchSummary};
use serde::Serialize;
use std::fmt;

/// Aggregated results of an evaluation run.
///
/// `Display` renders the human-readable report; the struct also serializes
/// to JSON for machine consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub detection_model: String,
    pub recognition_model: String,
    pub dataset: String,
    pub num_samples: usize,
    pub detection: LocalizationSummary,
    pub recognition: TextMatchSummary,
    pub ocr: OCRSummary,
}

struct Pct(Option<f64>);

impl fmt::Display for Pct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.2}%", v * 100.0),
            None => f.write_str("N/A"),
        }
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Model Evaluation (model= {} + {}, dataset={})",
            self.detection_model, self.recognition_model, self.dataset
        )?;
        writeln!(
            f,
            "Text Detection - Recall: {}, Precision: {}, Mean IoU: {}",
            Pct(self.detection.recall),
            Pct(self.detection.precision),
            Pct(self.detection.mean_iou)
        )?;
        writeln!(
            f,
            "Text Recognition - Accuracy: {} (unicase: {})",
            Pct(self.recognition.raw),
            Pct(self.recognition.unicase)
        )?;
        write!(
            f,
            "OCR - Recall: {} (unicase: {}), Precision: {} (unicase: {}), Mean IoU: {}",
            Pct(self.ocr.recall.raw),
            Pct(self.ocr.recall.unicase),
            Pct(self.ocr.precision.raw),
            Pct(self.ocr.precision.unicase),
            Pct(self.ocr.mean_iou)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::StringMetrics;

    fn summary() -> EvaluationSummary {
        EvaluationSummary {
            detection_model: "db_resnet50".to_string(),
            recognition_model: "crnn_vgg16_bn".to_string(),
            dataset: "FUNSD".to_string(),
            num_samples: 2,
            detection: LocalizationSummary {
                recall: Some(0.8),
                precision: Some(0.5),
                mean_iou: Some(0.61234),
            },
            recognition: StringMetrics {
                raw: Some(0.9),
                caseless: Some(0.92),
                unidecode: Some(0.9),
                unicase: Some(0.95),
            },
            ocr: OCRSummary {
                recall: StringMetrics {
                    raw: None,
                    caseless: None,
                    unidecode: None,
                    unicase: None,
                },
                precision: StringMetrics {
                    raw: Some(1.0),
                    caseless: Some(1.0),
                    unidecode: Some(1.0),
                    unicase: Some(1.0),
                },
                mean_iou: Some(0.0),
            },
        }
    }

    #[test]
    fn test_report_layout() {
        let expected = "\
Model Evaluation (model= db_resnet50 + crnn_vgg16_bn, dataset=FUNSD)
Text Detection - Recall: 80.00%, Precision: 50.00%, Mean IoU: 61.23%
Text Recognition - Accuracy: 90.00% (unicase: 95.00%)
OCR - Recall: N/A (unicase: N/A), Precision: 100.00% (unicase: 100.00%), Mean IoU: 0.00%";
        assert_eq!(summary().to_string(), expected);
    }

    #[test]
    fn test_json_uses_null_for_undefined_values() {
        let json = serde_json::to_value(summary()).unwrap();
        assert_eq!(json["dataset"], "FUNSD");
        assert!(json["ocr"]["recall"]["raw"].is_null());
        assert_eq!(json["recognition"]["unicase"], 0.95);
        assert_eq!(json["recognition"]["caseless"], 0.92);
    }
}
