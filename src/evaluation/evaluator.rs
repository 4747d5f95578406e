//! The evaluation loop feeding predictions into the metric accumulators.

use super::summary::EvaluationSummary;
use crate::core::OcrResult;
use crate::datasets::{BoxKind, Dataset, Sample};
use crate::metrics::{LocalizationConfusion, OCRMetric, TextMatch};
use crate::predictor::{Page, Predictor};
use crate::utils::extract_crops;
use std::slice;

/// Maps a page-relative word geometry into the ground-truth convention.
///
/// Absolute ground truth gets pixel coordinates truncated towards zero;
/// relative ground truth keeps the geometry as is.
pub fn to_gt_convention(
    geometry: ((f32, f32), (f32, f32)),
    page_dims: (u32, u32),
    kind: BoxKind,
) -> [f64; 4] {
    let ((a, b), (c, d)) = geometry;
    let [a, b, c, d] = [a, b, c, d].map(f64::from);
    match kind {
        BoxKind::Absolute => {
            let (h, w) = (f64::from(page_dims.0), f64::from(page_dims.1));
            [(a * w).trunc(), (b * h).trunc(), (c * w).trunc(), (d * h).trunc()]
        }
        BoxKind::Relative => [a, b, c, d],
    }
}

/// Predicted boxes and labels of a page, in traversal order.
fn unpack_page(page: &Page, kind: BoxKind) -> (Vec<[f64; 4]>, Vec<String>) {
    page.words()
        .map(|word| {
            (
                to_gt_convention(word.geometry, page.dimensions, kind),
                word.value.clone(),
            )
        })
        .unzip()
}

/// Runs a predictor over datasets and accumulates detection, recognition and
/// end-to-end metrics.
pub struct Evaluator<'a> {
    predictor: &'a dyn Predictor,
    det_metric: LocalizationConfusion,
    reco_metric: TextMatch,
    e2e_metric: OCRMetric,
}

impl<'a> Evaluator<'a> {
    pub fn new(predictor: &'a dyn Predictor, iou_thresh: f64) -> Self {
        Self {
            predictor,
            det_metric: LocalizationConfusion::new(iou_thresh),
            reco_metric: TextMatch::new(),
            e2e_metric: OCRMetric::new(iou_thresh),
        }
    }

    /// Scores one page.
    ///
    /// The page goes through the full pipeline, and the ground-truth crops go
    /// through recognition alone so that recognition accuracy is measured
    /// independently of detection.
    pub fn evaluate_sample(&mut self, sample: &Sample) -> OcrResult<()> {
        let gt_boxes = sample.target.boxes();
        let gt_labels = sample.target.labels();
        let kind = gt_boxes.kind();

        let out = self.predictor.predict(slice::from_ref(&sample.page))?;
        let crops = extract_crops(&sample.page, gt_boxes);
        let reco_words: Vec<String> = self
            .predictor
            .recognize(&crops)?
            .into_iter()
            .map(|(text, _)| text)
            .collect();

        let mut pred_boxes = Vec::new();
        let mut pred_labels = Vec::new();
        for page in &out.pages {
            let (boxes, labels) = unpack_page(page, kind);
            pred_boxes.extend(boxes);
            pred_labels.extend(labels);
        }

        if gt_boxes.is_empty() {
            tracing::warn!("Sample '{}' has no ground-truth words", sample.name);
        }
        tracing::debug!(
            "Sample '{}': {} gt words, {} predicted words",
            sample.name,
            gt_labels.len(),
            pred_labels.len()
        );

        let gt = gt_boxes.to_f64();
        self.det_metric.update(&gt, &pred_boxes);
        self.reco_metric.update(gt_labels, &reco_words)?;
        self.e2e_metric
            .update(&gt, &pred_boxes, gt_labels, &pred_labels)?;
        Ok(())
    }

    /// Scores every sample of a dataset and returns how many were seen.
    pub fn run<D: Dataset + ?Sized>(&mut self, dataset: &D) -> OcrResult<usize> {
        tracing::info!("Evaluating {} ({} pages)", dataset.name(), dataset.len());
        let mut seen = 0;
        for sample in dataset.iter() {
            self.evaluate_sample(&sample?)?;
            seen += 1;
            if seen % 50 == 0 {
                tracing::info!("{}: {}/{} pages", dataset.name(), seen, dataset.len());
            }
        }
        Ok(seen)
    }

    pub fn summary(&self, detection: &str, recognition: &str, dataset: &str) -> EvaluationSummary {
        EvaluationSummary {
            detection_model: detection.to_string(),
            recognition_model: recognition.to_string(),
            dataset: dataset.to_string(),
            num_samples: self.det_metric.num_updates(),
            detection: self.det_metric.summary(),
            recognition: self.reco_metric.summary(),
            ocr: self.e2e_metric.summary(),
        }
    }

    pub fn det_metric(&self) -> &LocalizationConfusion {
        &self.det_metric
    }

    pub fn reco_metric(&self) -> &TextMatch {
        &self.reco_metric
    }

    pub fn e2e_metric(&self) -> &OCRMetric {
        &self.e2e_metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{Boxes, Target};
    use crate::predictor::{Document, DocumentBuilder, Word};
    use image::RgbImage;
    use std::cell::RefCell;

    /// Returns fixed words for every page and echoes a label per crop.
    struct MockPredictor {
        words: Vec<Word>,
        seen_pages: RefCell<Vec<(u32, u32)>>,
    }

    impl MockPredictor {
        fn new(words: Vec<Word>) -> Self {
            Self {
                words,
                seen_pages: RefCell::new(Vec::new()),
            }
        }
    }

    impl Predictor for MockPredictor {
        fn predict(&self, pages: &[RgbImage]) -> OcrResult<Document> {
            let builder = DocumentBuilder::default();
            Ok(Document {
                pages: pages
                    .iter()
                    .map(|p| {
                        self.seen_pages.borrow_mut().push(p.dimensions());
                        builder.build_page(self.words.clone(), (p.height(), p.width()))
                    })
                    .collect(),
            })
        }

        fn recognize(&self, crops: &[RgbImage]) -> OcrResult<Vec<(String, f32)>> {
            Ok(crops
                .iter()
                .map(|c| (format!("{}x{}", c.width(), c.height()), 1.0))
                .collect())
        }
    }

    struct VecDataset {
        name: String,
        samples: Vec<Sample>,
    }

    impl Dataset for VecDataset {
        fn name(&self) -> &str {
            &self.name
        }

        fn len(&self) -> usize {
            self.samples.len()
        }

        fn iter(&self) -> Box<dyn Iterator<Item = OcrResult<Sample>> + '_> {
            Box::new(self.samples.iter().cloned().map(Ok))
        }
    }

    fn sample(name: &str, boxes: Boxes, labels: &[&str]) -> Sample {
        Sample {
            name: name.to_string(),
            page: RgbImage::new(200, 100),
            target: Target::new(boxes, labels.iter().map(|l| l.to_string()).collect()).unwrap(),
        }
    }

    #[test]
    fn test_absolute_conversion_truncates() {
        let geometry = ((0.1, 0.25), (0.5, 0.999));
        assert_eq!(
            to_gt_convention(geometry, (100, 200), BoxKind::Absolute),
            [20.0, 25.0, 100.0, 99.0]
        );
        let rel = to_gt_convention(geometry, (100, 200), BoxKind::Relative);
        assert!((rel[3] - 0.999).abs() < 1e-6);
    }

    #[test]
    fn test_predictions_follow_gt_convention_per_sample() {
        let predictor = MockPredictor::new(vec![Word::new("hello", 0.9, [0.1, 0.1, 0.5, 0.3])]);
        let mut evaluator = Evaluator::new(&predictor, 0.5);

        let abs = sample("abs", Boxes::Absolute(vec![[20, 10, 100, 30]]), &["hello"]);
        evaluator.evaluate_sample(&abs).unwrap();
        let det = evaluator.det_metric().summary();
        assert_eq!(det.recall, Some(1.0));
        assert_eq!(det.mean_iou, Some(1.0));

        let rel = sample("rel", Boxes::Relative(vec![[0.1, 0.1, 0.5, 0.3]]), &["hello"]);
        evaluator.evaluate_sample(&rel).unwrap();
        let ocr = evaluator.e2e_metric().summary();
        assert_eq!(ocr.recall.raw, Some(1.0));
        assert_eq!(evaluator.det_metric().num_updates(), 2);
    }

    #[test]
    fn test_recognition_uses_ground_truth_crops() {
        let predictor = MockPredictor::new(Vec::new());
        let mut evaluator = Evaluator::new(&predictor, 0.5);
        let s = sample("s", Boxes::Absolute(vec![[0, 0, 40, 20], [10, 10, 20, 15]]), &["40x20", "X"]);

        evaluator.evaluate_sample(&s).unwrap();
        let reco = evaluator.reco_metric().summary();
        assert_eq!(reco.raw, Some(0.5));
        assert_eq!(evaluator.reco_metric().total(), 2);
        assert_eq!(predictor.seen_pages.borrow().as_slice(), &[(200, 100)]);
    }

    #[test]
    fn test_one_update_per_sample_and_bounded_summary() {
        let predictor = MockPredictor::new(vec![
            Word::new("a", 0.9, [0.0, 0.0, 0.2, 0.2]),
            Word::new("b", 0.9, [0.6, 0.6, 0.9, 0.9]),
        ]);
        let dataset = VecDataset {
            name: "mock".to_string(),
            samples: vec![
                sample("1", Boxes::Absolute(vec![[0, 0, 40, 20]]), &["a"]),
                sample("2", Boxes::Absolute(vec![]), &[]),
                sample("3", Boxes::Absolute(vec![[120, 60, 180, 90], [0, 0, 5, 5]]), &["B", "c"]),
            ],
        };

        let mut evaluator = Evaluator::new(&predictor, 0.5);
        assert_eq!(evaluator.run(&dataset).unwrap(), 3);
        assert_eq!(evaluator.det_metric().num_updates(), 3);
        assert_eq!(evaluator.reco_metric().num_updates(), 3);
        assert_eq!(evaluator.e2e_metric().num_updates(), 3);

        let summary = evaluator.summary("db_resnet50", "crnn_vgg16_bn", dataset.name());
        assert_eq!(summary.num_samples, 3);
        for v in [
            summary.detection.recall,
            summary.detection.precision,
            summary.detection.mean_iou,
            summary.recognition.raw,
            summary.ocr.recall.unicase,
            summary.ocr.precision.raw,
            summary.ocr.mean_iou,
        ]
        .into_iter()
        .flatten()
        {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_two_splits_sum_to_single_pass() {
        let predictor = MockPredictor::new(vec![Word::new("a", 0.9, [0.0, 0.0, 0.2, 0.2])]);
        let train = VecDataset {
            name: "train".to_string(),
            samples: vec![sample("t", Boxes::Absolute(vec![[0, 0, 40, 20]]), &["a"])],
        };
        let test = VecDataset {
            name: "test".to_string(),
            samples: vec![sample("v", Boxes::Absolute(vec![[100, 50, 150, 80]]), &["z"])],
        };

        let mut combined = Evaluator::new(&predictor, 0.5);
        combined.run(&train).unwrap();
        combined.run(&test).unwrap();

        let mut first = Evaluator::new(&predictor, 0.5);
        first.run(&train).unwrap();
        let mut second = Evaluator::new(&predictor, 0.5);
        second.run(&test).unwrap();

        let mut det = first.det_metric().clone();
        det.merge(second.det_metric()).unwrap();
        assert_eq!(&det, combined.det_metric());

        let mut e2e = first.e2e_metric().clone();
        e2e.merge(second.e2e_metric()).unwrap();
        assert_eq!(&e2e, combined.e2e_metric());

        let mut reco = first.reco_metric().clone();
        reco.merge(second.reco_metric());
        assert_eq!(&reco, combined.reco_metric());
        assert_eq!(combined.det_metric().num_gts(), 2);
    }
}
