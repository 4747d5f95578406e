//! End-to-end OCR quality: a word counts when its box is matched and its
//! transcription agrees.

use super::assignment::linear_sum_assignment;
use super::iou::box_iou;
use super::{MatchCounts, StringMetrics, check_thresholds, ratio, string_match};
use crate::core::{OCRError, OcrResult};
use ndarray::Axis;
use serde::Serialize;

/// Summary of an [`OCRMetric`]. Undefined ratios are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OCRSummary {
    pub recall: StringMetrics,
    pub precision: StringMetrics,
    pub mean_iou: Option<f64>,
}

/// Accumulates box matches whose labels also match.
#[derive(Debug, Clone, PartialEq)]
pub struct OCRMetric {
    iou_thresh: f64,
    num_gts: usize,
    num_preds: usize,
    matches: MatchCounts,
    tot_iou: f64,
    num_updates: usize,
}

impl OCRMetric {
    pub fn new(iou_thresh: f64) -> Self {
        Self {
            iou_thresh,
            num_gts: 0,
            num_preds: 0,
            matches: MatchCounts::default(),
            tot_iou: 0.0,
            num_updates: 0,
        }
    }

    /// Adds one sample.
    ///
    /// # Errors
    ///
    /// Returns [`OCRError::InvalidInput`] when a side has a different number
    /// of boxes and labels. The accumulator is left untouched in that case.
    pub fn update(
        &mut self,
        gt_boxes: &[[f64; 4]],
        pred_boxes: &[[f64; 4]],
        gt_labels: &[String],
        pred_labels: &[String],
    ) -> OcrResult<()> {
        if gt_boxes.len() != gt_labels.len() || pred_boxes.len() != pred_labels.len() {
            return Err(OCRError::invalid_input(format!(
                "ocr metric got {} gt boxes / {} gt labels and {} predicted boxes / {} predicted labels",
                gt_boxes.len(),
                gt_labels.len(),
                pred_boxes.len(),
                pred_labels.len()
            )));
        }

        if !gt_boxes.is_empty() && !pred_boxes.is_empty() {
            let iou = box_iou(gt_boxes, pred_boxes);
            self.tot_iou += iou
                .map_axis(Axis(0), |col| col.fold(0.0f64, |m, &v| m.max(v)))
                .sum();

            let (gt_idx, pred_idx) = linear_sum_assignment(&iou.mapv(|v| -v));
            for (&g, &p) in gt_idx.iter().zip(&pred_idx) {
                if iou[[g, p]] >= self.iou_thresh {
                    self.matches.add(string_match(&gt_labels[g], &pred_labels[p]));
                }
            }
        }

        self.num_gts += gt_boxes.len();
        self.num_preds += pred_boxes.len();
        self.num_updates += 1;
        Ok(())
    }

    pub fn summary(&self) -> OCRSummary {
        OCRSummary {
            recall: self.matches.ratios(self.num_gts),
            precision: self.matches.ratios(self.num_preds),
            mean_iou: ratio(self.tot_iou, self.num_preds),
        }
    }

    /// Folds another accumulator with the same threshold into this one.
    pub fn merge(&mut self, other: &Self) -> OcrResult<()> {
        check_thresholds(self.iou_thresh, other.iou_thresh)?;
        self.num_gts += other.num_gts;
        self.num_preds += other.num_preds;
        self.matches.merge(&other.matches);
        self.tot_iou += other.tot_iou;
        self.num_updates += other.num_updates;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.iou_thresh);
    }

    pub fn num_gts(&self) -> usize {
        self.num_gts
    }

    pub fn num_preds(&self) -> usize {
        self.num_preds
    }

    pub fn num_updates(&self) -> usize {
        self.num_updates
    }
}
