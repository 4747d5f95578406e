//! Detection quality: box recall, precision and mean IoU.

use super::assignment::linear_sum_assignment;
use super::iou::box_iou;
use super::{check_thresholds, ratio};
use crate::core::OcrResult;
use ndarray::Axis;
use serde::Serialize;

/// Summary of a [`LocalizationConfusion`]. Undefined ratios are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocalizationSummary {
    pub recall: Option<f64>,
    pub precision: Option<f64>,
    pub mean_iou: Option<f64>,
}

/// Accumulates box matches between ground truth and predictions.
///
/// Each update pairs ground-truth and predicted boxes one-to-one so that the
/// total IoU is maximal, then counts the pairs whose IoU reaches the
/// threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationConfusion {
    iou_thresh: f64,
    num_gts: usize,
    num_preds: usize,
    matches: usize,
    tot_iou: f64,
    num_updates: usize,
}

impl LocalizationConfusion {
    pub fn new(iou_thresh: f64) -> Self {
        Self {
            iou_thresh,
            num_gts: 0,
            num_preds: 0,
            matches: 0,
            tot_iou: 0.0,
            num_updates: 0,
        }
    }

    /// Adds one sample.
    pub fn update(&mut self, gts: &[[f64; 4]], preds: &[[f64; 4]]) {
        if !gts.is_empty() && !preds.is_empty() {
            let iou = box_iou(gts, preds);
            self.tot_iou += iou
                .map_axis(Axis(0), |col| col.fold(0.0f64, |m, &v| m.max(v)))
                .sum();

            let (gt_idx, pred_idx) = linear_sum_assignment(&iou.mapv(|v| -v));
            self.matches += gt_idx
                .iter()
                .zip(&pred_idx)
                .filter(|&(&g, &p)| iou[[g, p]] >= self.iou_thresh)
                .count();
        }
        self.num_gts += gts.len();
        self.num_preds += preds.len();
        self.num_updates += 1;
    }

    pub fn summary(&self) -> LocalizationSummary {
        LocalizationSummary {
            recall: ratio(self.matches as f64, self.num_gts),
            precision: ratio(self.matches as f64, self.num_preds),
            mean_iou: ratio(self.tot_iou, self.num_preds),
        }
    }

    /// Folds another accumulator with the same threshold into this one.
    pub fn merge(&mut self, other: &Self) -> OcrResult<()> {
        check_thresholds(self.iou_thresh, other.iou_thresh)?;
        self.num_gts += other.num_gts;
        self.num_preds += other.num_preds;
        self.matches += other.matches;
        self.tot_iou += other.tot_iou;
        self.num_updates += other.num_updates;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.iou_thresh);
    }

    pub fn iou_thresh(&self) -> f64 {
        self.iou_thresh
    }

    pub fn num_gts(&self) -> usize {
        self.num_gts
    }

    pub fn num_preds(&self) -> usize {
        self.num_preds
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn num_updates(&self) -> usize {
        self.num_updates
    }
}
