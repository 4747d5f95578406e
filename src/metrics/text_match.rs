//! Word recognition accuracy.

use super::{MatchCounts, StringMetrics, string_match};
use crate::core::{OCRError, OcrResult};

/// Summary of a [`TextMatch`]: fraction of matching words under each rule.
pub type TextMatchSummary = StringMetrics;

/// Accumulates word matches under each rule of [`string_match`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMatch {
    matches: MatchCounts,
    total: usize,
    num_updates: usize,
}

impl TextMatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compares ground-truth strings with predictions, index by index.
    ///
    /// # Errors
    ///
    /// Returns [`OCRError::InvalidInput`] when the two lists differ in length.
    pub fn update(&mut self, gt: &[String], pred: &[String]) -> OcrResult<()> {
        if gt.len() != pred.len() {
            return Err(OCRError::invalid_input(format!(
                "text match got {} references but {} predictions",
                gt.len(),
                pred.len()
            )));
        }

        for (g, p) in gt.iter().zip(pred) {
            self.matches.add(string_match(g, p));
        }
        self.total += gt.len();
        self.num_updates += 1;
        Ok(())
    }

    pub fn summary(&self) -> TextMatchSummary {
        self.matches.ratios(self.total)
    }

    pub fn merge(&mut self, other: &Self) {
        self.matches.merge(&other.matches);
        self.total += other.total;
        self.num_updates += other.num_updates;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn num_updates(&self) -> usize {
        self.num_updates
    }
}
