//! Evaluation metrics for detection, recognition and end-to-end OCR.
//!
//! Every accumulator keeps plain counters, so per-split accumulators can be
//! merged into the same totals a single pass would produce.

pub mod assignment;
pub mod iou;
pub mod localization;
pub mod ocr_metric;
pub mod text_match;

pub use assignment::linear_sum_assignment;
pub use iou::box_iou;
pub use localization::{LocalizationConfusion, LocalizationSummary};
pub use ocr_metric::{OCRMetric, OCRSummary};
pub use text_match::{TextMatch, TextMatchSummary};

use crate::core::{OCRError, OcrResult};
use deunicode::deunicode;
use serde::Serialize;

/// A string-matching ratio under each comparison rule of [`string_match`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StringMetrics {
    pub raw: Option<f64>,
    pub caseless: Option<f64>,
    pub unidecode: Option<f64>,
    pub unicase: Option<f64>,
}

/// Which comparison rules two strings agree under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringMatch {
    /// Identical strings.
    pub raw: bool,
    /// Equal after lowercasing.
    pub caseless: bool,
    /// Equal after transliteration to ASCII.
    pub unidecode: bool,
    /// Equal after transliteration to ASCII and lowercasing.
    pub unicase: bool,
}

/// Compares a reference string with a prediction.
///
/// ```
/// use oar_ocr_eval::metrics::string_match;
///
/// let m = string_match("Café", "cafe");
/// assert!(!m.raw && m.unicase);
/// ```
pub fn string_match(gt: &str, pred: &str) -> StringMatch {
    let gt_ascii = deunicode(gt);
    let pred_ascii = deunicode(pred);
    StringMatch {
        raw: gt == pred,
        caseless: gt.to_lowercase() == pred.to_lowercase(),
        unicase: gt_ascii.to_lowercase() == pred_ascii.to_lowercase(),
        unidecode: gt_ascii == pred_ascii,
    }
}

/// Per-rule match counters shared by the string-based accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MatchCounts {
    raw: usize,
    caseless: usize,
    unidecode: usize,
    unicase: usize,
}

impl MatchCounts {
    fn add(&mut self, m: StringMatch) {
        self.raw += usize::from(m.raw);
        self.caseless += usize::from(m.caseless);
        self.unidecode += usize::from(m.unidecode);
        self.unicase += usize::from(m.unicase);
    }

    fn merge(&mut self, other: &Self) {
        self.raw += other.raw;
        self.caseless += other.caseless;
        self.unidecode += other.unidecode;
        self.unicase += other.unicase;
    }

    fn ratios(&self, den: usize) -> StringMetrics {
        StringMetrics {
            raw: ratio(self.raw as f64, den),
            caseless: ratio(self.caseless as f64, den),
            unidecode: ratio(self.unidecode as f64, den),
            unicase: ratio(self.unicase as f64, den),
        }
    }
}

/// `num / den`, undefined for an empty denominator.
fn ratio(num: f64, den: usize) -> Option<f64> {
    (den > 0).then(|| num / den as f64)
}

fn check_thresholds(ours: f64, theirs: f64) -> OcrResult<()> {
    if ours != theirs {
        return Err(OCRError::invalid_input(format!(
            "cannot merge metrics with IoU thresholds {ours} and {theirs}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_match_transliterates_symbols() {
        let m = string_match("€", "EUR");
        assert!(!m.raw);
        assert!(!m.caseless);
        assert!(m.unidecode);
        assert!(m.unicase);
    }

    #[test]
    fn test_string_match_accents_and_case() {
        let m = string_match("Café", "cafe");
        assert_eq!(
            m,
            StringMatch {
                raw: false,
                caseless: false,
                unidecode: false,
                unicase: true,
            }
        );

        let m = string_match("Hello", "hello");
        assert!(!m.raw && m.caseless && !m.unidecode && m.unicase);
        assert_eq!(
            string_match("same", "same"),
            StringMatch {
                raw: true,
                caseless: true,
                unidecode: true,
                unicase: true,
            }
        );
    }

    #[test]
    fn test_match_counts_ratios() {
        let mut counts = MatchCounts::default();
        counts.add(string_match("€", "EUR"));
        counts.add(string_match("a", "a"));
        let metrics = counts.ratios(4);
        assert_eq!(metrics.raw, Some(0.25));
        assert_eq!(metrics.caseless, Some(0.25));
        assert_eq!(metrics.unidecode, Some(0.5));
        assert_eq!(metrics.unicase, Some(0.5));
        assert_eq!(MatchCounts::default().ratios(0).unicase, None);
    }
}
