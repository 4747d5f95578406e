//! End-to-end evaluation of an OCR predictor against labeled datasets.

mod evaluator;
mod summary;

pub use evaluator::{Evaluator, to_gt_convention};
pub use summary::EvaluationSummary;
