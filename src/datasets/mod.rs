//! Labeled page datasets for evaluation.

mod named;
mod ocr_dataset;
mod target;

pub use named::{SUPPORTED_DATASETS, named_dataset};
pub use ocr_dataset::OCRDataset;
pub use target::{BoxKind, Boxes, Sample, Target};

use crate::core::OcrResult;

/// A finite, ordered collection of labeled pages.
pub trait Dataset {
    /// Label shown in reports.
    fn name(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over samples, decoding pages on demand.
    fn iter(&self) -> Box<dyn Iterator<Item = OcrResult<Sample>> + '_>;
}
