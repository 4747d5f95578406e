//! Public benchmark datasets stored under a local data root.

use super::OCRDataset;
use crate::core::{OCRError, OcrResult};
use std::path::Path;

/// Benchmark datasets that can be selected by name.
pub const SUPPORTED_DATASETS: &[&str] = &["FUNSD", "CORD", "SROIE"];

/// Opens one split of a named dataset.
///
/// The split is read from `<data_root>/<NAME>/{train|test}/` which must hold
/// an `images/` folder and a `labels.json` file in the [`OCRDataset`] format.
/// Names are matched case-insensitively.
pub fn named_dataset(name: &str, data_root: &Path, train: bool) -> OcrResult<OCRDataset> {
    let canonical = SUPPORTED_DATASETS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            OCRError::invalid_field(
                "dataset",
                format!("one of {}", SUPPORTED_DATASETS.join(", ")),
                name,
            )
        })?;

    let split = if train { "train" } else { "test" };
    let root = data_root.join(canonical).join(split);
    tracing::info!("Opening {} {} split at {}", canonical, split, root.display());

    OCRDataset::new(root.join("images"), root.join("labels.json"))
        .map(|ds| ds.with_name(*canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::Dataset;
    use image::RgbImage;

    #[test]
    fn test_unknown_name_lists_supported_sets() {
        let err = named_dataset("IMDB", Path::new("data"), true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("FUNSD, CORD, SROIE"));
    }

    #[test]
    fn test_resolves_split_directory_case_insensitively() {
        let root = tempfile::tempdir().unwrap();
        let split = root.path().join("SROIE").join("test");
        std::fs::create_dir_all(split.join("images")).unwrap();
        RgbImage::new(8, 8).save(split.join("images/p.png")).unwrap();
        std::fs::write(split.join("labels.json"), r#"{"p.png": {"typed_words": []}}"#).unwrap();

        let ds = named_dataset("sroie", root.path(), false).unwrap();
        assert_eq!(ds.name(), "SROIE");
        assert_eq!(ds.len(), 1);
        assert!(named_dataset("sroie", root.path(), true).is_err());
    }
}
