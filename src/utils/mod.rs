//! Utility functions for the evaluation pipeline.
//!
//! Image loading, cropping helpers and logging setup.

pub mod bbox_crop;

pub use bbox_crop::{BBoxCrop, extract_crops};

use crate::core::{OCRError, OcrResult};
use image::RgbImage;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Output goes to
/// stderr so that stdout only carries results. Calling it twice is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Loads an image from disk and converts it to RGB.
pub fn load_image(path: &Path) -> OcrResult<RgbImage> {
    let img = image::open(path).map_err(OCRError::ImageLoad)?;
    tracing::debug!("Decoded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_image_converts_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::new(6, 4).save(&path).unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!(img.dimensions(), (6, 4));
    }

    #[test]
    fn test_load_image_reports_missing_file() {
        let err = load_image(Path::new("/nonexistent/page.png")).unwrap_err();
        assert!(matches!(err, OCRError::ImageLoad(_)));
    }
}
