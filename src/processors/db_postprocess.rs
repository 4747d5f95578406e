//! Post-processing for segmentation-style text detection models.
//!
//! The [`DBPostProcess`] struct converts a probability heatmap into word
//! boxes by thresholding, outer-contour extraction, scoring and expansion.
//! Boxes are returned relative to the heatmap size, so they can be mapped to
//! any page size the heatmap was produced from.

#[path = "db_mask.rs"]
mod db_mask;

use crate::processors::geometry::BoundingBox;
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use ndarray::ArrayView2;

/// A detected word box in relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeDetection {
    /// `[xmin, ymin, xmax, ymax]`, each in `[0, 1]`.
    pub bbox: [f32; 4],
    /// Mean probability inside the box before expansion.
    pub score: f32,
}

/// Post-processor for probability-map text detectors (DB, LinkNet).
#[derive(Debug, Clone)]
pub struct DBPostProcess {
    /// Threshold for binarizing the prediction map (default: 0.3).
    pub thresh: f32,
    /// Minimum mean probability for a box to be kept (default: 0.1).
    pub box_thresh: f32,
    /// Maximum number of contours to consider (default: 1000).
    pub max_candidates: usize,
    /// Expansion ratio applied to the shrunk text kernels (default: 1.5).
    pub unclip_ratio: f32,
    /// Minimum side length, in heatmap pixels, of a candidate box.
    pub min_size: f32,
    /// Whether to dilate the binary mask before contour extraction.
    pub use_dilation: bool,
}

impl Default for DBPostProcess {
    fn default() -> Self {
        Self {
            thresh: 0.3,
            box_thresh: 0.1,
            max_candidates: 1000,
            unclip_ratio: 1.5,
            min_size: 2.0,
            use_dilation: false,
        }
    }
}

impl DBPostProcess {
    /// Creates a post-processor with optional overrides of the defaults.
    pub fn new(thresh: Option<f32>, box_thresh: Option<f32>, unclip_ratio: Option<f32>) -> Self {
        let defaults = Self::default();
        Self {
            thresh: thresh.unwrap_or(defaults.thresh),
            box_thresh: box_thresh.unwrap_or(defaults.box_thresh),
            unclip_ratio: unclip_ratio.unwrap_or(defaults.unclip_ratio),
            ..defaults
        }
    }

    /// Extracts relative word boxes from a single `H x W` probability map.
    pub fn apply(&self, pred: &ArrayView2<f32>) -> Vec<RelativeDetection> {
        let (height, width) = pred.dim();
        if height == 0 || width == 0 {
            return Vec::new();
        }

        let mut mask = GrayImage::new(width as u32, height as u32);
        for ((y, x), &p) in pred.indexed_iter() {
            if p > self.thresh {
                mask.put_pixel(x as u32, y as u32, Luma([255]));
            }
        }
        let mask = if self.use_dilation {
            self.dilate_mask_img(&mask)
        } else {
            mask
        };

        let contours = find_contours::<u32>(&mask);
        let mut detections = Vec::new();

        for contour in contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .take(self.max_candidates)
        {
            let polygon = BoundingBox::from_contour(contour);
            let (x1, y1, x2, y2) = polygon.aabb();
            // Contour points are pixel centres, the box spans whole pixels.
            let (x2, y2) = (x2 + 1.0, y2 + 1.0);
            if (x2 - x1).min(y2 - y1) < self.min_size {
                continue;
            }

            let score = Self::box_score(pred, x1 as usize, y1 as usize, x2 as usize, y2 as usize);
            if score < self.box_thresh {
                continue;
            }

            let rect = BoundingBox::from_coords(x1, y1, x2, y2);
            let perimeter = rect.perimeter();
            let distance = if perimeter > 0.0 {
                rect.area() * self.unclip_ratio / perimeter
            } else {
                0.0
            };

            let w = width as f32;
            let h = height as f32;
            detections.push(RelativeDetection {
                bbox: [
                    ((x1 - distance) / w).clamp(0.0, 1.0),
                    ((y1 - distance) / h).clamp(0.0, 1.0),
                    ((x2 + distance) / w).clamp(0.0, 1.0),
                    ((y2 + distance) / h).clamp(0.0, 1.0),
                ],
                score,
            });
        }

        tracing::debug!(
            "DBPostProcess: {} contours, {} boxes kept on {}x{} map",
            contours.len(),
            detections.len(),
            width,
            height
        );

        detections
    }

    /// Mean probability over the half-open pixel rectangle `[x1, x2) x [y1, y2)`.
    fn box_score(pred: &ArrayView2<f32>, x1: usize, y1: usize, x2: usize, y2: usize) -> f32 {
        let (height, width) = pred.dim();
        let (x2, y2) = (x2.min(width), y2.min(height));
        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }
        let region = pred.slice(ndarray::s![y1..y2, x1..x2]);
        region.sum() / region.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn heatmap_with_blocks(blocks: &[(usize, usize, usize, usize)]) -> Array2<f32> {
        let mut map = Array2::<f32>::zeros((40, 80));
        for &(x1, y1, x2, y2) in blocks {
            map.slice_mut(ndarray::s![y1..y2, x1..x2]).fill(0.9);
        }
        map
    }

    #[test]
    fn test_empty_heatmap_yields_no_boxes() {
        let map = Array2::<f32>::zeros((16, 16));
        assert!(DBPostProcess::default().apply(&map.view()).is_empty());
    }

    #[test]
    fn test_detects_each_blob_in_relative_coordinates() {
        let map = heatmap_with_blocks(&[(10, 10, 30, 20), (50, 20, 70, 30)]);
        let post = DBPostProcess {
            unclip_ratio: 0.0,
            ..DBPostProcess::default()
        };

        let mut boxes = post.apply(&map.view());
        boxes.sort_by(|a, b| a.bbox[0].total_cmp(&b.bbox[0]));

        assert_eq!(boxes.len(), 2);
        let first = boxes[0].bbox;
        assert!((first[0] - 10.0 / 80.0).abs() < 1e-5);
        assert!((first[1] - 10.0 / 40.0).abs() < 1e-5);
        assert!((first[2] - 30.0 / 80.0).abs() < 1e-5);
        assert!((first[3] - 20.0 / 40.0).abs() < 1e-5);
        assert!((boxes[0].score - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_unclip_expands_and_clips_boxes() {
        let map = heatmap_with_blocks(&[(0, 0, 20, 10)]);
        let boxes = DBPostProcess::default().apply(&map.view());

        assert_eq!(boxes.len(), 1);
        let [x1, y1, x2, y2] = boxes[0].bbox;
        assert_eq!(x1, 0.0);
        assert_eq!(y1, 0.0);
        assert!(x2 > 20.0 / 80.0);
        assert!(y2 > 10.0 / 40.0);
    }

    #[test]
    fn test_small_blobs_are_discarded() {
        let map = heatmap_with_blocks(&[(5, 5, 6, 6)]);
        assert!(DBPostProcess::default().apply(&map.view()).is_empty());
    }

    #[test]
    fn test_low_score_boxes_are_discarded() {
        let mut map = Array2::<f32>::zeros((20, 20));
        map.slice_mut(ndarray::s![5..10, 5..15]).fill(0.35);
        let post = DBPostProcess::new(None, Some(0.5), None);
        assert!(post.apply(&map.view()).is_empty());
    }
}
