//! Bounding box based image cropping utilities.

use crate::datasets::Boxes;
use image::{RgbImage, imageops};

/// Bounding box based image cropping utilities.
pub struct BBoxCrop;

impl BBoxCrop {
    /// Crops the pixel rectangle `[xmin, ymin, xmax, ymax]` out of an image.
    ///
    /// Coordinates are rounded and clamped to the image; the result is at
    /// least one pixel wide and high, so degenerate boxes still produce a crop.
    pub fn crop_pixels(image: &RgbImage, bbox: [f64; 4]) -> RgbImage {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return RgbImage::new(1, 1);
        }

        let clamp = |v: f64, max: u32| (v.round().max(0.0) as u32).min(max);
        let x1 = clamp(bbox[0], width - 1);
        let y1 = clamp(bbox[1], height - 1);
        let x2 = clamp(bbox[2], width).max(x1 + 1);
        let y2 = clamp(bbox[3], height).max(y1 + 1);

        imageops::crop_imm(image, x1, y1, x2 - x1, y2 - y1).to_image()
    }
}

/// Crops every box of a page, in order.
///
/// Relative boxes are scaled by the page size first.
pub fn extract_crops(page: &RgbImage, boxes: &Boxes) -> Vec<RgbImage> {
    let (w, h) = (page.width() as f64, page.height() as f64);
    match boxes {
        Boxes::Absolute(b) => b
            .iter()
            .map(|bb| BBoxCrop::crop_pixels(page, bb.map(|v| v as f64)))
            .collect(),
        Boxes::Relative(b) => b
            .iter()
            .map(|bb| {
                let [x1, y1, x2, y2] = bb.map(|v| v as f64);
                BBoxCrop::crop_pixels(page, [x1 * w, y1 * h, x2 * w, y2 * h])
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn page() -> RgbImage {
        RgbImage::from_fn(100, 50, |x, _| Rgb([x as u8, 0, 0]))
    }

    #[test]
    fn test_relative_boxes_scale_with_page() {
        let crops = extract_crops(&page(), &Boxes::Relative(vec![[0.1, 0.2, 0.5, 0.6]]));
        assert_eq!(crops[0].dimensions(), (40, 20));
        assert_eq!(crops[0].get_pixel(0, 0)[0], 10);
    }

    #[test]
    fn test_absolute_boxes_are_clamped_to_page() {
        let crops = extract_crops(&page(), &Boxes::Absolute(vec![[90, 40, 300, 300]]));
        assert_eq!(crops[0].dimensions(), (10, 10));
    }

    #[test]
    fn test_degenerate_box_yields_single_pixel() {
        let crop = BBoxCrop::crop_pixels(&page(), [120.0, 60.0, 110.0, 55.0]);
        assert_eq!(crop.dimensions(), (1, 1));
    }
}
