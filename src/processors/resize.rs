//! Resizing helpers for model inputs.

use image::RgbImage;
use image::imageops::{self, FilterType};

/// Resizes an image to exactly `width x height`, ignoring its aspect ratio.
pub fn resize_exact(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// Scales an image so that it fits inside `max_width x max_height` while
/// keeping its aspect ratio.
///
/// The side that limits the scale matches the target exactly. Neither side
/// goes below one pixel.
pub fn resize_keep_ratio(image: &RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return RgbImage::new(1, 1);
    }

    let scale = (max_width as f32 / w as f32).min(max_height as f32 / h as f32);
    let new_w = ((w as f32 * scale).round() as u32).clamp(1, max_width);
    let new_h = ((h as f32 * scale).round() as u32).clamp(1, max_height);
    resize_exact(image, new_w, new_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_crop_is_limited_by_width() {
        let img = RgbImage::new(400, 20);
        let out = resize_keep_ratio(&img, 128, 32);
        assert_eq!(out.dimensions(), (128, 6));
    }

    #[test]
    fn test_tall_crop_is_limited_by_height() {
        let img = RgbImage::new(20, 40);
        let out = resize_keep_ratio(&img, 128, 32);
        assert_eq!(out.dimensions(), (16, 32));
    }

    #[test]
    fn test_resize_exact_changes_both_sides() {
        let img = RgbImage::new(30, 10);
        assert_eq!(resize_exact(&img, 64, 64).dimensions(), (64, 64));
    }
}
