//! Intersection-over-union between axis-aligned boxes.

use ndarray::Array2;

fn area(b: &[f64; 4]) -> f64 {
    (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0)
}

/// Pairwise IoU between two sets of `[xmin, ymin, xmax, ymax]` boxes.
///
/// Returns a `a.len() x b.len()` matrix. Pairs with an empty union score 0.
pub fn box_iou(a: &[[f64; 4]], b: &[[f64; 4]]) -> Array2<f64> {
    let mut iou = Array2::<f64>::zeros((a.len(), b.len()));
    for (i, ba) in a.iter().enumerate() {
        let area_a = area(ba);
        for (j, bb) in b.iter().enumerate() {
            let left = ba[0].max(bb[0]);
            let top = ba[1].max(bb[1]);
            let right = ba[2].min(bb[2]);
            let bottom = ba[3].min(bb[3]);
            let inter = (right - left).max(0.0) * (bottom - top).max(0.0);
            let union = area_a + area(bb) - inter;
            if union > 0.0 {
                iou[[i, j]] = inter / union;
            }
        }
    }
    iou
}
