use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology;

use super::DBPostProcess;

impl DBPostProcess {
    /// Dilates the binarized heatmap with a 3x3 square so that thin strokes
    /// split by the threshold join into one component.
    pub(super) fn dilate_mask_img(&self, mask_img: &GrayImage) -> GrayImage {
        morphology::dilate(mask_img, Norm::LInf, 1)
    }
}
