//! Image and tensor processors shared by the detection and recognition models.
//!
//! - [`NormalizeImage`] turns RGB images into normalized NCHW batches
//! - [`resize`] holds the aspect-preserving and fixed-size resizers
//! - [`DBPostProcess`] converts probability maps into word boxes
//! - [`CTCLabelDecode`] greedily decodes recognition logits into text

pub mod ctc_decode;
pub mod db_postprocess;
pub mod geometry;
pub mod normalization;
pub mod resize;

pub use ctc_decode::CTCLabelDecode;
pub use db_postprocess::{DBPostProcess, RelativeDetection};
pub use geometry::{BoundingBox, Point};
pub use normalization::NormalizeImage;
pub use resize::{resize_exact, resize_keep_ratio};
