//! ONNX-backed text detection and recognition models.
//!
//! Each model owns its preprocessing and post-processing and exposes a
//! `forward` that goes from images to task output.

pub mod detection;
pub mod recognition;

pub use detection::{DBModel, DBModelBuilder, DBPreprocessConfig};
pub use recognition::{CRNNModel, CRNNModelBuilder, CRNNPreprocessConfig};
