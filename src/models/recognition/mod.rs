//! Text recognition models.

pub mod crnn;
pub mod vocabs;

pub use crnn::{CRNNModel, CRNNModelBuilder, CRNNPreprocessConfig};
