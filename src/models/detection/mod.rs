//! Text detection models.

pub mod db;

pub use db::{DBModel, DBModelBuilder, DBPreprocessConfig};
