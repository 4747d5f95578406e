//! Runtime configuration for inference sessions.

pub mod onnx;

pub use onnx::*;
