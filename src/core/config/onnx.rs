//! ONNX Runtime configuration types and device parsing.

use crate::core::errors::OCRError;
use serde::{Deserialize, Serialize};

/// Execution providers for ONNX Runtime.
///
/// CUDA is only usable when the `cuda` cargo feature is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum OrtExecutionProvider {
    /// CPU execution provider (always available)
    #[default]
    CPU,
    /// NVIDIA CUDA execution provider. Its memory arena grows on demand.
    CUDA {
        /// CUDA device ID (default: 0)
        device_id: Option<i32>,
    },
}

/// Configuration for ONNX Runtime sessions.
///
/// The same configuration is applied to the detection and the recognition
/// session of a predictor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution within nodes
    pub intra_threads: Option<usize>,
    /// Execution providers in order of preference
    pub execution_providers: Option<Vec<OrtExecutionProvider>>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the execution providers, in order of preference.
    pub fn with_execution_providers(mut self, providers: Vec<OrtExecutionProvider>) -> Self {
        self.execution_providers = Some(providers);
        self
    }
}

/// Parses a device string into a session configuration.
///
/// - `"cpu"` -> `Ok(None)`, the CPU provider is the default
/// - `"cuda"` / `"cuda:N"` -> CUDA on device `N` with on-demand memory growth,
///   falling back to the CPU provider
pub fn parse_device_config(device: &str) -> Result<Option<OrtSessionConfig>, OCRError> {
    let device_lower = device.trim().to_lowercase();

    if device_lower == "cpu" {
        return Ok(None);
    }

    if device_lower.starts_with("cuda") {
        let device_id = if device_lower == "cuda" {
            0
        } else if let Some(id_str) = device_lower.strip_prefix("cuda:") {
            id_str
                .parse::<i32>()
                .map_err(|_| OCRError::invalid_field("device", "'cuda' or 'cuda:N'", device))?
        } else {
            return Err(OCRError::invalid_field(
                "device",
                "'cuda' or 'cuda:N'",
                device,
            ));
        };

        if !cfg!(feature = "cuda") {
            return Err(OCRError::config_error_with_suggestion(
                "device selection",
                format!("CUDA device '{device}' requested but the cuda feature is not enabled"),
                "rebuild with `--features cuda`",
            ));
        }

        let config = OrtSessionConfig::new().with_execution_providers(vec![
            OrtExecutionProvider::CUDA {
                device_id: Some(device_id),
            },
            OrtExecutionProvider::CPU,
        ]);
        return Ok(Some(config));
    }

    Err(OCRError::invalid_field(
        "device",
        "'cpu', 'cuda' or 'cuda:N'",
        device,
    ))
}
