//! Registry of supported model architectures.

use crate::core::{OCRError, OcrResult};
use crate::models::{CRNNPreprocessConfig, DBPreprocessConfig};
use std::path::{Path, PathBuf};

/// Detection architectures with known preprocessing.
pub const DETECTION_ARCHS: &[&str] = &["db_resnet50", "db_mobilenet_v3_large", "linknet16"];

/// Recognition architectures with known preprocessing.
pub const RECOGNITION_ARCHS: &[&str] = &[
    "crnn_vgg16_bn",
    "crnn_mobilenet_v3_small",
    "crnn_mobilenet_v3_large",
];

/// Input geometry and normalization an architecture was trained with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchParams {
    /// `(height, width)` of the network input.
    pub input_size: (u32, u32),
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

const DB_PARAMS: ArchParams = ArchParams {
    input_size: (1024, 1024),
    mean: [0.798, 0.785, 0.772],
    std: [0.264, 0.2749, 0.287],
};

const CRNN_PARAMS: ArchParams = ArchParams {
    input_size: (32, 128),
    mean: [0.694, 0.695, 0.693],
    std: [0.299, 0.296, 0.301],
};

/// A model located on disk with the parameters to drive it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    /// Architecture name, or the file stem for ad-hoc model files.
    pub name: String,
    /// Path to the `.onnx` graph.
    pub model_path: PathBuf,
    pub params: ArchParams,
}

impl ResolvedModel {
    /// Sidecar vocabulary file next to the graph (`<stem>.txt`).
    pub fn vocab_path(&self) -> PathBuf {
        self.model_path.with_extension("txt")
    }

    pub fn detection_config(&self) -> DBPreprocessConfig {
        DBPreprocessConfig {
            input_size: self.params.input_size,
            mean: self.params.mean,
            std: self.params.std,
            ..DBPreprocessConfig::default()
        }
    }

    pub fn recognition_config(&self) -> CRNNPreprocessConfig {
        CRNNPreprocessConfig {
            input_size: self.params.input_size,
            mean: self.params.mean,
            std: self.params.std,
        }
    }
}

/// Resolves a detection architecture name or `.onnx` path.
pub fn resolve_detection(arch: &str, models_dir: &Path) -> OcrResult<ResolvedModel> {
    resolve(arch, models_dir, DETECTION_ARCHS, DB_PARAMS, "detection")
}

/// Resolves a recognition architecture name or `.onnx` path.
pub fn resolve_recognition(arch: &str, models_dir: &Path) -> OcrResult<ResolvedModel> {
    resolve(arch, models_dir, RECOGNITION_ARCHS, CRNN_PARAMS, "recognition")
}

fn resolve(
    arch: &str,
    models_dir: &Path,
    known: &[&str],
    params: ArchParams,
    kind: &str,
) -> OcrResult<ResolvedModel> {
    if known.contains(&arch) {
        return Ok(ResolvedModel {
            name: arch.to_string(),
            model_path: models_dir.join(format!("{arch}.onnx")),
            params,
        });
    }

    let path = Path::new(arch);
    let is_onnx = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("onnx"));
    if is_onnx && path.is_file() {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| arch.to_string());
        return Ok(ResolvedModel {
            name,
            model_path: path.to_path_buf(),
            params,
        });
    }

    Err(OCRError::config_error_with_suggestion(
        format!("{kind} architecture"),
        format!("unknown architecture '{arch}'"),
        format!("use one of {} or a path to an .onnx file", known.join(", ")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_arch_maps_to_models_dir() {
        let model = resolve_detection("db_resnet50", Path::new("models")).unwrap();
        assert_eq!(model.name, "db_resnet50");
        assert_eq!(model.model_path, Path::new("models/db_resnet50.onnx"));
        assert_eq!(model.vocab_path(), Path::new("models/db_resnet50.txt"));
        assert_eq!(model.detection_config(), DBPreprocessConfig::default());
    }

    #[test]
    fn test_existing_onnx_path_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my_reco.onnx");
        std::fs::write(&path, b"").unwrap();

        let model = resolve_recognition(path.to_str().unwrap(), Path::new("models")).unwrap();
        assert_eq!(model.name, "my_reco");
        assert_eq!(model.model_path, path);
        assert_eq!(model.recognition_config().input_size, (32, 128));
    }

    #[test]
    fn test_unknown_arch_is_a_config_error() {
        let err = resolve_recognition("sar_resnet31", Path::new("models")).unwrap_err();
        assert!(matches!(err, OCRError::ConfigError { .. }));
        assert!(err.to_string().contains("crnn_vgg16_bn"));
    }

    #[test]
    fn test_kinds_do_not_mix() {
        assert!(resolve_detection("crnn_vgg16_bn", Path::new("models")).is_err());
    }
}
