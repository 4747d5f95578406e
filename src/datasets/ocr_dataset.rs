//! Image folder + JSON label file datasets.

use super::target::{BoxKind, Boxes, Sample, Target};
use super::Dataset;
use crate::core::{OCRError, OcrResult};
use crate::utils::load_image;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct LabelEntry {
    #[serde(default)]
    typed_words: Vec<TypedWord>,
}

#[derive(Debug, Deserialize)]
struct TypedWord {
    value: String,
    geometry: Vec<Value>,
}

#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
    target: Target,
}

/// A dataset read from a folder of page images and a label file.
///
/// The label file maps image names to their words:
///
/// ```json
/// { "page.png": { "typed_words": [ { "value": "Hello", "geometry": [10, 20, 60, 35] } ] } }
/// ```
///
/// Geometry is either `[xmin, ymin, xmax, ymax]` or a list of `[x, y]`
/// points. When every coordinate in the file is an integer the boxes are
/// absolute pixels, otherwise they are relative to the page size.
#[derive(Debug)]
pub struct OCRDataset {
    name: String,
    box_kind: BoxKind,
    entries: Vec<Entry>,
}

impl OCRDataset {
    /// Reads the label file and checks that every referenced image exists.
    pub fn new(img_folder: impl AsRef<Path>, label_file: impl AsRef<Path>) -> OcrResult<Self> {
        let img_folder = img_folder.as_ref();
        let label_file = label_file.as_ref();

        if !img_folder.is_dir() {
            return Err(OCRError::dataset(img_folder, "image folder does not exist"));
        }
        let raw = std::fs::read_to_string(label_file)
            .map_err(|e| OCRError::dataset(label_file, format!("cannot read label file: {e}")))?;
        let labels: BTreeMap<String, LabelEntry> = serde_json::from_str(&raw)
            .map_err(|e| OCRError::dataset(label_file, format!("invalid label file: {e}")))?;

        let mut all_integer = true;
        let mut parsed = Vec::with_capacity(labels.len());
        for (name, entry) in labels {
            let path = img_folder.join(&name);
            if !path.is_file() {
                return Err(OCRError::dataset(
                    label_file,
                    format!("missing image '{}'", path.display()),
                ));
            }

            let mut boxes = Vec::with_capacity(entry.typed_words.len());
            let mut words = Vec::with_capacity(entry.typed_words.len());
            for word in entry.typed_words {
                let (bbox, integer) = parse_geometry(&word.geometry).ok_or_else(|| {
                    OCRError::dataset(
                        label_file,
                        format!("unsupported geometry for word '{}' in '{name}'", word.value),
                    )
                })?;
                all_integer &= integer;
                boxes.push(bbox);
                words.push(word.value);
            }
            parsed.push((name, path, boxes, words));
        }

        let box_kind = if all_integer {
            BoxKind::Absolute
        } else {
            BoxKind::Relative
        };

        let entries = parsed
            .into_iter()
            .map(|(name, path, boxes, words)| {
                let boxes = match box_kind {
                    BoxKind::Absolute => Boxes::Absolute(
                        boxes
                            .iter()
                            .map(|b| b.map(|v| (v as i64).max(0)))
                            .collect(),
                    ),
                    BoxKind::Relative => {
                        Boxes::Relative(boxes.iter().map(|b| b.map(|v| v as f32)).collect())
                    }
                };
                Ok(Entry {
                    name,
                    path,
                    target: Target::new(boxes, words)?,
                })
            })
            .collect::<OcrResult<Vec<_>>>()?;

        tracing::info!(
            "Loaded {} pages ({:?} boxes) from {}",
            entries.len(),
            box_kind,
            label_file.display()
        );

        Ok(Self {
            name: "OCRDataset".to_string(),
            box_kind,
            entries,
        })
    }

    /// Renames the dataset, as shown in the evaluation summary.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Coordinate convention of the ground-truth boxes.
    pub fn box_kind(&self) -> BoxKind {
        self.box_kind
    }
}

impl Dataset for OCRDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = OcrResult<Sample>> + '_> {
        Box::new(self.entries.iter().map(|entry| {
            Ok(Sample {
                name: entry.name.clone(),
                page: load_image(&entry.path)?,
                target: entry.target.clone(),
            })
        }))
    }
}

/// Returns the enclosing `[xmin, ymin, xmax, ymax]` of a geometry and whether
/// all of its coordinates are integers.
fn parse_geometry(geometry: &[Value]) -> Option<([f64; 4], bool)> {
    let number = |v: &Value| v.as_f64().map(|f| (f, v.is_i64() || v.is_u64()));

    if geometry.len() == 4 && geometry.iter().all(Value::is_number) {
        let mut coords = [0.0; 4];
        let mut integer = true;
        for (slot, v) in coords.iter_mut().zip(geometry) {
            let (f, is_int) = number(v)?;
            *slot = f;
            integer &= is_int;
        }
        return Some((coords, integer));
    }

    if geometry.is_empty() {
        return None;
    }
    let mut bbox = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
    let mut integer = true;
    for point in geometry {
        let [x, y] = point.as_array()?.as_slice() else {
            return None;
        };
        let (x, x_int) = number(x)?;
        let (y, y_int) = number(y)?;
        integer &= x_int && y_int;
        bbox = [bbox[0].min(x), bbox[1].min(y), bbox[2].max(x), bbox[3].max(y)];
    }
    Some((bbox, integer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    fn write_fixture(labels: &str, images: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let img_dir = dir.path().join("images");
        std::fs::create_dir(&img_dir).unwrap();
        for name in images {
            RgbImage::new(40, 20).save(img_dir.join(name)).unwrap();
        }
        std::fs::write(dir.path().join("labels.json"), labels).unwrap();
        dir
    }

    #[test]
    fn test_integer_geometry_yields_absolute_boxes() {
        let dir = write_fixture(
            r#"{"b.png": {"typed_words": [{"value": "x", "geometry": [-3, 2, 10, 12]}]},
                "a.png": {"typed_words": []}}"#,
            &["a.png", "b.png"],
        );
        let ds = OCRDataset::new(dir.path().join("images"), dir.path().join("labels.json"))
            .unwrap();

        assert_eq!(ds.name(), "OCRDataset");
        assert_eq!(ds.box_kind(), BoxKind::Absolute);
        let samples: Vec<Sample> = ds.iter().collect::<OcrResult<_>>().unwrap();
        assert_eq!(samples[0].name, "a.png");
        assert_eq!(samples[1].target.boxes(), &Boxes::Absolute(vec![[0, 2, 10, 12]]));
        assert_eq!(samples[1].page.dimensions(), (40, 20));
    }

    #[test]
    fn test_float_geometry_yields_relative_boxes() {
        let dir = write_fixture(
            r#"{"a.png": {"typed_words": [
                {"value": "x", "geometry": [[0.1, 0.2], [0.5, 0.2], [0.5, 0.4], [0.1, 0.4]]},
                {"value": "y", "geometry": [1, 1, 2, 2]}]}}"#,
            &["a.png"],
        );
        let ds = OCRDataset::new(dir.path().join("images"), dir.path().join("labels.json"))
            .unwrap();

        assert_eq!(ds.box_kind(), BoxKind::Relative);
        let sample = ds.iter().next().unwrap().unwrap();
        let Boxes::Relative(boxes) = sample.target.boxes() else {
            panic!("expected relative boxes");
        };
        assert!((boxes[0][2] - 0.5).abs() < 1e-6);
        assert_eq!(sample.target.labels(), &["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_missing_image_fails_at_construction() {
        let dir = write_fixture(r#"{"ghost.png": {"typed_words": []}}"#, &[]);
        let err = OCRDataset::new(dir.path().join("images"), dir.path().join("labels.json"))
            .unwrap_err();
        assert!(matches!(err, OCRError::Dataset { .. }));
    }

    #[test]
    fn test_malformed_geometry_is_rejected() {
        let dir = write_fixture(
            r#"{"a.png": {"typed_words": [{"value": "x", "geometry": [1, 2, 3]}]}}"#,
            &["a.png"],
        );
        assert!(
            OCRDataset::new(dir.path().join("images"), dir.path().join("labels.json")).is_err()
        );
    }
}
