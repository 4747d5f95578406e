//! Ground-truth annotations attached to each page.

use crate::core::{OCRError, OcrResult};
use image::RgbImage;
use serde::Serialize;

/// Coordinate convention of a set of boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    /// Integer pixel coordinates.
    Absolute,
    /// Coordinates normalized by page width and height.
    Relative,
}

/// Axis-aligned boxes as `[xmin, ymin, xmax, ymax]`, in one convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "boxes", rename_all = "lowercase")]
pub enum Boxes {
    Absolute(Vec<[i64; 4]>),
    Relative(Vec<[f32; 4]>),
}

impl Boxes {
    /// An empty box set in the given convention.
    pub fn empty(kind: BoxKind) -> Self {
        match kind {
            BoxKind::Absolute => Boxes::Absolute(Vec::new()),
            BoxKind::Relative => Boxes::Relative(Vec::new()),
        }
    }

    pub fn kind(&self) -> BoxKind {
        match self {
            Boxes::Absolute(_) => BoxKind::Absolute,
            Boxes::Relative(_) => BoxKind::Relative,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Boxes::Absolute(b) => b.len(),
            Boxes::Relative(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Boxes widened to `f64`, whatever their convention.
    pub fn to_f64(&self) -> Vec<[f64; 4]> {
        match self {
            Boxes::Absolute(b) => b.iter().map(|bb| bb.map(|v| v as f64)).collect(),
            Boxes::Relative(b) => b.iter().map(|bb| bb.map(|v| v as f64)).collect(),
        }
    }
}

/// Word boxes and their transcriptions, one-to-one by index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    boxes: Boxes,
    labels: Vec<String>,
}

impl Target {
    /// Pairs boxes with labels.
    ///
    /// # Errors
    ///
    /// Returns [`OCRError::InvalidInput`] when the counts differ.
    pub fn new(boxes: Boxes, labels: Vec<String>) -> OcrResult<Self> {
        if boxes.len() != labels.len() {
            return Err(OCRError::invalid_input(format!(
                "target has {} boxes but {} labels",
                boxes.len(),
                labels.len()
            )));
        }
        Ok(Self { boxes, labels })
    }

    pub fn boxes(&self) -> &Boxes {
        &self.boxes
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// One dataset entry: a decoded page and its annotations.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: String,
    pub page: RgbImage,
    pub target: Target,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rejects_length_mismatch() {
        let boxes = Boxes::Absolute(vec![[0, 0, 10, 10]]);
        assert!(Target::new(boxes, vec![]).is_err());
    }

    #[test]
    fn test_boxes_report_their_convention() {
        let rel = Boxes::Relative(vec![[0.1, 0.1, 0.2, 0.2]]);
        assert_eq!(rel.kind(), BoxKind::Relative);
        assert_eq!(Boxes::empty(BoxKind::Absolute).kind(), BoxKind::Absolute);
        assert!(Boxes::empty(BoxKind::Relative).is_empty());
    }

    #[test]
    fn test_to_f64_widens_absolute_boxes() {
        let boxes = Boxes::Absolute(vec![[1, 2, 3, 4]]);
        assert_eq!(boxes.to_f64(), vec![[1.0, 2.0, 3.0, 4.0]]);
    }
}
