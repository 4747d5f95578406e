//! Greedy CTC decoding of recognition logits.

use crate::core::{OCRError, OcrResult};
use ndarray::{ArrayView2, ArrayView3, Axis};

/// Greedy CTC decoder over a fixed character vocabulary.
///
/// The model is expected to emit `[batch, steps, vocab_len + 1]` logits where
/// the last class is the CTC blank.
#[derive(Debug, Clone)]
pub struct CTCLabelDecode {
    characters: Vec<char>,
}

impl CTCLabelDecode {
    /// Creates a decoder for the given vocabulary, one class per character.
    pub fn new(vocab: &str) -> Self {
        Self {
            characters: vocab.chars().collect(),
        }
    }

    /// Number of classes the model must produce, blank included.
    pub fn num_classes(&self) -> usize {
        self.characters.len() + 1
    }

    fn blank(&self) -> usize {
        self.characters.len()
    }

    /// Decodes a batch of logits into `(text, confidence)` pairs.
    ///
    /// Confidence is the lowest per-step probability along the best path, so a
    /// word is only as certain as its least certain character.
    pub fn decode(&self, logits: &ArrayView3<f32>) -> OcrResult<Vec<(String, f32)>> {
        let classes = logits.shape()[2];
        if classes != self.num_classes() {
            return Err(OCRError::unexpected_output_shape(
                "ctc decoder",
                format!("{} classes (vocab + blank)", self.num_classes()),
                logits.shape(),
            ));
        }

        Ok(logits
            .axis_iter(Axis(0))
            .map(|sequence| self.decode_sequence(&sequence))
            .collect())
    }

    fn decode_sequence(&self, sequence: &ArrayView2<f32>) -> (String, f32) {
        let mut text = String::new();
        let mut confidence = 1.0f32;
        let mut previous = None;

        for step in sequence.axis_iter(Axis(0)) {
            let (best, prob) = softmax_argmax(step.iter().copied());
            confidence = confidence.min(prob);

            if best != self.blank()
                && previous != Some(best)
                && let Some(&ch) = self.characters.get(best)
            {
                text.push(ch);
            }
            previous = Some(best);
        }

        if sequence.is_empty() {
            confidence = 0.0;
        }
        (text, confidence)
    }
}

/// Index of the largest logit and its softmax probability.
fn softmax_argmax(logits: impl Iterator<Item = f32> + Clone) -> (usize, f32) {
    let (best, max) = logits
        .clone()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |acc, (i, v)| {
            if v > acc.1 { (i, v) } else { acc }
        });
    let denom: f32 = logits.map(|v| (v - max).exp()).sum();
    let prob = if denom > 0.0 { 1.0 / denom } else { 0.0 };
    (best, prob)
}
