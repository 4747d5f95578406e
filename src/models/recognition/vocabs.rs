//! Character vocabularies for CTC recognition models.

use crate::core::{OCRError, OcrResult};
use std::path::Path;

const DIGITS: &str = "0123456789";
const ASCII_LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const CURRENCY: &str = "£€¥¢฿";
const FRENCH_ACCENTS: &str = "°àâéèêëîïôùûçÀÂÉÈËÎÏÔÙÛÇ";

/// The default vocabulary the stock recognition models are trained on.
pub fn french() -> String {
    [DIGITS, ASCII_LETTERS, PUNCTUATION, FRENCH_ACCENTS, CURRENCY].concat()
}

/// Reads a vocabulary file with one symbol per line.
///
/// A line holding a single space is a valid symbol, a fully empty line is
/// skipped.
pub fn load_vocab(path: &Path) -> OcrResult<String> {
    let content = std::fs::read_to_string(path)?;
    let vocab: String = content
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();

    if vocab.is_empty() {
        return Err(OCRError::config_error_detailed(
            "recognition vocabulary",
            format!("'{}' contains no symbols", path.display()),
        ));
    }
    Ok(vocab)
}
