//! Confidence-weighted text extraction.
//!
//! Turns raw OCR tokens into the document the scorer sees: tokens at or
//! below the confidence threshold are discarded outright (not merely
//! down-weighted), survivors are space-joined and lower-cased, and the
//! aggregate confidence is the arithmetic mean of the survivors'
//! normalized confidences.

use crate::ocr::OcrToken;
use serde::Serialize;

/// Text extracted from one image with its aggregate OCR confidence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedText {
    /// Space-joined, lower-cased surviving tokens.
    pub text: String,
    /// Mean confidence of the surviving tokens, in [0, 1]. 0.0 when
    /// nothing survived.
    pub confidence: f32,
}

impl ExtractedText {
    /// The empty extraction used when OCR fails or nothing survives.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
        }
    }
}

/// Filters tokens by confidence and assembles the extracted document.
pub fn extract_text(tokens: &[OcrToken], confidence_threshold: f32) -> ExtractedText {
    let surviving: Vec<&OcrToken> = tokens
        .iter()
        .filter(|token| normalize(token.confidence) > confidence_threshold)
        .collect();

    if surviving.is_empty() {
        return ExtractedText::empty();
    }

    let text = surviving
        .iter()
        .map(|token| token.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let confidence =
        surviving.iter().map(|t| normalize(t.confidence)).sum::<f32>() / surviving.len() as f32;

    ExtractedText { text, confidence }
}

/// Maps Tesseract's 0-100 confidence onto [0, 1].
fn normalize(confidence: f32) -> f32 {
    (confidence / 100.0).clamp(0.0, 1.0)
}
