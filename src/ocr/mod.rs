//! OCR integration.
//!
//! The pipeline talks to OCR through the [`TextRecognizer`] trait so the
//! backend can be swapped: production uses [`TesseractRecognizer`], tests
//! use fixed-output doubles, and deployments whose OCR runtime is not
//! safe for concurrent use can wrap a worker pool behind the same trait.

pub mod tesseract;

pub use tesseract::TesseractRecognizer;

use crate::core::EngineResult;
use image::GrayImage;

/// One recognized token with its confidence on Tesseract's 0-100 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrToken {
    /// The recognized word.
    pub text: String,
    /// Word confidence, 0-100.
    pub confidence: f32,
}

/// A word-level OCR backend.
pub trait TextRecognizer: Send + Sync {
    /// Recognizes words in a preprocessed binary image.
    ///
    /// # Errors
    ///
    /// Returns an OCR stage error when the backend fails. The pipeline
    /// absorbs this into an empty extraction; it never aborts an analysis.
    fn recognize(&self, image: &GrayImage) -> EngineResult<Vec<OcrToken>>;
}

/// Parses Tesseract TSV output into word tokens.
///
/// Word rows have level 5 and a non-negative confidence; structural rows
/// (page/block/paragraph/line) carry confidence -1 and are skipped, as are
/// malformed lines and whitespace-only words.
pub(crate) fn parse_tsv(tsv: &str) -> Vec<OcrToken> {
    tsv.lines()
        .filter_map(|line| {
            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() < 12 || columns[0] != "5" {
                return None;
            }
            let confidence: f32 = columns[10].parse().ok()?;
            if confidence < 0.0 {
                return None;
            }
            let text = columns[11].trim();
            if text.is_empty() {
                return None;
            }
            Some(OcrToken {
                text: text.to_string(),
                confidence,
            })
        })
        .collect()
}
