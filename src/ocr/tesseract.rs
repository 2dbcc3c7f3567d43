//! Tesseract OCR backend.
//!
//! A fresh Tesseract handle is created per call: handles are not safe to
//! share across threads, and per-call construction keeps the engine free
//! of cross-call state so concurrent analyses never contend.

use crate::core::{EngineError, EngineResult, Stage};
use crate::ocr::{parse_tsv, OcrToken, TextRecognizer};
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;
use tesseract::{PageSegMode, Tesseract};
use tracing::debug;

/// Word-level OCR via Tesseract.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    language: String,
}

impl TesseractRecognizer {
    /// Creates a recognizer for the given Tesseract language code.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> EngineResult<Vec<OcrToken>> {
        // Hand the grid over in-memory as PNG; Tesseract re-decodes it via
        // Leptonica.
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| EngineError::processing(Stage::Ocr, "encode preprocessed image", e))?;

        let mut engine = Tesseract::new(None, Some(&self.language))
            .map_err(|e| EngineError::processing(Stage::Ocr, "initialize tesseract", e))?
            .set_image_from_mem(&png)
            .map_err(|e| EngineError::processing(Stage::Ocr, "set image", e))?;
        engine.set_page_seg_mode(PageSegMode::PsmAuto);

        let tsv = engine
            .get_tsv_text(0)
            .map_err(|e| EngineError::processing(Stage::Ocr, "extract tsv", e))?;

        let tokens = parse_tsv(&tsv);
        debug!(words = tokens.len(), "tesseract recognition complete");
        Ok(tokens)
    }
}
