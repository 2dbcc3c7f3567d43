//! The violation detection engine.
//!
//! One synchronous pipeline per call: decode, preprocess, then text
//! extraction and region localization over the same preprocessed grid,
//! keyword scoring over the extracted text, and composition into a
//! [`Verdict`]. Every stage failure is absorbed into a safe default at its
//! own stage; `analyze` never returns an error and never panics on bad
//! input.
//!
//! The engine holds only immutable state (configuration, vocabulary), so
//! concurrent callers can share one instance. Analyses are CPU-bound;
//! callers on an async runtime should dispatch them through their blocking
//! pool.

use crate::core::{ConfigError, EngineConfig};
use crate::ocr::{TesseractRecognizer, TextRecognizer};
use crate::pipeline::extract::{extract_text, ExtractedText};
use crate::pipeline::verdict::Verdict;
use crate::processors::{locate_text_regions, Preprocessor};
use crate::scoring::ViolationScorer;
use tracing::{debug, warn};

/// The billboard violation detection engine.
///
/// Generic over the OCR backend; production code uses the default
/// [`TesseractRecognizer`].
///
/// ```no_run
/// use signwarden::prelude::*;
///
/// # fn main() -> Result<(), signwarden::core::ConfigError> {
/// let engine = ViolationEngine::new(EngineConfig::default())?;
/// let verdict = engine.analyze(&std::fs::read("billboard.jpg").unwrap());
/// if !verdict.is_compliant {
///     println!("{}: {:?}", verdict.severity_level, verdict.violations_found);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ViolationEngine<R: TextRecognizer = TesseractRecognizer> {
    config: EngineConfig,
    preprocessor: Preprocessor,
    scorer: ViolationScorer,
    recognizer: R,
}

impl ViolationEngine<TesseractRecognizer> {
    /// Creates an engine backed by Tesseract.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let recognizer = TesseractRecognizer::new(config.ocr_language.clone());
        Self::with_recognizer(config, recognizer)
    }
}

impl<R: TextRecognizer> ViolationEngine<R> {
    /// Creates an engine with a custom OCR backend.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn with_recognizer(config: EngineConfig, recognizer: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::from_config(&config),
            scorer: ViolationScorer::from_config(&config),
            config,
            recognizer,
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyzes one image and produces a compliance verdict.
    ///
    /// Never fails: undecodable input or an OCR breakdown yields a
    /// degraded, fully-compliant verdict with `analysis_complete == false`
    /// and a diagnostic `error` instead.
    pub fn analyze(&self, image_bytes: &[u8]) -> Verdict {
        let image = match image::load_from_memory(image_bytes) {
            Ok(image) => image,
            Err(err) => {
                let err = crate::core::EngineError::Decode(err);
                warn!(error = %err, "input could not be decoded");
                return Verdict::degraded(err.to_string());
            }
        };
        debug!(
            width = image.width(),
            height = image.height(),
            "image decoded"
        );

        let preprocessed = self.preprocessor.run(&image);
        let mut failures = Vec::new();

        let (extracted, ocr_ok) = match self.recognizer.recognize(&preprocessed.image) {
            Ok(tokens) => (
                extract_text(&tokens, self.config.confidence_threshold),
                true,
            ),
            Err(err) => {
                warn!(error = %err, "ocr failed; continuing with empty text");
                failures.push(err.to_string());
                (ExtractedText::empty(), false)
            }
        };

        let regions =
            match locate_text_regions(&preprocessed.image, self.config.min_region_size) {
                Ok(regions) => regions,
                Err(err) => {
                    warn!(error = %err, "region scan failed; continuing without regions");
                    failures.push(err.to_string());
                    Vec::new()
                }
            };

        let report = self.scorer.score(&extracted.text);
        if !report.is_compliant() {
            debug!(
                keywords = ?report.matches.iter().map(|m| m.keyword.as_str()).collect::<Vec<_>>(),
                score = report.severity_score,
                "violations detected"
            );
        }

        let error = if failures.is_empty() {
            None
        } else {
            Some(failures.join("; "))
        };
        Verdict::compose(
            extracted,
            regions,
            report,
            self.config.max_text_chars,
            ocr_ok,
            error,
        )
    }
}
