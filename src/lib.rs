//! # Signwarden
//!
//! A compliance engine for outdoor billboard photographs: extracts visible
//! text with OCR, scores it against a configured vocabulary of prohibited
//! terms (nudity, gambling, alcohol, ...), and produces a structured
//! verdict with matched keywords, contextual snippets, a 0-10 severity
//! score, and approximate text-region bounding boxes.
//!
//! ## Pipeline
//!
//! One synchronous pass per image:
//!
//! 1. **Decode** raw bytes into a pixel grid
//! 2. **Preprocess** for OCR quality: cubic upscale, luminance, CLAHE,
//!    bilateral smoothing, Otsu binarization
//! 3. **Extract text** with word-level confidences, discarding tokens at
//!    or below the confidence threshold
//! 4. **Localize regions** of connected ink, independently of OCR
//! 5. **Score violations** sentence by sentence with a co-occurrence
//!    severity heuristic
//! 6. **Compose** everything into a [`Verdict`](pipeline::Verdict)
//!
//! Failures degrade, they never propagate: an undecodable image or an OCR
//! breakdown yields a compliant-by-default verdict flagged with
//! `analysis_complete == false` rather than an error.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use signwarden::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ViolationEngine::new(EngineConfig::default())?;
//!
//! let bytes = std::fs::read("billboard.jpg")?;
//! let verdict = engine.analyze(&bytes);
//!
//! println!(
//!     "{} (severity {} / {:.1})",
//!     verdict.status, verdict.severity_level, verdict.severity_score
//! );
//! for keyword in &verdict.violations_found {
//!     println!("matched: {keyword}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! * [`core`] - configuration and error types
//! * [`processors`] - image preprocessing and region localization
//! * [`ocr`] - the OCR seam and the Tesseract backend
//! * [`scoring`] - keyword matching and the severity heuristic
//! * [`pipeline`] - engine orchestration and the verdict

pub mod core;
pub mod ocr;
pub mod pipeline;
pub mod processors;
pub mod scoring;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{ConfigError, EngineConfig, EngineError, EngineResult};
    pub use crate::ocr::{OcrToken, TesseractRecognizer, TextRecognizer};
    pub use crate::pipeline::{ComplianceStatus, Verdict, ViolationEngine};
    pub use crate::processors::TextRegion;
    pub use crate::scoring::{SeverityLevel, ViolationMatch, ViolationReport};
}
