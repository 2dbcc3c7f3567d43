//! Image processing for the violation detection pipeline.
//!
//! * [`enhance`] - the OCR-oriented preprocessing chain
//! * [`clahe`] - tile-based contrast equalization used by the chain
//! * [`regions`] - connected-ink-region localization

pub mod clahe;
pub mod enhance;
pub mod regions;

pub use enhance::{PreprocessOutcome, Preprocessor};
pub use regions::{locate_text_regions, TextRegion};
