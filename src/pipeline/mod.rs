//! Pipeline orchestration: text extraction, verdict composition, and the
//! engine that ties the stages together.

pub mod engine;
pub mod extract;
pub mod verdict;

pub use engine::ViolationEngine;
pub use extract::{extract_text, ExtractedText};
pub use verdict::{ComplianceStatus, Verdict};
