//! The engine's terminal result type.

use crate::pipeline::extract::ExtractedText;
use crate::processors::TextRegion;
use crate::scoring::{SeverityLevel, ViolationReport};
use serde::Serialize;

/// Compliance status of an analyzed billboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceStatus {
    /// No violation keywords found.
    Compliant,
    /// At least one violation keyword found.
    Unauthorized,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "Compliant"),
            ComplianceStatus::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

/// Complete, immutable analysis result for one image.
///
/// Serializes to the persistence payload consumed by the reporting layer.
/// `analysis_complete == false` means the verdict is a degraded fallback
/// (decode or OCR failed) and its compliant-by-default fields must not be
/// treated as proof of compliance. A populated `error` with
/// `analysis_complete == true` means a cosmetic stage (region
/// localization) failed while text analysis itself completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// True when no violation keyword was found.
    pub is_compliant: bool,
    /// Compliance status mirroring `is_compliant`.
    pub status: ComplianceStatus,
    /// Matched keywords, deduplicated, in first-found order.
    pub violations_found: Vec<String>,
    /// Number of distinct matched keywords.
    pub violation_count: usize,
    /// Distinct context windows of the matches' first occurrences, in
    /// first-found order. Co-occurring keywords sharing a window
    /// contribute one entry.
    pub violation_contexts: Vec<String>,
    /// Extracted text, truncated for storage and display.
    pub extracted_text: String,
    /// Aggregate OCR confidence in [0, 1].
    pub ocr_confidence: f32,
    /// Bucketed severity level.
    pub severity_level: SeverityLevel,
    /// Severity score in [0, 10].
    pub severity_score: f32,
    /// Bounding boxes of connected ink regions, in discovery order.
    pub text_regions: Vec<TextRegion>,
    /// False when the verdict is a degraded fallback.
    pub analysis_complete: bool,
    /// Diagnostic message when any stage failed.
    pub error: Option<String>,
}

impl Verdict {
    /// Merges the stage outputs into the final verdict.
    pub(crate) fn compose(
        extracted: ExtractedText,
        regions: Vec<TextRegion>,
        report: ViolationReport,
        max_text_chars: usize,
        analysis_complete: bool,
        error: Option<String>,
    ) -> Self {
        let is_compliant = report.is_compliant();
        let violations_found: Vec<String> =
            report.matches.iter().map(|m| m.keyword.clone()).collect();

        // Set semantics: matches in a shared window carry identical
        // contexts, which collapse to one entry.
        let mut violation_contexts: Vec<String> = Vec::new();
        for matched in &report.matches {
            if !violation_contexts.contains(&matched.context) {
                violation_contexts.push(matched.context.clone());
            }
        }

        Self {
            is_compliant,
            status: if is_compliant {
                ComplianceStatus::Compliant
            } else {
                ComplianceStatus::Unauthorized
            },
            violation_count: violations_found.len(),
            violations_found,
            violation_contexts,
            extracted_text: truncate_chars(&extracted.text, max_text_chars),
            ocr_confidence: extracted.confidence,
            severity_level: report.severity_level,
            severity_score: report.severity_score,
            text_regions: regions,
            analysis_complete,
            error,
        }
    }

    /// The fully-compliant fallback verdict for an analysis that could not
    /// run at all (e.g. undecodable input).
    pub(crate) fn degraded(error: String) -> Self {
        Self::compose(
            ExtractedText::empty(),
            Vec::new(),
            ViolationReport::compliant(),
            0,
            false,
            Some(error),
        )
    }
}

/// Truncates on a character boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("abcdef", 4), "abcd");
        assert_eq!(truncate_chars("abc", 10), "abc");
        // Multi-byte characters count as one.
        assert_eq!(truncate_chars("Füße näßen", 4), "Füße");
    }

    #[test]
    fn degraded_verdict_is_compliant_and_incomplete() {
        let verdict = Verdict::degraded("image decode".to_string());
        assert!(verdict.is_compliant);
        assert_eq!(verdict.status, ComplianceStatus::Compliant);
        assert!(!verdict.analysis_complete);
        assert_eq!(verdict.error.as_deref(), Some("image decode"));
        assert!(verdict.violations_found.is_empty());
        assert_eq!(verdict.severity_level, SeverityLevel::None);
    }

    #[test]
    fn shared_context_windows_collapse_to_one_entry() {
        use crate::scoring::ViolationMatch;

        let window = "adult gambling alcohol venue";
        let report = ViolationReport {
            matches: ["adult", "gambling", "alcohol"]
                .into_iter()
                .map(|keyword| ViolationMatch {
                    keyword: keyword.to_string(),
                    context: window.to_string(),
                    score: 10.0,
                })
                .collect(),
            severity_score: 10.0,
            severity_level: SeverityLevel::Critical,
        };

        let verdict = Verdict::compose(
            ExtractedText {
                text: window.to_string(),
                confidence: 0.95,
            },
            Vec::new(),
            report,
            500,
            true,
            None,
        );

        // One keyword per match, but the shared window appears once.
        assert_eq!(verdict.violation_count, 3);
        assert_eq!(verdict.violation_contexts, vec![window]);
    }

    #[test]
    fn distinct_contexts_keep_first_found_order() {
        use crate::scoring::ViolationMatch;

        let report = ViolationReport {
            matches: [("tobacco", "tobacco corner"), ("drugs", "drugs corner")]
                .into_iter()
                .map(|(keyword, context)| ViolationMatch {
                    keyword: keyword.to_string(),
                    context: context.to_string(),
                    score: 5.0,
                })
                .collect(),
            severity_score: 9.0,
            severity_level: SeverityLevel::Critical,
        };

        let verdict = Verdict::compose(
            ExtractedText {
                text: "tobacco corner. drugs corner".to_string(),
                confidence: 0.9,
            },
            Vec::new(),
            report,
            500,
            true,
            None,
        );

        assert_eq!(
            verdict.violation_contexts,
            vec!["tobacco corner", "drugs corner"]
        );
    }

    #[test]
    fn status_serializes_as_its_display_name() {
        assert_eq!(
            serde_json::to_string(&ComplianceStatus::Unauthorized).unwrap(),
            "\"Unauthorized\""
        );
    }
}
