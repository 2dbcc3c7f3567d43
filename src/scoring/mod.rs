//! Keyword-based violation scoring.
//!
//! The scorer scans extracted text sentence by sentence for the configured
//! vocabulary and rates what it finds on a 0-10 scale. Matching is
//! deliberately case-insensitive *substring of token* containment, not
//! whole-word: a short keyword embedded in a longer word still matches
//! (e.g. `adult` inside `adultery`). That replicates the behavior the
//! compliance vocabulary was tuned against; switching to whole-word
//! matching would silently change every deployment's results.
//!
//! Dedup is document-global and first-occurrence-wins: a keyword repeated
//! ten times yields one match, with the context window of its first
//! occurrence. Using the highest-severity occurrence instead would be a
//! behavior change and is intentionally not done.

pub mod severity;

pub use severity::SeverityLevel;

use crate::core::EngineConfig;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Hard ceiling for per-match and overall severity scores.
const MAX_SEVERITY: f32 = 10.0;

/// Cap on the co-occurrence multiplier.
const MAX_MULTIPLIER: f32 = 1.5;

/// One matched keyword with the context window of its first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationMatch {
    /// The matched (normalized) keyword.
    pub keyword: String,
    /// Up to `context_radius` tokens on each side of the match,
    /// space-joined, lower-cased, clamped to the sentence.
    pub context: String,
    /// Per-match severity score, in [0, 10].
    pub score: f32,
}

/// The scorer's verdict fragment for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationReport {
    /// Matches in detection order, one per keyword.
    pub matches: Vec<ViolationMatch>,
    /// Maximum per-match score, 0 when there are no matches.
    pub severity_score: f32,
    /// Bucketed severity level.
    pub severity_level: SeverityLevel,
}

impl ViolationReport {
    /// A report with no violations.
    pub fn compliant() -> Self {
        Self {
            matches: Vec::new(),
            severity_score: 0.0,
            severity_level: SeverityLevel::None,
        }
    }

    /// True when no keyword matched.
    pub fn is_compliant(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Sentence-scoped keyword scanner with the severity heuristic.
///
/// Holds the normalized vocabulary and base-severity table; immutable for
/// the engine's lifetime.
#[derive(Debug, Clone)]
pub struct ViolationScorer {
    keywords: Vec<String>,
    base_scores: BTreeMap<String, f32>,
    default_base: f32,
    context_radius: usize,
}

impl ViolationScorer {
    /// Builds a scorer from a validated configuration, normalizing the
    /// vocabulary and the base-table keys.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            keywords: config.normalized_keywords(),
            base_scores: config
                .severity_base
                .iter()
                .map(|(k, v)| (k.trim().to_lowercase(), *v))
                .collect(),
            default_base: config.default_base_severity,
            context_radius: config.context_radius,
        }
    }

    /// Scans `text` for vocabulary keywords and scores the matches.
    ///
    /// Blank or whitespace-only text short-circuits to a compliant report.
    pub fn score(&self, text: &str) -> ViolationReport {
        if text.trim().is_empty() {
            return ViolationReport::compliant();
        }

        let mut matches = Vec::new();
        let mut found: HashSet<&str> = HashSet::new();

        for sentence in text.split(['.', '!', '?']) {
            let tokens: Vec<&str> = sentence
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .filter(|t| !t.is_empty())
                .collect();
            if tokens.is_empty() {
                continue;
            }
            let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

            for keyword in &self.keywords {
                if found.contains(keyword.as_str()) {
                    continue;
                }
                let Some(hit) = lowered.iter().position(|t| t.contains(keyword.as_str()))
                else {
                    continue;
                };
                found.insert(keyword.as_str());

                let start = hit.saturating_sub(self.context_radius);
                let end = (hit + self.context_radius + 1).min(tokens.len());
                let context = lowered[start..end].join(" ");

                // Co-occurring vocabulary terms in the window escalate the
                // match; the matched keyword itself does not count.
                let co_occurring = self
                    .keywords
                    .iter()
                    .filter(|other| *other != keyword && context.contains(other.as_str()))
                    .count();
                let multiplier = (1.0 + 0.2 * co_occurring as f32).min(MAX_MULTIPLIER);
                let base = self
                    .base_scores
                    .get(keyword)
                    .copied()
                    .unwrap_or(self.default_base);

                matches.push(ViolationMatch {
                    keyword: keyword.clone(),
                    context,
                    score: (base * multiplier).min(MAX_SEVERITY),
                });
            }
        }

        let severity_score = matches.iter().map(|m| m.score).fold(0.0, f32::max);
        ViolationReport {
            severity_level: SeverityLevel::from_score(severity_score),
            severity_score,
            matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> ViolationScorer {
        ViolationScorer::from_config(&EngineConfig::default())
    }

    #[test]
    fn clean_text_is_compliant() {
        let report = scorer().score("fresh produce and local honey sold here daily");
        assert!(report.is_compliant());
        assert_eq!(report.severity_score, 0.0);
        assert_eq!(report.severity_level, SeverityLevel::None);
    }

    #[test]
    fn blank_text_short_circuits() {
        for text in ["", "   ", "\n\t "] {
            let report = scorer().score(text);
            assert!(report.is_compliant());
            assert_eq!(report.severity_level, SeverityLevel::None);
        }
    }

    #[test]
    fn isolated_match_scores_its_base_severity() {
        // No co-occurring keywords in the window, so the multiplier is
        // exactly 1.0.
        let report = scorer().score("this billboard sells tobacco products");
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].keyword, "tobacco");
        assert_eq!(report.severity_score, 5.0);
        assert_eq!(report.severity_level, SeverityLevel::Medium);
    }

    #[test]
    fn co_occurring_keywords_escalate_and_cap() {
        let report = scorer().score("adult gambling alcohol venue");
        let keywords: Vec<&str> = report.matches.iter().map(|m| m.keyword.as_str()).collect();
        assert_eq!(keywords, ["adult", "gambling", "alcohol"]);

        // Every context is the whole four-token sentence.
        for matched in &report.matches {
            assert_eq!(matched.context, "adult gambling alcohol venue");
        }
        // adult: 8 * 1.4 capped at 10.
        assert_eq!(report.matches[0].score, 10.0);
        assert_eq!(report.severity_score, 10.0);
        assert_eq!(report.severity_level, SeverityLevel::Critical);
    }

    #[test]
    fn repeated_keyword_records_only_its_first_context() {
        let report =
            scorer().score("alcohol sold here. premium alcohol brands. alcohol for less");
        let alcohol: Vec<&ViolationMatch> = report
            .matches
            .iter()
            .filter(|m| m.keyword == "alcohol")
            .collect();
        assert_eq!(alcohol.len(), 1);
        assert_eq!(alcohol[0].context, "alcohol sold here");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let report = scorer().score("GAMBLING Night Every Friday");
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].keyword, "gambling");
        // The context window is normalized to lower case.
        assert_eq!(report.matches[0].context, "gambling night every friday");
    }

    #[test]
    fn keyword_matches_as_substring_of_a_longer_token() {
        // Deliberate quirk: substring-of-token, not whole-word.
        let report = scorer().score("adultery is a sin");
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].keyword, "adult");
    }

    #[test]
    fn context_window_is_clamped_to_the_sentence() {
        let report = scorer().score(
            "one two three four five six seven tobacco eight nine ten eleven twelve. other part",
        );
        assert_eq!(
            report.matches[0].context,
            "three four five six seven tobacco eight nine ten eleven twelve"
        );
    }

    #[test]
    fn context_does_not_cross_sentence_boundaries() {
        let report = scorer().score("big sale today! buy tobacco now");
        assert_eq!(report.matches[0].context, "buy tobacco now");
    }

    #[test]
    fn unlisted_keyword_scores_the_default_base() {
        let report = scorer().score("prohibited structure ahead");
        assert_eq!(report.matches[0].keyword, "prohibited");
        assert_eq!(report.severity_score, 5.0);
    }

    #[test]
    fn per_match_score_never_exceeds_ten() {
        let report = scorer().score("nude adult gambling alcohol tobacco drugs weapons show");
        assert!(report.matches.iter().all(|m| m.score <= 10.0));
        assert_eq!(report.severity_score, 10.0);
    }

    #[test]
    fn overall_score_is_the_maximum_match_score() {
        // tobacco (5.0) in one sentence, drugs (9.0) isolated in another.
        let report = scorer().score("tobacco corner. drugs corner");
        assert_eq!(report.severity_score, 9.0);
        assert_eq!(report.severity_level, SeverityLevel::Critical);
    }

    #[test]
    fn custom_vocabulary_is_respected() {
        let config = EngineConfig {
            keywords: vec!["vape".to_string()],
            ..EngineConfig::default()
        };
        let report = ViolationScorer::from_config(&config).score("tobacco and vape shop");
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].keyword, "vape");
        assert_eq!(report.severity_score, 5.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let text = "adult gambling alcohol venue. tobacco too";
        assert_eq!(scorer().score(text), scorer().score(text));
    }
}
