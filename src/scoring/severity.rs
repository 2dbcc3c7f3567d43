//! Severity levels and score bucketing.

use serde::{Deserialize, Serialize};

/// Risk level derived from the 0-10 severity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityLevel {
    /// No violations.
    None,
    /// Score in [2, 4).
    Low,
    /// Score in [4, 6).
    Medium,
    /// Score in [6, 8).
    High,
    /// Score of 8 or above.
    Critical,
}

impl SeverityLevel {
    /// Buckets a severity score into a level. Monotone over the score.
    pub fn from_score(score: f32) -> Self {
        if score >= 8.0 {
            SeverityLevel::Critical
        } else if score >= 6.0 {
            SeverityLevel::High
        } else if score >= 4.0 {
            SeverityLevel::Medium
        } else if score >= 2.0 {
            SeverityLevel::Low
        } else {
            SeverityLevel::None
        }
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SeverityLevel::None => "None",
            SeverityLevel::Low => "Low",
            SeverityLevel::Medium => "Medium",
            SeverityLevel::High => "High",
            SeverityLevel::Critical => "Critical",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_at_the_documented_boundaries() {
        assert_eq!(SeverityLevel::from_score(0.0), SeverityLevel::None);
        assert_eq!(SeverityLevel::from_score(1.99), SeverityLevel::None);
        assert_eq!(SeverityLevel::from_score(2.0), SeverityLevel::Low);
        assert_eq!(SeverityLevel::from_score(4.0), SeverityLevel::Medium);
        assert_eq!(SeverityLevel::from_score(5.0), SeverityLevel::Medium);
        assert_eq!(SeverityLevel::from_score(6.0), SeverityLevel::High);
        assert_eq!(SeverityLevel::from_score(8.0), SeverityLevel::Critical);
        assert_eq!(SeverityLevel::from_score(10.0), SeverityLevel::Critical);
    }

    #[test]
    fn bucketing_is_monotone() {
        let mut previous = SeverityLevel::None;
        for step in 0..=100 {
            let level = SeverityLevel::from_score(step as f32 / 10.0);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn serializes_as_the_level_name() {
        assert_eq!(
            serde_json::to_string(&SeverityLevel::Critical).unwrap(),
            "\"Critical\""
        );
        assert_eq!(serde_json::to_string(&SeverityLevel::None).unwrap(), "\"None\"");
    }
}
