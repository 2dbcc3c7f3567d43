//! Configuration for the violation detection engine.
//!
//! All tunables live in [`EngineConfig`]: the keyword vocabulary, the OCR
//! confidence threshold, preprocessing parameters, and the severity base
//! table. The configuration is validated once at engine construction and
//! is immutable afterwards, so concurrent analyses share it without
//! locking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The upscale factor must be at least 1.
    #[error("upscale factor must be at least 1")]
    InvalidUpscaleFactor,

    /// A parameter is outside its valid range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },
}

/// Configuration for [`ViolationEngine`](crate::pipeline::ViolationEngine).
///
/// `Default` reproduces the stock deployment: the nine-keyword vocabulary,
/// a 0.5 confidence threshold, and 2x upscaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Keyword vocabulary. Entries are trimmed and lower-cased at engine
    /// construction; matching is case-insensitive substring-of-token.
    pub keywords: Vec<String>,
    /// Base severity (0-10) per keyword. Keywords absent from this table
    /// score [`EngineConfig::default_base_severity`].
    pub severity_base: BTreeMap<String, f32>,
    /// Base severity for keywords without an explicit table entry.
    pub default_base_severity: f32,
    /// OCR tokens with normalized confidence at or below this value are
    /// discarded. Range [0, 1].
    pub confidence_threshold: f32,
    /// Integer upscale factor applied before OCR.
    pub upscale_factor: u32,
    /// CLAHE tile grid size (an NxN grid of tiles).
    pub clahe_grid: u32,
    /// CLAHE clip limit, relative to a uniform histogram as in OpenCV.
    pub clahe_clip_limit: f32,
    /// Bilateral filter window radius in pixels.
    pub bilateral_radius: u32,
    /// Bilateral filter color sigma.
    pub bilateral_sigma_color: f32,
    /// Bilateral filter spatial sigma.
    pub bilateral_sigma_spatial: f32,
    /// Detected regions with width or height at or below this many pixels
    /// are discarded as noise.
    pub min_region_size: u32,
    /// Number of tokens kept on each side of a match in its context window.
    pub context_radius: usize,
    /// Maximum length, in characters, of the verdict's extracted text.
    pub max_text_chars: usize,
    /// Tesseract language code.
    pub ocr_language: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let severity_base = [
            ("nude", 9.0),
            ("drugs", 9.0),
            ("weapons", 9.0),
            ("adult", 8.0),
            ("gambling", 7.0),
            ("alcohol", 6.0),
            ("tobacco", 5.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            keywords: [
                "nude",
                "adult",
                "gambling",
                "alcohol",
                "tobacco",
                "drugs",
                "weapons",
                "unauthorized",
                "prohibited",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            severity_base,
            default_base_severity: 5.0,
            confidence_threshold: 0.5,
            upscale_factor: 2,
            clahe_grid: 8,
            clahe_clip_limit: 2.0,
            bilateral_radius: 4,
            bilateral_sigma_color: 75.0,
            bilateral_sigma_spatial: 75.0,
            min_region_size: 10,
            context_radius: 5,
            max_text_chars: 500,
            ocr_language: "eng".to_string(),
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any parameter is outside its valid
    /// range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upscale_factor < 1 {
            return Err(ConfigError::InvalidUpscaleFactor);
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "confidence threshold must be in [0, 1], got {}",
                    self.confidence_threshold
                ),
            });
        }
        if self.clahe_grid < 1 {
            return Err(ConfigError::InvalidConfig {
                message: "CLAHE grid must have at least one tile".to_string(),
            });
        }
        if self.clahe_clip_limit <= 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "CLAHE clip limit must be positive, got {}",
                    self.clahe_clip_limit
                ),
            });
        }
        if self.bilateral_sigma_color <= 0.0 || self.bilateral_sigma_spatial <= 0.0 {
            return Err(ConfigError::InvalidConfig {
                message: "bilateral sigmas must be positive".to_string(),
            });
        }
        if self.default_base_severity < 0.0 || self.default_base_severity > 10.0 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "default base severity must be in [0, 10], got {}",
                    self.default_base_severity
                ),
            });
        }
        if let Some((keyword, score)) = self
            .severity_base
            .iter()
            .find(|(_, s)| !(0.0..=10.0).contains(*s))
        {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "base severity for '{keyword}' must be in [0, 10], got {score}"
                ),
            });
        }
        if self.ocr_language.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "OCR language must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the vocabulary trimmed, lower-cased, deduplicated, and with
    /// empty entries removed, preserving first-seen order.
    pub fn normalized_keywords(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect()
    }
}
