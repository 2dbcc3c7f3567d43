//! Error types for the violation detection pipeline.
//!
//! Every stage of the pipeline converts its own failures into an
//! [`EngineError`]; the pipeline then absorbs them into degraded stage
//! outputs so that no error ever crosses the `analyze` boundary. The
//! variants here exist for logging, for the verdict's diagnostic `error`
//! field, and for unit-testing individual stages in isolation.

use thiserror::Error;

/// The pipeline stage in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Decoding raw bytes into a pixel grid.
    Decode,
    /// Image preprocessing (upscale, contrast, smoothing, binarization).
    Preprocess,
    /// OCR text extraction.
    Ocr,
    /// Connected-region localization.
    RegionScan,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Decode => write!(f, "decode"),
            Stage::Preprocess => write!(f, "preprocess"),
            Stage::Ocr => write!(f, "ocr"),
            Stage::RegionScan => write!(f, "region scan"),
        }
    }
}

/// Errors raised inside the violation detection pipeline.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The input bytes could not be decoded into an image.
    #[error("image decode: {0}")]
    Decode(#[source] image::ImageError),

    /// A processing stage failed. Non-fatal for the pipeline: the stage's
    /// caller falls back to the last good value and degrades the verdict.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The stage that failed.
        stage: Stage,
        /// What the stage was doing when it failed.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid engine configuration.
    #[error(transparent)]
    Config(#[from] crate::core::config::ConfigError),
}

/// Convenient result alias for pipeline operations.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Creates a processing error for the given stage with a wrapped source.
    pub fn processing(
        stage: Stage,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        EngineError::Processing {
            stage,
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a processing error with a message only.
    pub fn stage_failed(stage: Stage, context: impl Into<String>) -> Self {
        EngineError::Processing {
            stage,
            context: context.into(),
            source: None,
        }
    }

    /// Creates an OCR failure.
    pub fn ocr(context: impl Into<String>) -> Self {
        Self::stage_failed(Stage::Ocr, context)
    }

    /// Creates a region-scan failure.
    pub fn region_scan(context: impl Into<String>) -> Self {
        Self::stage_failed(Stage::RegionScan, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_error_message_names_the_stage() {
        let err = EngineError::stage_failed(Stage::Ocr, "engine init");
        assert_eq!(err.to_string(), "ocr failed: engine init");

        let err = EngineError::region_scan("contour trace");
        assert_eq!(err.to_string(), "region scan failed: contour trace");
    }

    #[test]
    fn decode_error_carries_source() {
        let inner = image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::GenericFeature("bad".into()),
            ),
        );
        let err = EngineError::Decode(inner);
        assert!(std::error::Error::source(&err).is_some());
    }
}
