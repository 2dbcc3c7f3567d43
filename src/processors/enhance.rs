//! OCR-oriented image preprocessing.
//!
//! The preprocessor turns a decoded photograph into a clean two-level
//! (ink/background) grid: cubic upscale, luminance conversion, CLAHE,
//! edge-preserving bilateral smoothing, then Otsu binarization. Each step
//! allocates a fresh buffer; the caller's image is never modified.
//!
//! Failure policy: a step that cannot run logs a warning and the chain
//! carries on from the last successfully produced grid. Preprocessing
//! degrades, it never blocks analysis.

use crate::core::{EngineConfig, EngineError, EngineResult, Stage};
use crate::processors::clahe;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use imageproc::contrast::otsu_level;
use imageproc::filter::bilateral_filter;
use tracing::{debug, warn};

/// Upscaled pixel budget above which the upscale step is skipped rather
/// than risking a huge allocation.
const MAX_UPSCALED_PIXELS: u64 = 1 << 27;

/// Result of preprocessing one image.
#[derive(Debug)]
pub struct PreprocessOutcome {
    /// The best grid produced: binary ink/background when every step ran,
    /// an earlier intermediate when a step degraded.
    pub image: GrayImage,
    /// Names of the steps that ran, in order.
    pub steps_applied: Vec<&'static str>,
}

/// The five-step preprocessing chain, parameterized from [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct Preprocessor {
    upscale_factor: u32,
    clahe_grid: u32,
    clahe_clip_limit: f32,
    bilateral_radius: u32,
    bilateral_sigma_color: f32,
    bilateral_sigma_spatial: f32,
}

impl Preprocessor {
    /// Builds a preprocessor from a validated configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            upscale_factor: config.upscale_factor,
            clahe_grid: config.clahe_grid,
            clahe_clip_limit: config.clahe_clip_limit,
            bilateral_radius: config.bilateral_radius,
            bilateral_sigma_color: config.bilateral_sigma_color,
            bilateral_sigma_spatial: config.bilateral_sigma_spatial,
        }
    }

    /// Runs the full chain. Infallible: steps that cannot run are skipped
    /// with a warning and the last good grid flows on.
    pub fn run(&self, image: &DynamicImage) -> PreprocessOutcome {
        let mut steps_applied = Vec::with_capacity(5);

        let upscaled = match self.upscale(image) {
            Ok(img) => {
                steps_applied.push("upscale");
                img
            }
            Err(err) => {
                warn!(error = %err, "upscale skipped");
                image.clone()
            }
        };

        let mut gray = upscaled.to_luma8();
        steps_applied.push("luma");

        match clahe::equalize(&gray, self.clahe_grid, self.clahe_clip_limit) {
            Ok(equalized) => {
                gray = equalized;
                steps_applied.push("clahe");
            }
            Err(err) => warn!(error = %err, "contrast equalization skipped"),
        }

        if self.bilateral_radius > 0 {
            gray = bilateral_filter(
                &gray,
                self.bilateral_radius,
                self.bilateral_sigma_color,
                self.bilateral_sigma_spatial,
            );
            steps_applied.push("bilateral");
        }

        let level = otsu_level(&gray);
        gray = binarize(&gray, level);
        steps_applied.push("binarize");

        debug!(steps = ?steps_applied, otsu_level = level, "preprocessing complete");
        PreprocessOutcome {
            image: gray,
            steps_applied,
        }
    }

    /// Uniform cubic upscale. Fails (and is skipped) when the scaled
    /// dimensions would overflow or exceed the pixel budget.
    fn upscale(&self, image: &DynamicImage) -> EngineResult<DynamicImage> {
        if self.upscale_factor == 1 {
            return Ok(image.clone());
        }
        let width = image.width() as u64 * self.upscale_factor as u64;
        let height = image.height() as u64 * self.upscale_factor as u64;
        if width == 0 || height == 0 {
            return Err(EngineError::stage_failed(Stage::Preprocess, "empty image"));
        }
        if width > u32::MAX as u64 || height > u32::MAX as u64 || width * height > MAX_UPSCALED_PIXELS
        {
            return Err(EngineError::stage_failed(
                Stage::Preprocess,
                format!("upscaled size {width}x{height} exceeds pixel budget"),
            ));
        }
        Ok(image.resize_exact(width as u32, height as u32, FilterType::CatmullRom))
    }
}

/// Strict two-level split: ink (at or below the threshold) goes to 0,
/// background to 255.
fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] <= level {
            image::Luma([0])
        } else {
            image::Luma([255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn preprocessor() -> Preprocessor {
        Preprocessor::from_config(&EngineConfig::default())
    }

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 3 + y * 5) % 256) as u8;
            Rgb([v, v, v])
        }))
    }

    #[test]
    fn output_is_strictly_two_level() {
        let outcome = preprocessor().run(&gradient_image(40, 30));
        assert!(outcome
            .image
            .pixels()
            .all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn upscales_by_the_configured_factor() {
        let outcome = preprocessor().run(&gradient_image(40, 30));
        assert_eq!(outcome.image.dimensions(), (80, 60));
        assert!(outcome.steps_applied.contains(&"upscale"));
    }

    #[test]
    fn oversized_input_degrades_to_original_scale() {
        let config = EngineConfig {
            upscale_factor: 100_000,
            ..EngineConfig::default()
        };
        let outcome = Preprocessor::from_config(&config).run(&gradient_image(40, 30));
        // Upscale skipped; the rest of the chain still runs on the
        // original grid.
        assert_eq!(outcome.image.dimensions(), (40, 30));
        assert!(!outcome.steps_applied.contains(&"upscale"));
        assert!(outcome.steps_applied.contains(&"binarize"));
    }

    #[test]
    fn factor_of_one_keeps_dimensions() {
        let config = EngineConfig {
            upscale_factor: 1,
            ..EngineConfig::default()
        };
        let outcome = Preprocessor::from_config(&config).run(&gradient_image(40, 30));
        assert_eq!(outcome.image.dimensions(), (40, 30));
    }

    #[test]
    fn is_deterministic() {
        let image = gradient_image(64, 48);
        let a = preprocessor().run(&image);
        let b = preprocessor().run(&image);
        assert_eq!(a.image.as_raw(), b.image.as_raw());
        assert_eq!(a.steps_applied, b.steps_applied);
    }

    #[test]
    fn separates_ink_from_background() {
        // Dark text block on a light board must end up at opposite levels.
        let mut rgb = image::RgbImage::from_pixel(60, 40, Rgb([220, 220, 220]));
        for y in 10..20 {
            for x in 10..40 {
                rgb.put_pixel(x, y, Rgb([25, 25, 25]));
            }
        }
        let outcome = preprocessor().run(&DynamicImage::ImageRgb8(rgb));
        let ink = outcome.image.get_pixel(30 * 2, 15 * 2).0[0];
        let board = outcome.image.get_pixel(50 * 2, 35 * 2).0[0];
        assert_eq!(ink, 0);
        assert_eq!(board, 255);
    }
}
