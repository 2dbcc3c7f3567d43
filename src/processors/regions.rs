//! Approximate text-region localization.
//!
//! Works on the preprocessed binary grid, independently of OCR: connected
//! ink blobs are traced as external contours and reported as axis-aligned
//! bounding boxes. Noise-sized blobs are discarded. The boxes approximate
//! where text sits on the billboard; they are not tied to OCR token
//! positions and their order is contour discovery order, not reading
//! order.

use crate::core::{EngineError, EngineResult};
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of one connected ink region, in preprocessed
/// (upscaled) pixel coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Box width in pixels.
    pub width: u32,
    /// Box height in pixels.
    pub height: u32,
    /// Box area in pixels.
    pub area: u64,
}

/// Locates connected ink regions in a binary (ink = 0, background = 255)
/// grid and returns their bounding boxes.
///
/// Boxes with width or height at or below `min_size` are discarded.
///
/// # Errors
///
/// Returns a region-scan error for an empty grid. The pipeline converts
/// any error here into an empty region list.
pub fn locate_text_regions(binary: &GrayImage, min_size: u32) -> EngineResult<Vec<TextRegion>> {
    let (width, height) = binary.dimensions();
    if width == 0 || height == 0 {
        return Err(EngineError::region_scan("empty grid"));
    }

    // Contour tracing treats non-zero pixels as foreground; ink is black
    // in the binarized grid, so flip it first.
    let inverted = GrayImage::from_fn(width, height, |x, y| {
        image::Luma([255 - binary.get_pixel(x, y).0[0]])
    });

    let regions = find_contours::<i32>(&inverted)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| bounding_box(&contour.points))
        .filter(|region| region.width > min_size && region.height > min_size)
        .collect();

    Ok(regions)
}

/// Axis-aligned bounding box of a contour's points.
fn bounding_box(points: &[imageproc::point::Point<i32>]) -> Option<TextRegion> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    let width = (max_x - min_x + 1) as u32;
    let height = (max_y - min_y + 1) as u32;
    Some(TextRegion {
        x: min_x as u32,
        y: min_y as u32,
        width,
        height,
        area: width as u64 * height as u64,
    })
}
