//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! Local contrast equalization over a fixed tile grid with a clip limit,
//! matching the usual OpenCV definition: per-tile histograms are clipped
//! relative to a uniform distribution, the excess is redistributed, and
//! each output pixel interpolates bilinearly between the lookup tables of
//! the four nearest tiles. imageproc only ships global histogram
//! equalization, which over-amplifies noise on unevenly lit billboard
//! photographs.

use crate::core::{EngineError, EngineResult, Stage};
use image::GrayImage;

/// Equalizes local contrast over a `grid` x `grid` tile layout.
///
/// `clip_limit` is relative to a uniform histogram: a tile's histogram
/// bins are clipped at `clip_limit * tile_pixels / 256` and the clipped
/// mass is redistributed evenly.
///
/// # Errors
///
/// Returns a preprocess error if the image is empty. The caller treats
/// this as a degraded (skipped) step, not a pipeline failure.
pub fn equalize(image: &GrayImage, grid: u32, clip_limit: f32) -> EngineResult<GrayImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EngineError::stage_failed(
            Stage::Preprocess,
            "CLAHE on empty image",
        ));
    }

    // Never let a tile collapse below one pixel on small inputs.
    let tiles_x = grid.clamp(1, width);
    let tiles_y = grid.clamp(1, height);
    let tile_w = width as f32 / tiles_x as f32;
    let tile_h = height as f32 / tiles_y as f32;

    let luts = tile_lookup_tables(image, tiles_x, tiles_y, tile_w, tile_h, clip_limit);

    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = pixel.0[0] as usize;

        // Position in tile-center coordinates.
        let fx = (x as f32 + 0.5) / tile_w - 0.5;
        let fy = (y as f32 + 0.5) / tile_h - 0.5;

        let x0 = fx.floor().clamp(0.0, (tiles_x - 1) as f32) as u32;
        let y0 = fy.floor().clamp(0.0, (tiles_y - 1) as f32) as u32;
        let x1 = (x0 + 1).min(tiles_x - 1);
        let y1 = (y0 + 1).min(tiles_y - 1);
        let wx = (fx - x0 as f32).clamp(0.0, 1.0);
        let wy = (fy - y0 as f32).clamp(0.0, 1.0);

        let lut = |tx: u32, ty: u32| luts[(ty * tiles_x + tx) as usize][value] as f32;
        let top = lut(x0, y0) * (1.0 - wx) + lut(x1, y0) * wx;
        let bottom = lut(x0, y1) * (1.0 - wx) + lut(x1, y1) * wx;
        let mapped = top * (1.0 - wy) + bottom * wy;

        output.put_pixel(x, y, image::Luma([mapped.round().clamp(0.0, 255.0) as u8]));
    }

    Ok(output)
}

/// Builds one clipped-equalization lookup table per tile.
fn tile_lookup_tables(
    image: &GrayImage,
    tiles_x: u32,
    tiles_y: u32,
    tile_w: f32,
    tile_h: f32,
    clip_limit: f32,
) -> Vec<[u8; 256]> {
    let (width, height) = image.dimensions();
    let mut histograms = vec![[0u32; 256]; (tiles_x * tiles_y) as usize];

    for (x, y, pixel) in image.enumerate_pixels() {
        let tx = ((x as f32 / tile_w) as u32).min(tiles_x - 1);
        let ty = ((y as f32 / tile_h) as u32).min(tiles_y - 1);
        histograms[(ty * tiles_x + tx) as usize][pixel.0[0] as usize] += 1;
    }

    histograms
        .into_iter()
        .map(|mut hist| {
            let tile_pixels: u32 = hist.iter().sum();
            if tile_pixels == 0 {
                // Degenerate tile on extreme aspect ratios: identity map.
                let mut lut = [0u8; 256];
                for (v, entry) in lut.iter_mut().enumerate() {
                    *entry = v as u8;
                }
                return lut;
            }

            let clip = ((clip_limit * tile_pixels as f32 / 256.0) as u32).max(1);
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > clip {
                    excess += *bin - clip;
                    *bin = clip;
                }
            }
            let bonus = excess / 256;
            for bin in hist.iter_mut() {
                *bin += bonus;
            }

            let mut lut = [0u8; 256];
            let mut cdf = 0u64;
            let total: u64 = hist.iter().map(|&c| c as u64).sum();
            for (v, &count) in hist.iter().enumerate() {
                cdf += count as u64;
                lut[v] = ((cdf * 255) / total.max(1)) as u8;
            }
            lut
        })
        .collect()
}
