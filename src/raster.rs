//! Raster image glue: binarisation on load, bounding-box overlays on output.
//!
//! Requires the `raster` feature.

use std::path::Path;

use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::emit::OverlayBox;
use crate::encoding::BORDER;
use crate::types::{BinaryGrid, BoundingBox, GridError};

/// Error type for raster IO.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// Decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// The decoded image could not form a grid (e.g. zero size).
    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),
}

/// Options for turning pixels into colors.
///
/// Pixels are classified by luma, not by a single channel. Only pixels that
/// reach `background_threshold` are background; a saturated color like pure red
/// (luma 54) is foreground even though its red channel is 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Pixels with luma at or above this value are background (LOW).
    pub background_threshold: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        // Only pure white counts as background.
        Self { background_threshold: 255 }
    }
}

/// Binarise a grayscale image.
pub fn binarize(gray: &GrayImage, options: &RasterOptions) -> Result<BinaryGrid, RasterError> {
    let cells = gray
        .pixels()
        .map(|p| u8::from(p.0[0] < options.background_threshold))
        .collect();
    Ok(BinaryGrid::from_vec(gray.width() as usize, gray.height() as usize, cells)?)
}

/// Load an image file as a binary grid plus an RGB copy for drawing on.
pub fn load_binary_image(
    path: impl AsRef<Path>,
    options: &RasterOptions,
) -> Result<(BinaryGrid, RgbImage), RasterError> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    let grid = binarize(&decoded.to_luma8(), options)?;
    tracing::debug!(
        path = %path.display(),
        width = grid.width(),
        height = grid.height(),
        "Image loaded"
    );
    Ok((grid, decoded.to_rgb8()))
}

/// Outline rectangle in image coordinates for a box in the bordered frame.
///
/// The outline sits one pixel outside the region. Returns `None` for an
/// empty box.
pub fn outline_rect(bbox: &BoundingBox) -> Option<Rect> {
    if bbox.is_empty() {
        return None;
    }
    let x0 = bbox.min_x as i64 - BORDER as i64 - 1;
    let y0 = bbox.min_y as i64 - BORDER as i64 - 1;
    let w = bbox.width() as u32 + 2;
    let h = bbox.height() as u32 + 2;
    Some(Rect::at(x0 as i32, y0 as i32).of_size(w, h))
}

/// Draw every overlay onto `image`. Parts outside the image are clipped.
pub fn draw_overlays(image: &mut RgbImage, overlays: &[OverlayBox]) {
    for overlay in overlays {
        if let Some(rect) = outline_rect(&overlay.bbox) {
            draw_hollow_rect_mut(image, rect, Rgb(overlay.color.to_array()));
        }
    }
}

/// Save an image, format chosen by extension.
pub fn save_image(image: &RgbImage, path: impl AsRef<Path>) -> Result<(), RasterError> {
    image.save(path.as_ref())?;
    Ok(())
}
