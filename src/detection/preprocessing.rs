use image::{GrayImage, RgbImage, imageops};
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};

/// Canny hysteresis thresholds. Equal values act as a single sensitivity cut-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeThresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self { low: 50.0, high: 50.0 }
    }
}

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    imageops::grayscale(img)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, thresholds: EdgeThresholds) -> GrayImage {
    canny(img, thresholds.low, thresholds.high)
}

/// Binary edge map of a color image: 255 on edges, 0 elsewhere
pub fn extract_edges(img: &RgbImage, thresholds: EdgeThresholds) -> Result<GrayImage> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ShapeError::InvalidInput { width, height });
    }

    let gray = to_grayscale(img);
    Ok(detect_edges(&gray, thresholds))
}
