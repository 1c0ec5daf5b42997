use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_text_mut};
use tracing::debug;

use crate::error::{Result, ShapeError};
use crate::models::ShapeRecord;

/// Draws detection results back onto an image.
///
/// Every record gets a cross marker at its centroid. When a font is loaded
/// the `(Color, Shape)` label is written with its baseline at the centroid.
pub struct Labeller {
    font: Option<FontVec>,
    scale: PxScale,
    color: Rgb<u8>,
}

impl Labeller {
    pub fn new() -> Self {
        Self {
            font: None,
            scale: PxScale::from(14.0),
            color: Rgb([0, 0, 0]),
        }
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    /// Load a TrueType/OpenType font from disk
    pub fn with_font_file(self, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| ShapeError::Font(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded label font from {}", path.display());
        Ok(self.with_font(font))
    }

    pub fn with_scale(mut self, px: f32) -> Self {
        self.scale = PxScale::from(px);
        self
    }

    pub fn with_color(mut self, color: Rgb<u8>) -> Self {
        self.color = color;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Annotated copy of `img`; the input is left untouched
    pub fn label_image(&self, img: &RgbImage, records: &[ShapeRecord]) -> RgbImage {
        let mut labelled = img.clone();
        self.label_image_mut(&mut labelled, records);
        labelled
    }

    pub fn label_image_mut(&self, img: &mut RgbImage, records: &[ShapeRecord]) {
        for record in records {
            let (x, y) = (record.centroid.x, record.centroid.y);
            draw_cross_mut(img, self.color, x, y);

            if let Some(font) = &self.font {
                let top = y - self.scale.y.round() as i32;
                draw_text_mut(img, self.color, x, top, self.scale, font, &record.label());
            }
        }
    }
}

impl Default for Labeller {
    fn default() -> Self {
        Self::new()
    }
}
