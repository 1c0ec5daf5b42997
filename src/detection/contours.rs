use image::GrayImage;
use imageproc::contours::{self, BorderType};
use crate::models::Contour;

/// Find the outermost boundary of every connected foreground region
/// (non-zero pixels) in a binary edge image. Holes and borders nested
/// inside other regions are discarded; points are kept at full resolution.
pub fn find_contours(edges: &GrayImage) -> Vec<Contour> {
    contours::find_contours::<i32>(edges)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(c.points))
        .collect()
}
