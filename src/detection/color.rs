use image::{Rgb, RgbImage};
use crate::models::{Centroid, ColorName};

/// Fill colors the detector recognises, matched exactly
pub const PALETTE: [(Rgb<u8>, ColorName); 4] = [
    (Rgb([0, 0, 255]), ColorName::Blue),
    (Rgb([255, 140, 0]), ColorName::Orange),
    (Rgb([255, 0, 0]), ColorName::Red),
    (Rgb([0, 255, 0]), ColorName::Green),
];

/// Name a single pixel value. Anything outside the palette is `Unclassified`.
pub fn color_name(pixel: Rgb<u8>) -> ColorName {
    PALETTE
        .iter()
        .find(|(rgb, _)| *rgb == pixel)
        .map(|&(_, name)| name)
        .unwrap_or(ColorName::Unclassified)
}

/// Sample the pixel at the centroid and name its color
pub fn classify_color(img: &RgbImage, centroid: Centroid) -> ColorName {
    let (Ok(x), Ok(y)) = (u32::try_from(centroid.x), u32::try_from(centroid.y)) else {
        return ColorName::Unclassified;
    };

    img.get_pixel_checked(x, y)
        .map(|&pixel| color_name(pixel))
        .unwrap_or(ColorName::Unclassified)
}
