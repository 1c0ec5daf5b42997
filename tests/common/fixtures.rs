use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use tempfile::TempDir;

/// Fill colors, in R, G, B order
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const ORANGE: Rgb<u8> = Rgb([255, 140, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// Plain white canvas
pub fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

pub fn draw_rect(img: &mut RgbImage, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(width, height), color);
}

/// Equilateral triangle pointing up, centred on (cx, cy)
pub fn draw_triangle(img: &mut RgbImage, cx: i32, cy: i32, side: f64, color: Rgb<u8>) {
    let h = side * 3f64.sqrt() / 2.0;
    let points = [
        Point::new(cx, (cy as f64 - 2.0 * h / 3.0).round() as i32),
        Point::new((cx as f64 + side / 2.0).round() as i32, (cy as f64 + h / 3.0).round() as i32),
        Point::new((cx as f64 - side / 2.0).round() as i32, (cy as f64 + h / 3.0).round() as i32),
    ];
    draw_polygon_mut(img, &points, color);
}

/// Regular polygon with its first vertex `rotation` radians clockwise from +x
pub fn draw_regular_polygon(
    img: &mut RgbImage,
    cx: i32,
    cy: i32,
    radius: f64,
    sides: usize,
    rotation: f64,
    color: Rgb<u8>,
) {
    let points: Vec<Point<i32>> = (0..sides)
        .map(|i| {
            let t = rotation + std::f64::consts::TAU * i as f64 / sides as f64;
            Point::new(
                (cx as f64 + radius * t.cos()).round() as i32,
                (cy as f64 + radius * t.sin()).round() as i32,
            )
        })
        .collect();
    draw_polygon_mut(img, &points, color);
}

pub fn draw_circle(img: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
    draw_filled_circle_mut(img, (cx, cy), radius, color);
}

/// 200x200 canvas with one 60px green square whose pixels span 50..=109
pub fn green_square_image() -> RgbImage {
    let mut img = blank(200, 200);
    draw_rect(&mut img, 50, 50, 60, 60, GREEN);
    img
}

/// Four well separated shapes of different colors
pub fn mixed_shapes_image() -> RgbImage {
    let mut img = blank(400, 300);
    draw_rect(&mut img, 30, 30, 70, 70, GREEN);
    draw_rect(&mut img, 200, 40, 140, 50, RED);
    draw_triangle(&mut img, 90, 220, 110.0, BLUE);
    draw_circle(&mut img, 280, 210, 50, ORANGE);
    img
}

/// Saves `img` as PNG under `dir` and returns its path
pub fn save_png(dir: &TempDir, name: &str, img: &RgbImage) -> std::path::PathBuf {
    let path = dir.path().join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}
