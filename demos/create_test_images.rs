use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use std::path::PathBuf;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
const ORANGE: Rgb<u8> = Rgb([255, 140, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// Regular polygon with `sides` vertices around (cx, cy)
fn regular_polygon(cx: f64, cy: f64, radius: f64, sides: usize) -> Vec<Point<i32>> {
    (0..sides)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / sides as f64 - std::f64::consts::FRAC_PI_2;
            Point::new((cx + radius * t.cos()).round() as i32, (cy + radius * t.sin()).round() as i32)
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "test_images".to_string()));
    std::fs::create_dir_all(&out_dir)?;

    let mut images = Vec::new();

    let mut img = RgbImage::from_pixel(400, 300, WHITE);
    draw_filled_rect_mut(&mut img, Rect::at(40, 40).of_size(80, 80), GREEN);
    draw_filled_circle_mut(&mut img, (280, 180), 60, ORANGE);
    images.push(img);

    let mut img = RgbImage::from_pixel(400, 300, WHITE);
    draw_polygon_mut(&mut img, &regular_polygon(100.0, 150.0, 70.0, 3), BLUE);
    draw_filled_rect_mut(&mut img, Rect::at(220, 110).of_size(140, 70), RED);
    images.push(img);

    let mut img = RgbImage::from_pixel(400, 300, WHITE);
    draw_polygon_mut(&mut img, &regular_polygon(100.0, 150.0, 70.0, 5), RED);
    draw_polygon_mut(&mut img, &regular_polygon(290.0, 150.0, 70.0, 6), GREEN);
    images.push(img);

    for (i, img) in images.iter().enumerate() {
        let path = out_dir.join(format!("test_image_{}.png", i + 1));
        img.save(&path)?;
        println!("Created {}", path.display());
    }

    Ok(())
}
