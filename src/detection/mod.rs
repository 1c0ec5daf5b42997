pub mod preprocessing;
pub mod contours;
pub mod features;
pub mod color;
pub mod shape;
pub mod label;

use std::path::Path;

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{ColorName, Contour, ShapeName, ShapeRecord};
use features::{ContourFeatures, DEFAULT_EPSILON_RATIO};
use label::Labeller;
use preprocessing::EdgeThresholds;

/// Tunable parameters of the detection pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub edge_low_threshold: f32,
    pub edge_high_threshold: f32,
    /// Contours must enclose strictly more than this many square pixels to get a shape
    pub min_shape_area: f64,
    /// Polygon approximation tolerance as a fraction of the contour perimeter
    pub approx_epsilon_ratio: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let edges = EdgeThresholds::default();
        Self {
            edge_low_threshold: edges.low,
            edge_high_threshold: edges.high,
            min_shape_area: 300.0,
            approx_epsilon_ratio: DEFAULT_EPSILON_RATIO,
        }
    }
}

impl DetectionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn edge_thresholds(&self) -> EdgeThresholds {
        EdgeThresholds {
            low: self.edge_low_threshold,
            high: self.edge_high_threshold,
        }
    }
}

/// Why a contour produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rejection {
    /// Zero enclosed area
    Degenerate,
    UnclassifiedColor,
    /// Too small to classify, or fewer than three vertices
    UnclassifiedShape,
}

/// Main detection pipeline orchestrator.
///
/// Holds configuration only, so one detector can be shared between threads
/// and reused across any number of images.
#[derive(Debug, Clone, Default)]
pub struct ShapeDetector {
    config: DetectionConfig,
}

impl ShapeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn with_edge_thresholds(mut self, low: f32, high: f32) -> Self {
        self.config.edge_low_threshold = low;
        self.config.edge_high_threshold = high;
        self
    }

    pub fn with_min_shape_area(mut self, area: f64) -> Self {
        self.config.min_shape_area = area;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect every classifiable shape in the image, in contour discovery order
    pub fn detect_shapes(&self, img: &RgbImage) -> Result<Vec<ShapeRecord>> {
        let edges = self.get_edges(img)?;
        Ok(self.detect_shapes_in_edges(img, &edges))
    }

    /// Same as [`detect_shapes`](Self::detect_shapes) with the edge map of
    /// `img` already computed by [`get_edges`](Self::get_edges)
    pub fn detect_shapes_in_edges(&self, img: &RgbImage, edges: &GrayImage) -> Vec<ShapeRecord> {
        let all_contours = contours::find_contours(edges);
        debug!("Found {} contours", all_contours.len());

        let mut records = Vec::new();
        for (i, contour) in all_contours.iter().enumerate() {
            match self.classify_contour(img, contour) {
                Ok(record) => {
                    debug!("  Contour {}: {}", i + 1, record);
                    records.push(record);
                }
                Err(reason) => {
                    debug!("  Contour {}: dropped ({}), {} points", i + 1, reason, contour.len());
                }
            }
        }

        info!(
            "Detected {} shapes (from {} contours) in {}x{} image",
            records.len(),
            all_contours.len(),
            img.width(),
            img.height()
        );
        records
    }

    /// Classify a single contour. The record is built in one step from this
    /// contour's own measurements, or the contour is rejected.
    pub fn classify_contour(
        &self,
        img: &RgbImage,
        contour: &Contour,
    ) -> std::result::Result<ShapeRecord, Rejection> {
        let features = ContourFeatures::measure(contour, self.config.approx_epsilon_ratio)
            .ok_or(Rejection::Degenerate)?;

        let color = color::classify_color(img, features.centroid);
        let shape = if features.area > self.config.min_shape_area {
            shape::classify_shape(features.vertex_count(), &features.bbox)
        } else {
            ShapeName::Unclassified
        };

        match (color, shape) {
            (ColorName::Unclassified, _) => Err(Rejection::UnclassifiedColor),
            (_, ShapeName::Unclassified) => Err(Rejection::UnclassifiedShape),
            (color, shape) => Ok(ShapeRecord {
                color,
                shape,
                centroid: features.centroid,
            }),
        }
    }

    /// Binary edge map of the image (for debugging)
    pub fn get_edges(&self, img: &RgbImage) -> Result<GrayImage> {
        preprocessing::extract_edges(img, self.config.edge_thresholds())
    }
}

/// Detect shapes with the default configuration
pub fn detect_shapes(img: &RgbImage) -> Result<Vec<ShapeRecord>> {
    ShapeDetector::new().detect_shapes(img)
}

/// Annotated copy of the image with a marker at every record's centroid
pub fn label_image(img: &RgbImage, records: &[ShapeRecord]) -> RgbImage {
    Labeller::new().label_image(img, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Centroid;
    use image::Rgb;
    use imageproc::point::Point;

    fn square_contour(x0: i32, y0: i32, side: i32) -> Contour {
        Contour::new(vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ])
    }

    #[test]
    fn test_default_config() {
        let config = DetectionConfig::default();
        assert_eq!(config.edge_low_threshold, 50.0);
        assert_eq!(config.edge_high_threshold, 50.0);
        assert_eq!(config.min_shape_area, 300.0);
        assert_eq!(config.approx_epsilon_ratio, 0.02);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = DetectionConfig::from_json_str(r#"{ "min_shape_area": 500.0 }"#).unwrap();
        assert_eq!(config.min_shape_area, 500.0);
        assert_eq!(config.approx_epsilon_ratio, 0.02);
        assert_eq!(config.edge_thresholds(), EdgeThresholds::default());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(DetectionConfig::from_json_str("{ min_shape_area: }").is_err());
    }

    #[test]
    fn test_classify_large_square_contour() {
        let img = RgbImage::from_pixel(100, 100, Rgb([0, 255, 0]));
        let record = ShapeDetector::new()
            .classify_contour(&img, &square_contour(10, 10, 40))
            .unwrap();

        assert_eq!(record.color, ColorName::Green);
        assert_eq!(record.shape, ShapeName::Square);
        assert_eq!(record.centroid, Centroid { x: 30, y: 30 });
    }

    #[test]
    fn test_small_contour_gets_no_shape() {
        let img = RgbImage::from_pixel(100, 100, Rgb([0, 255, 0]));
        let detector = ShapeDetector::new();

        // 17 x 17 = 289 <= 300
        let small = square_contour(10, 10, 17);
        assert_eq!(detector.classify_contour(&img, &small), Err(Rejection::UnclassifiedShape));

        // Exactly at the threshold is still too small
        let threshold = Contour::new(vec![
            Point::new(0, 0),
            Point::new(30, 0),
            Point::new(30, 10),
            Point::new(0, 10),
        ]);
        assert_eq!(detector.classify_contour(&img, &threshold), Err(Rejection::UnclassifiedShape));
    }

    #[test]
    fn test_unknown_color_is_rejected() {
        let img = RgbImage::from_pixel(100, 100, Rgb([12, 34, 56]));
        let result = ShapeDetector::new().classify_contour(&img, &square_contour(10, 10, 40));
        assert_eq!(result, Err(Rejection::UnclassifiedColor));
    }

    #[test]
    fn test_degenerate_contour_is_rejected() {
        let img = RgbImage::from_pixel(20, 20, Rgb([0, 255, 0]));
        let line = Contour::new(vec![Point::new(1, 1), Point::new(5, 5), Point::new(9, 9)]);
        assert_eq!(
            ShapeDetector::new().classify_contour(&img, &line),
            Err(Rejection::Degenerate)
        );
    }

    #[test]
    fn test_min_area_override() {
        let img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 255]));
        let detector = ShapeDetector::new().with_min_shape_area(100.0);
        let record = detector.classify_contour(&img, &square_contour(10, 10, 17)).unwrap();
        assert_eq!((record.color, record.shape), (ColorName::Blue, ShapeName::Square));
    }

    #[test]
    fn test_detect_from_precomputed_edges() {
        let mut img = RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]));
        imageproc::drawing::draw_filled_rect_mut(
            &mut img,
            imageproc::rect::Rect::at(30, 30).of_size(50, 50),
            Rgb([255, 0, 0]),
        );
        let detector = ShapeDetector::new();

        let edges = detector.get_edges(&img).unwrap();
        let from_edges = detector.detect_shapes_in_edges(&img, &edges);

        assert_eq!(from_edges, detector.detect_shapes(&img).unwrap());
        assert_eq!(from_edges.len(), 1);
        assert_eq!((from_edges[0].color, from_edges[0].shape), (ColorName::Red, ShapeName::Square));
    }

    #[test]
    fn test_detector_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShapeDetector>();
    }
}
