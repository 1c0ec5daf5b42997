mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from shapescan for tests
pub use shapescan::{
    ColorName, DetectionConfig, Labeller, ShapeDetector, ShapeError, ShapeName, ShapeRecord,
};
