pub mod batch;
pub mod detection;
pub mod error;
pub mod models;

pub use detection::{detect_shapes, label_image, DetectionConfig, Rejection, ShapeDetector};
pub use detection::label::Labeller;
pub use error::{Result, ShapeError};
pub use models::{BoundingBox, Centroid, ColorName, Contour, ShapeName, ShapeRecord};
