use crate::models::{BoundingBox, ShapeName};

/// Aspect ratio range (inclusive) in which a four-sided polygon counts as a square
pub const SQUARE_ASPECT_RANGE: (f64, f64) = (0.95, 1.05);

/// Name a polygon from its vertex count; four-sided polygons are split into
/// squares and rectangles by the aspect ratio of their bounding box.
pub fn classify_shape(vertex_count: usize, bbox: &BoundingBox) -> ShapeName {
    match vertex_count {
        0..=2 => ShapeName::Unclassified,
        3 => ShapeName::Triangle,
        4 => {
            let aspect = bbox.aspect_ratio();
            let (min, max) = SQUARE_ASPECT_RANGE;
            if (min..=max).contains(&aspect) {
                ShapeName::Square
            } else {
                ShapeName::Rectangle
            }
        }
        5 => ShapeName::Pentagon,
        6 => ShapeName::Hexagon,
        _ => ShapeName::Circle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(width: u32, height: u32) -> BoundingBox {
        BoundingBox { x: 0, y: 0, width, height }
    }

    #[test]
    fn test_vertex_count_table() {
        let b = bbox(50, 50);
        assert_eq!(classify_shape(0, &b), ShapeName::Unclassified);
        assert_eq!(classify_shape(2, &b), ShapeName::Unclassified);
        assert_eq!(classify_shape(3, &b), ShapeName::Triangle);
        assert_eq!(classify_shape(5, &b), ShapeName::Pentagon);
        assert_eq!(classify_shape(6, &b), ShapeName::Hexagon);
        assert_eq!(classify_shape(7, &b), ShapeName::Circle);
        assert_eq!(classify_shape(40, &b), ShapeName::Circle);
    }

    #[test]
    fn test_square_versus_rectangle() {
        assert_eq!(classify_shape(4, &bbox(60, 60)), ShapeName::Square);
        assert_eq!(classify_shape(4, &bbox(62, 60)), ShapeName::Square);
        assert_eq!(classify_shape(4, &bbox(60, 63)), ShapeName::Square);
        assert_eq!(classify_shape(4, &bbox(80, 40)), ShapeName::Rectangle);
        assert_eq!(classify_shape(4, &bbox(40, 80)), ShapeName::Rectangle);
    }

    #[test]
    fn test_aspect_bounds_are_inclusive() {
        // 95/100 and 105/100 sit right on the edges of the range
        assert_eq!(classify_shape(4, &bbox(95, 100)), ShapeName::Square);
        assert_eq!(classify_shape(4, &bbox(105, 100)), ShapeName::Square);
        assert_eq!(classify_shape(4, &bbox(94, 100)), ShapeName::Rectangle);
        assert_eq!(classify_shape(4, &bbox(106, 100)), ShapeName::Rectangle);
    }
}
