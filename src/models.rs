use imageproc::geometry::{arc_length, contour_area, oriented_contour_area};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter};

/// Closed outer boundary of one connected region in an edge map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed polygon area (shoelace). Sign depends on traversal direction.
    pub fn signed_area(&self) -> f64 {
        oriented_contour_area(&self.points)
    }

    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    /// Closed-loop length of the boundary
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.points, true)
    }

    /// Area-weighted centroid from the polygon's first and zeroth moments,
    /// truncated to pixel coordinates. `None` for zero-area contours.
    pub fn centroid(&self) -> Option<Centroid> {
        let mut m00 = 0.0;
        let mut m10 = 0.0;
        let mut m01 = 0.0;

        for (a, b) in polygon_edges(&self.points) {
            let c = cross(a, b);
            m00 += c;
            m10 += (a.x + b.x) as f64 * c;
            m01 += (a.y + b.y) as f64 * c;
        }

        // m00 here is twice the signed area; the factor cancels below
        if m00.abs() < f64::EPSILON {
            return None;
        }

        Some(Centroid {
            x: (m10 / (3.0 * m00)) as i32,
            y: (m01 / (3.0 * m00)) as i32,
        })
    }
}

/// Consecutive point pairs of a closed polygon, wrapping last to first
fn polygon_edges(points: &[Point<i32>]) -> impl Iterator<Item = (Point<i32>, Point<i32>)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

pub(crate) fn distance(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn cross(a: Point<i32>, b: Point<i32>) -> f64 {
    a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64
}

/// Integer pixel coordinate of a shape's centroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned box; width and height count pixels inclusively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box containing all points, `None` for an empty slice
    pub fn enclosing(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x) as u32 + 1,
            height: (max_y - min_y) as u32 + 1,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum ColorName {
    Blue,
    Orange,
    Red,
    Green,
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum ShapeName {
    Triangle,
    Square,
    Rectangle,
    Pentagon,
    Hexagon,
    Circle,
    Unclassified,
}

/// One detected shape. Only ever built from a fully classified contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub color: ColorName,
    pub shape: ShapeName,
    pub centroid: Centroid,
}

impl ShapeRecord {
    /// Text drawn next to the shape when labelling
    pub fn label(&self) -> String {
        format!("({}, {})", self.color, self.shape)
    }
}

impl fmt::Display for ShapeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.color, self.shape, self.centroid)
    }
}
