use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use std::f64::consts::TAU;

use crate::models::{distance, BoundingBox, Centroid, Contour};

/// Polygon approximation tolerance as a fraction of the contour perimeter
pub const DEFAULT_EPSILON_RATIO: f64 = 0.02;

/// Sides shorter than this many epsilons are merged into a single corner
const CORNER_MERGE_FACTOR: f64 = 4.0;

/// Vertices turning by less than this (degrees) are not corners
const MIN_CORNER_TURN: f64 = 25.0;

/// Geometric measurements of one contour
#[derive(Debug, Clone, PartialEq)]
pub struct ContourFeatures {
    pub area: f64,
    pub centroid: Centroid,
    pub perimeter: f64,
    pub approx_polygon: Vec<Point<i32>>,
    pub bbox: BoundingBox,
}

impl ContourFeatures {
    /// Measure a contour. Returns `None` for degenerate (zero-area) contours.
    pub fn measure(contour: &Contour, epsilon_ratio: f64) -> Option<Self> {
        let centroid = contour.centroid()?;
        let perimeter = contour.perimeter();
        let approx_polygon = approximate_polygon(&contour.points, epsilon_ratio * perimeter);
        let bbox = BoundingBox::enclosing(&approx_polygon)?;

        Some(Self {
            area: contour.area(),
            centroid,
            perimeter,
            approx_polygon,
            bbox,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.approx_polygon.len()
    }
}

/// Douglas-Peucker approximation of a closed curve.
///
/// The curve is cut at two mutually distant anchor points and each of the
/// two arcs is simplified on its own. The joined polygon is then cleaned up:
///
/// - vertices within `epsilon` of the chord joining their neighbours are removed,
///   so an anchor that happens to sit on a straight side does not survive;
/// - sides shorter than a few epsilons are collapsed into one vertex at the
///   crossing of the two sides around them. Edge detection blurs sharp
///   corners into short bevels, which would otherwise count as two corners;
/// - vertices that barely turn are removed.
///
/// The first vertex is never repeated at the end of the result.
pub fn approximate_polygon(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = farthest_from(points, 0);
    let second = farthest_from(points, first);
    if first == second {
        // Every point coincides
        return vec![points[first]];
    }

    let (lo, hi) = (first.min(second), first.max(second));

    let mut polygon = simplify_arc(&points[lo..=hi], epsilon);
    polygon.pop();

    let wrapped: Vec<Point<i32>> = points[hi..].iter().chain(&points[..=lo]).copied().collect();
    let mut back = simplify_arc(&wrapped, epsilon);
    back.pop();
    polygon.extend(back);

    let polygon = drop_flat_vertices(polygon, epsilon);
    let polygon = merge_short_sides(polygon, CORNER_MERGE_FACTOR * epsilon);
    let polygon = drop_flat_vertices(polygon, epsilon);
    drop_shallow_turns(polygon, MIN_CORNER_TURN)
}

fn farthest_from(points: &[Point<i32>], origin: usize) -> usize {
    let from = points[origin];
    let mut best = origin;
    let mut best_dist = 0.0;

    for (i, &p) in points.iter().enumerate() {
        let d = distance(from, p);
        if d > best_dist {
            best = i;
            best_dist = d;
        }
    }

    best
}

/// Open-curve Douglas-Peucker. Endpoints are always kept.
fn simplify_arc(arc: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if arc.len() <= 2 || epsilon <= 0.0 {
        return arc.to_vec();
    }
    approximate_polygon_dp(arc, epsilon, false)
}

fn drop_flat_vertices(mut polygon: Vec<Point<i32>>, epsilon: f64) -> Vec<Point<i32>> {
    loop {
        let before = polygon.len();
        let mut i = 0;

        while polygon.len() > 3 && i < polygon.len() {
            let n = polygon.len();
            let prev = polygon[(i + n - 1) % n];
            let next = polygon[(i + 1) % n];

            if perpendicular_distance(polygon[i], prev, next) <= epsilon {
                polygon.remove(i);
            } else {
                i += 1;
            }
        }

        if polygon.len() == before {
            return polygon;
        }
    }
}

/// Collapse the shortest side into one vertex while it is shorter than
/// `min_side` and more than three vertices remain.
fn merge_short_sides(mut polygon: Vec<Point<i32>>, min_side: f64) -> Vec<Point<i32>> {
    while polygon.len() > 3 {
        let n = polygon.len();
        let side = |i: usize| distance(polygon[i], polygon[(i + 1) % n]);

        let Some(i) = (0..n).min_by(|&a, &b| side(a).total_cmp(&side(b))) else {
            break;
        };
        if side(i) >= min_side {
            break;
        }

        let j = (i + 1) % n;
        let (a, b) = (polygon[i], polygon[j]);
        let before = polygon[(i + n - 1) % n];
        let after = polygon[(j + 1) % n];

        let mid = ((a.x + b.x) as f64 / 2.0, (a.y + b.y) as f64 / 2.0);
        let (x, y) = match line_intersection(before, a, b, after) {
            Some((x, y)) if (x - mid.0).hypot(y - mid.1) <= min_side => (x, y),
            _ => mid,
        };

        polygon[i] = Point::new(x.round() as i32, y.round() as i32);
        polygon.remove(j);
    }

    polygon
}

/// Crossing point of the line through `a`, `b` and the line through `c`, `d`
fn line_intersection(
    a: Point<i32>,
    b: Point<i32>,
    c: Point<i32>,
    d: Point<i32>,
) -> Option<(f64, f64)> {
    let (x1, y1, x2, y2) = (a.x as f64, a.y as f64, b.x as f64, b.y as f64);
    let (x3, y3, x4, y4) = (c.x as f64, c.y as f64, d.x as f64, d.y as f64);

    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom.abs() < 1e-9 {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
    Some((x1 + t * (x2 - x1), y1 + t * (y2 - y1)))
}

fn drop_shallow_turns(mut polygon: Vec<Point<i32>>, min_turn: f64) -> Vec<Point<i32>> {
    while polygon.len() > 3 {
        let n = polygon.len();
        let turn = |i: usize| turn_angle(polygon[(i + n - 1) % n], polygon[i], polygon[(i + 1) % n]);

        let Some(i) = (0..n).min_by(|&a, &b| turn(a).total_cmp(&turn(b))) else {
            break;
        };
        if turn(i) >= min_turn {
            break;
        }
        polygon.remove(i);
    }

    polygon
}

/// Change of heading at `p`, in degrees (0 for a straight line)
fn turn_angle(prev: Point<i32>, p: Point<i32>, next: Point<i32>) -> f64 {
    let heading_in = ((p.y - prev.y) as f64).atan2((p.x - prev.x) as f64);
    let heading_out = ((next.y - p.y) as f64).atan2((next.x - p.x) as f64);
    let d = (heading_out - heading_in).abs() % TAU;
    d.min(TAU - d).to_degrees()
}

/// Distance from `p` to the line through `a` and `b`
fn perpendicular_distance(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let len = (dx * dx + dy * dy).sqrt();

    if len < f64::EPSILON {
        return distance(a, p);
    }

    let px = (p.x - a.x) as f64;
    let py = (p.y - a.y) as f64;
    (dx * py - dy * px).abs() / len
}
