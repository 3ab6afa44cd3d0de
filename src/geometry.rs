//! Small geometry helpers shared by the pipeline stages.

use crate::models::{Point, RectangleCandidate};

pub fn distance(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    (dx * dx + dy * dy).sqrt()
}

/// Length of the open path through `points`.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
///
/// Falls back to the plain distance to `a` when `a == b`.
pub fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = f64::from(b.x - a.x);
    let dy = f64::from(b.y - a.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return distance(p, a);
    }
    let cross = dx * f64::from(a.y - p.y) - dy * f64::from(a.x - p.x);
    cross.abs() / len
}

/// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`.
pub fn bounding_box(points: &[Point]) -> Option<(i32, i32, i32, i32)> {
    let first = points.first()?;
    Some(points.iter().fold(
        (first.x, first.y, first.x, first.y),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    ))
}

pub fn intersection_area(a: &RectangleCandidate, b: &RectangleCandidate) -> u64 {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    if right <= left || bottom <= top {
        return 0;
    }
    u64::from(right - left) * u64::from(bottom - top)
}

/// Intersection area divided by the smaller of the two areas.
pub fn overlap_ratio(a: &RectangleCandidate, b: &RectangleCandidate) -> f64 {
    let smaller = a.area().min(b.area());
    if smaller == 0 {
        return 0.0;
    }
    intersection_area(a, b) as f64 / smaller as f64
}
