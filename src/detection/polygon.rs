use crate::geometry::{distance, perpendicular_distance};
use crate::models::{Contour, Point, Polygon};

pub const DEFAULT_EPSILON_RATIO: f64 = 0.02;

/// Reduce a contour to its dominant vertices with Douglas-Peucker.
///
/// The tolerance is `epsilon_ratio` times the open-path length of the whole
/// contour. Spans are processed from an explicit work-list; the result is the
/// same as the textbook recursion (first farthest point wins on ties).
///
/// A traced loop ends beside its own start, so when the simplified polygon has
/// more than three vertices and the last one sits within tolerance of the first,
/// the last one is dropped and the closing edge stays implicit.
pub fn simplify(contour: &Contour, epsilon_ratio: f64) -> Polygon {
    let points = &contour.points;
    if points.len() < 3 {
        return Polygon::new(points.clone());
    }

    let tolerance = epsilon_ratio * contour.perimeter();
    let mut vertices = douglas_peucker(points, tolerance);
    close_loop(&mut vertices, tolerance);
    Polygon::new(vertices)
}

fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut spans = vec![(0, last)];
    while let Some((start, end)) = spans.pop() {
        if end <= start + 1 {
            continue;
        }

        let (a, b) = (points[start], points[end]);
        let mut max_dist = 0.0;
        let mut split = start;
        for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = perpendicular_distance(p, a, b);
            if d > max_dist {
                max_dist = d;
                split = i;
            }
        }

        // split == start means no interior point lies off the chord
        if max_dist > tolerance && split > start {
            keep[split] = true;
            spans.push((split, end));
            spans.push((start, split));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

fn close_loop(vertices: &mut Vec<Point>, tolerance: f64) {
    if vertices.len() <= 3 {
        return;
    }
    if let (Some(&first), Some(&last)) = (vertices.first(), vertices.last()) {
        if distance(first, last) <= tolerance {
            vertices.pop();
        }
    }
}
