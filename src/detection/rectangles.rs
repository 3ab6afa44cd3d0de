use tracing::trace;

use crate::geometry::{bounding_box, distance};
use crate::models::{Point, Polygon, RectangleCandidate};

/// Confidence floor for any accepted candidate.
pub const MIN_CONFIDENCE: f64 = 0.3;
/// Fraction of `sqrt(area)` a vertex may stray from its nearest box corner on average.
pub const CORNER_TOLERANCE: f64 = 0.1;

/// Turn a quadrilateral into a scored candidate if it is close enough to its
/// own bounding box.
pub fn validate_rectangle(
    polygon: &Polygon,
    min_area: u32,
    max_aspect_ratio: f64,
) -> Option<RectangleCandidate> {
    if polygon.len() != 4 {
        return None;
    }

    let (min_x, min_y, max_x, max_y) = bounding_box(&polygon.vertices)?;
    let x = u32::try_from(min_x).ok()?;
    let y = u32::try_from(min_y).ok()?;
    let width = u32::try_from(max_x - min_x).ok()?;
    let height = u32::try_from(max_y - min_y).ok()?;
    if width == 0 || height == 0 {
        return None;
    }

    let area = u64::from(width) * u64::from(height);
    if area < u64::from(min_area) {
        trace!(width, height, "rejecting box below min area");
        return None;
    }

    let aspect = f64::from(width.max(height)) / f64::from(width.min(height));
    if aspect > max_aspect_ratio {
        trace!(width, height, aspect, "rejecting elongated box");
        return None;
    }

    let corners = [
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(min_x, max_y),
        Point::new(max_x, max_y),
    ];
    let total: f64 = polygon
        .vertices
        .iter()
        .map(|&v| {
            corners
                .iter()
                .map(|&c| distance(v, c))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    let avg_distance = total / 4.0;

    let tolerance = (area as f64).sqrt() * CORNER_TOLERANCE;
    if avg_distance >= tolerance {
        trace!(width, height, avg_distance, tolerance, "rejecting poor corner fit");
        return None;
    }

    let confidence = (1.0 - avg_distance / tolerance).clamp(MIN_CONFIDENCE, 1.0);
    Some(RectangleCandidate {
        x,
        y,
        width,
        height,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(points: &[(i32, i32)]) -> Polygon {
        Polygon::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn perfect_rectangle_has_full_confidence() {
        let p = polygon(&[(10, 10), (10, 60), (90, 60), (90, 10)]);
        let c = validate_rectangle(&p, 100, 5.0).unwrap();
        assert_eq!((c.x, c.y, c.width, c.height), (10, 10, 80, 50));
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn non_quadrilaterals_are_rejected() {
        let tri = polygon(&[(0, 0), (50, 0), (0, 50)]);
        let penta = polygon(&[(0, 0), (50, 0), (60, 25), (50, 50), (0, 50)]);
        assert!(validate_rectangle(&tri, 100, 5.0).is_none());
        assert!(validate_rectangle(&penta, 100, 5.0).is_none());
        assert!(validate_rectangle(&polygon(&[]), 100, 5.0).is_none());
    }

    #[test]
    fn small_and_elongated_boxes_are_rejected() {
        let small = polygon(&[(0, 0), (0, 9), (9, 9), (9, 0)]);
        assert!(validate_rectangle(&small, 100, 5.0).is_none());

        let thin = polygon(&[(0, 0), (0, 10), (120, 10), (120, 0)]);
        assert!(validate_rectangle(&thin, 100, 5.0).is_none());
        assert!(validate_rectangle(&thin, 100, 12.0).is_some());
    }

    #[test]
    fn degenerate_box_is_rejected() {
        let flat = polygon(&[(0, 5), (20, 5), (40, 5), (60, 5)]);
        assert!(validate_rectangle(&flat, 100, 20.0).is_none());
    }

    #[test]
    fn near_rectangle_gets_reduced_confidence() {
        let p = polygon(&[(0, 0), (0, 100), (100, 100), (96, 3)]);
        let c = validate_rectangle(&p, 100, 5.0).unwrap();
        // avg distance 1.25 against a tolerance of 10
        assert!((c.confidence - 0.875).abs() < 1e-9);
    }

    #[test]
    fn diamond_is_rejected() {
        let diamond = polygon(&[(50, 0), (100, 50), (50, 100), (0, 50)]);
        assert!(validate_rectangle(&diamond, 100, 5.0).is_none());
    }

    #[test]
    fn confidence_never_below_floor() {
        // avg distance 7.5 against a tolerance of 10 would score 0.25
        let p = polygon(&[(0, 0), (0, 100), (100, 100), (70, 0)]);
        let c = validate_rectangle(&p, 100, 5.0).unwrap();
        assert_eq!(c.confidence, MIN_CONFIDENCE);
    }
}
