use serde::{Deserialize, Serialize};

use crate::error::{DetectionError, ParameterViolation};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Ordered edge pixels collected by one tracing walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the distances between consecutive points (open path).
    pub fn perimeter(&self) -> f64 {
        crate::geometry::path_length(&self.points)
    }
}

/// Simplified contour. The edge from the last vertex back to the first is
/// implied, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Axis-aligned box that passed the rectangle test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleCandidate {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub confidence: f64,
}

impl RectangleCandidate {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Exclusive right edge, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
    pub x: u32,
    pub y: u32,
}

/// Final output unit of the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// 1-based rank in the result list.
    pub id: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub area: u64,
    /// `width / height`, rounded to two decimals.
    pub aspect_ratio: f64,
    pub confidence: f64,
    pub center: Center,
}

impl Detection {
    pub fn from_candidate(id: usize, candidate: &RectangleCandidate) -> Self {
        let aspect_ratio = if candidate.height == 0 {
            0.0
        } else {
            (f64::from(candidate.width) / f64::from(candidate.height) * 100.0).round() / 100.0
        };

        Self {
            id,
            x: candidate.x,
            y: candidate.y,
            width: candidate.width,
            height: candidate.height,
            area: candidate.area(),
            aspect_ratio,
            confidence: candidate.confidence,
            center: Center {
                x: candidate.x + candidate.width / 2,
                y: candidate.y + candidate.height / 2,
            },
        }
    }
}

/// Caller-supplied tuning for one detection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionParameters {
    /// Gradient magnitude threshold; lower values keep weaker edges.
    pub edge_sensitivity: u32,
    pub min_area: u32,
    pub max_aspect_ratio: f64,
}

impl DetectionParameters {
    pub const EDGE_SENSITIVITY_RANGE: (u32, u32) = (10, 300);
    pub const MIN_AREA_RANGE: (u32, u32) = (100, 50_000);
    pub const MAX_ASPECT_RATIO_RANGE: (f64, f64) = (1.0, 20.0);

    pub fn new(edge_sensitivity: u32, min_area: u32, max_aspect_ratio: f64) -> Self {
        Self {
            edge_sensitivity,
            min_area,
            max_aspect_ratio,
        }
    }

    /// Check every field against its domain, reporting all violations at once.
    pub fn validate(&self) -> Result<(), DetectionError> {
        let mut violations = Vec::new();

        let (lo, hi) = Self::EDGE_SENSITIVITY_RANGE;
        if !(lo..=hi).contains(&self.edge_sensitivity) {
            violations.push(ParameterViolation {
                field: "edge_sensitivity",
                reason: format!(
                    "must be between {} and {}, got {}",
                    lo, hi, self.edge_sensitivity
                ),
            });
        }

        let (lo, hi) = Self::MIN_AREA_RANGE;
        if !(lo..=hi).contains(&self.min_area) {
            violations.push(ParameterViolation {
                field: "min_area",
                reason: format!("must be between {} and {}, got {}", lo, hi, self.min_area),
            });
        }

        let (lo, hi) = Self::MAX_ASPECT_RATIO_RANGE;
        // NaN fails the range check too
        if !(lo..=hi).contains(&self.max_aspect_ratio) {
            violations.push(ParameterViolation {
                field: "max_aspect_ratio",
                reason: format!(
                    "must be between {} and {}, got {}",
                    lo, hi, self.max_aspect_ratio
                ),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DetectionError::InvalidParameters(violations))
        }
    }
}

impl Default for DetectionParameters {
    fn default() -> Self {
        Self {
            edge_sensitivity: 50,
            min_area: 1000,
            max_aspect_ratio: 5.0,
        }
    }
}
