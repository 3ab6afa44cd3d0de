#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from rectscan for tests
pub use rectscan::{
    Detection, DetectionError, DetectionParameters, RectangleCandidate, RectangleDetector,
};

/// Parameters used by the reference scenarios.
pub fn reference_params() -> DetectionParameters {
    DetectionParameters::new(75, 100, 5.0)
}

pub fn detect(img: &image::RgbaImage, params: &DetectionParameters) -> Vec<Detection> {
    RectangleDetector::new()
        .detect(img.as_raw(), img.width(), img.height(), params)
        .expect("detection should succeed")
}
