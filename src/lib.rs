pub mod debug;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod models;

pub use detection::RectangleDetector;
pub use error::{DetectionError, ParameterViolation};
pub use models::{
    Center, Contour, Detection, DetectionParameters, Point, Polygon, RectangleCandidate,
};
