pub mod contours;
pub mod overlap;
pub mod polygon;
pub mod preprocessing;
pub mod rectangles;
pub mod workspace;

use image::{DynamicImage, ImageBuffer, Rgba};
use tracing::debug;

use crate::error::{DetectionError, ParameterViolation};
use crate::models::{Contour, Detection, DetectionParameters, Polygon, RectangleCandidate};

pub use workspace::Workspace;

pub const DEFAULT_BLUR_RADIUS: u32 = 1;
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Main detection pipeline orchestrator
///
/// Holds the tuning that is not part of [`DetectionParameters`]. A detector is
/// plain data, so one instance can be shared or moved to a worker thread; each
/// call allocates its own [`Workspace`].
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleDetector {
    pub blur_radius: u32,
    pub epsilon_ratio: f64,
    pub overlap_threshold: f64,
    pub max_results: usize,
    pub min_contour_points: usize,
    pub max_contour_points: usize,
}

impl RectangleDetector {
    pub fn new() -> Self {
        Self {
            blur_radius: DEFAULT_BLUR_RADIUS,
            epsilon_ratio: polygon::DEFAULT_EPSILON_RATIO,
            overlap_threshold: overlap::DEFAULT_OVERLAP_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            min_contour_points: contours::MIN_CONTOUR_POINTS,
            max_contour_points: contours::MAX_CONTOUR_POINTS,
        }
    }

    pub fn with_blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = radius;
        self
    }

    pub fn with_epsilon_ratio(mut self, epsilon_ratio: f64) -> Self {
        self.epsilon_ratio = epsilon_ratio;
        self
    }

    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Run the full detection pipeline on a raw RGBA buffer.
    ///
    /// Parameters are validated before anything is allocated. A zero-sized
    /// image yields no detections; a buffer whose length does not match
    /// `width * height * 4` is a [`DetectionError::ProcessingFailure`].
    pub fn detect(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        params: &DetectionParameters,
    ) -> Result<Vec<Detection>, DetectionError> {
        self.validate(params)?;
        if width == 0 || height == 0 {
            debug!(width, height, "empty image, nothing to detect");
            return Ok(Vec::new());
        }

        let rgba = rgba_view(pixels, width, height)?;
        let mut workspace = Workspace::new(width, height);
        self.preprocess_into(&rgba, params, &mut workspace);
        Ok(self.finish(&mut workspace, params))
    }

    /// Continue detection from a workspace already filled by [`Self::preprocess`].
    ///
    /// The edge mask is reused as is, so `params.edge_sensitivity` only takes
    /// effect through the earlier `preprocess` call.
    pub fn detect_prepared(
        &self,
        workspace: &mut Workspace,
        params: &DetectionParameters,
    ) -> Result<Vec<Detection>, DetectionError> {
        self.validate(params)?;
        Ok(self.finish(workspace, params))
    }

    /// Check the caller parameters together with this detector's own tuning,
    /// reporting every violation at once.
    pub fn validate(&self, params: &DetectionParameters) -> Result<(), DetectionError> {
        let mut violations = match params.validate() {
            Ok(()) => Vec::new(),
            Err(err) => err.violations().to_vec(),
        };

        if !self.epsilon_ratio.is_finite() || self.epsilon_ratio < 0.0 {
            violations.push(ParameterViolation {
                field: "epsilon_ratio",
                reason: format!("must be a finite non-negative number, got {}", self.epsilon_ratio),
            });
        }
        if !self.overlap_threshold.is_finite() || self.overlap_threshold < 0.0 {
            violations.push(ParameterViolation {
                field: "overlap_threshold",
                reason: format!(
                    "must be a finite non-negative number, got {}",
                    self.overlap_threshold
                ),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DetectionError::InvalidParameters(violations))
        }
    }

    /// Run the full detection pipeline on a decoded image
    pub fn detect_image(
        &self,
        img: &DynamicImage,
        params: &DetectionParameters,
    ) -> Result<Vec<Detection>, DetectionError> {
        self.validate(params)?;
        let rgba = img.to_rgba8();
        self.detect(rgba.as_raw(), rgba.width(), rgba.height(), params)
    }

    /// Run grayscale, smoothing and edge extraction, returning the filled
    /// workspace (for debugging)
    pub fn preprocess(
        &self,
        img: &DynamicImage,
        params: &DetectionParameters,
    ) -> Result<Workspace, DetectionError> {
        self.validate(params)?;
        let rgba = img.to_rgba8();
        let mut workspace = Workspace::new(rgba.width(), rgba.height());
        self.preprocess_into(&rgba, params, &mut workspace);
        Ok(workspace)
    }

    /// Get all contours from an image (for debugging)
    pub fn get_contours(
        &self,
        img: &DynamicImage,
        params: &DetectionParameters,
    ) -> Result<Vec<Contour>, DetectionError> {
        let mut workspace = self.preprocess(img, params)?;
        Ok(self.trace(&mut workspace))
    }

    /// Get simplified polygons from an image (for debugging)
    pub fn get_polygons(
        &self,
        img: &DynamicImage,
        params: &DetectionParameters,
    ) -> Result<Vec<Polygon>, DetectionError> {
        Ok(self
            .get_contours(img, params)?
            .iter()
            .map(|c| polygon::simplify(c, self.epsilon_ratio))
            .collect())
    }

    /// Get rectangle candidates before overlap resolution (for debugging)
    pub fn get_candidates(
        &self,
        img: &DynamicImage,
        params: &DetectionParameters,
    ) -> Result<Vec<RectangleCandidate>, DetectionError> {
        let contours = self.get_contours(img, params)?;
        Ok(self.candidates_from(&contours, params))
    }

    fn preprocess_into(
        &self,
        rgba: &ImageBuffer<Rgba<u8>, impl std::ops::Deref<Target = [u8]>>,
        params: &DetectionParameters,
        workspace: &mut Workspace,
    ) {
        preprocessing::to_grayscale_into(rgba, &mut workspace.gray);
        preprocessing::gaussian_blur_into(&workspace.gray, self.blur_radius, &mut workspace.smoothed);
        preprocessing::detect_edges_into(
            &workspace.smoothed,
            params.edge_sensitivity,
            &mut workspace.edges,
        );
        debug!(
            width = rgba.width(),
            height = rgba.height(),
            blur_radius = self.blur_radius,
            threshold = params.edge_sensitivity,
            "extracted edges"
        );
    }

    fn trace(&self, workspace: &mut Workspace) -> Vec<Contour> {
        let contours = contours::trace_contours(
            &workspace.edges,
            &mut workspace.trace,
            self.min_contour_points,
            self.max_contour_points,
        );
        debug!(count = contours.len(), "traced contours");
        contours
    }

    fn candidates_from(
        &self,
        contours: &[Contour],
        params: &DetectionParameters,
    ) -> Vec<RectangleCandidate> {
        let candidates: Vec<_> = contours
            .iter()
            .filter_map(|contour| {
                let polygon = polygon::simplify(contour, self.epsilon_ratio);
                rectangles::validate_rectangle(&polygon, params.min_area, params.max_aspect_ratio)
            })
            .collect();
        debug!(
            contours = contours.len(),
            candidates = candidates.len(),
            "validated rectangles"
        );
        candidates
    }

    fn finish(&self, workspace: &mut Workspace, params: &DetectionParameters) -> Vec<Detection> {
        let contours = self.trace(workspace);
        let candidates = self.candidates_from(&contours, params);
        self.rank(candidates)
    }

    fn rank(&self, candidates: Vec<RectangleCandidate>) -> Vec<Detection> {
        let total = candidates.len();
        let survivors = overlap::resolve_overlaps(candidates, self.overlap_threshold);
        debug!(
            candidates = total,
            survivors = survivors.len(),
            "resolved overlaps"
        );

        survivors
            .iter()
            .take(self.max_results)
            .enumerate()
            .map(|(i, c)| Detection::from_candidate(i + 1, c))
            .collect()
    }
}

impl Default for RectangleDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn rgba_view(
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<ImageBuffer<Rgba<u8>, &[u8]>, DetectionError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| {
            DetectionError::ProcessingFailure(format!(
                "image dimensions {}x{} overflow the address space",
                width, height
            ))
        })?;

    if pixels.len() != expected {
        return Err(DetectionError::ProcessingFailure(format!(
            "expected {} RGBA bytes for a {}x{} image, got {}",
            expected,
            width,
            height,
            pixels.len()
        )));
    }

    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| {
        DetectionError::ProcessingFailure(format!("cannot view {}x{} RGBA buffer", width, height))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DetectionParameters {
        DetectionParameters::new(75, 100, 5.0)
    }

    #[test]
    fn invalid_parameters_fail_before_buffer_checks() {
        let detector = RectangleDetector::new();
        let bad = DetectionParameters::new(9, 100, 5.0);
        let err = detector.detect(&[1, 2, 3], 10, 10, &bad).unwrap_err();
        assert!(matches!(err, DetectionError::InvalidParameters(_)));
    }

    #[test]
    fn zero_sized_image_yields_nothing() {
        let detector = RectangleDetector::new();
        assert!(detector.detect(&[], 0, 0, &params()).unwrap().is_empty());
        assert!(detector.detect(&[], 0, 50, &params()).unwrap().is_empty());
    }

    #[test]
    fn mismatched_buffer_is_processing_failure() {
        let detector = RectangleDetector::new();
        let err = detector.detect(&[0; 12], 2, 2, &params()).unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("expected 16 RGBA bytes"));
    }

    #[test]
    fn uniform_image_has_no_edges() {
        let detector = RectangleDetector::new();
        let pixels = [120u8, 80, 200, 255].repeat(64 * 48);
        let detections = detector.detect(&pixels, 64, 48, &params()).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn out_of_domain_tuning_is_rejected() {
        let detector = RectangleDetector::new()
            .with_epsilon_ratio(-0.01)
            .with_overlap_threshold(f64::NAN);
        let err = detector.detect(&[0; 16], 2, 2, &params()).unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, ["epsilon_ratio", "overlap_threshold"]);

        let infinite = RectangleDetector::new().with_epsilon_ratio(f64::INFINITY);
        assert!(infinite.validate(&params()).is_err());
        assert!(RectangleDetector::new().with_epsilon_ratio(0.0).validate(&params()).is_ok());
    }

    #[test]
    fn tuning_and_parameter_violations_are_reported_together() {
        let detector = RectangleDetector::new().with_epsilon_ratio(-1.0);
        let bad = DetectionParameters::new(9, 100, 5.0);
        let err = detector.validate(&bad).unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, ["edge_sensitivity", "epsilon_ratio"]);
    }

    #[test]
    fn prepared_workspace_can_be_reused() {
        let mut img = image::RgbaImage::from_pixel(120, 90, Rgba([255, 255, 255, 255]));
        imageproc::drawing::draw_filled_rect_mut(
            &mut img,
            imageproc::rect::Rect::at(30, 20).of_size(50, 40),
            Rgba([0, 0, 0, 255]),
        );
        let img = DynamicImage::ImageRgba8(img);
        let detector = RectangleDetector::new();

        let direct = detector.detect_image(&img, &params()).unwrap();
        let mut workspace = detector.preprocess(&img, &params()).unwrap();
        let first = detector.detect_prepared(&mut workspace, &params()).unwrap();
        let second = detector.detect_prepared(&mut workspace, &params()).unwrap();
        assert_eq!(direct.len(), 1);
        assert_eq!(first, direct);
        assert_eq!(second, direct);
    }

    #[test]
    fn builders_override_defaults() {
        let detector = RectangleDetector::new()
            .with_blur_radius(2)
            .with_epsilon_ratio(0.05)
            .with_overlap_threshold(0.5)
            .with_max_results(3);
        assert_eq!(detector.blur_radius, 2);
        assert_eq!(detector.epsilon_ratio, 0.05);
        assert_eq!(detector.overlap_threshold, 0.5);
        assert_eq!(detector.max_results, 3);
        assert_eq!(RectangleDetector::default().max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn detector_can_move_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RectangleDetector>();
    }
}
