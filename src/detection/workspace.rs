//! Per-call buffer arena for the detection pipeline.
//!
//! Every fixed-size buffer a run needs is allocated up front, sized to the
//! image, and dropped together when the run ends. Nothing is shared between
//! calls.
use image::GrayImage;

use super::contours::TraceBuffers;

pub struct Workspace {
    pub(crate) gray: GrayImage,
    pub(crate) smoothed: GrayImage,
    pub(crate) edges: GrayImage,
    pub(crate) trace: TraceBuffers,
}

impl Workspace {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            gray: GrayImage::new(width, height),
            smoothed: GrayImage::new(width, height),
            edges: GrayImage::new(width, height),
            trace: TraceBuffers::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.gray.dimensions()
    }

    pub fn grayscale(&self) -> &GrayImage {
        &self.gray
    }

    pub fn smoothed(&self) -> &GrayImage {
        &self.smoothed
    }

    pub fn edges(&self) -> &GrayImage {
        &self.edges
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("dimensions", &self.dimensions())
            .finish()
    }
}
