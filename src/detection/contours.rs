use image::GrayImage;
use tracing::trace;

use crate::models::{Contour, Point};

/// Walks shorter than this are dropped as noise.
pub const MIN_CONTOUR_POINTS: usize = 10;
/// Hard cap on a single walk so dense edge blobs cannot run away.
pub const MAX_CONTOUR_POINTS: usize = 1000;

const NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Scratch storage for the flood walk, sized once per image.
#[derive(Debug, Clone)]
pub struct TraceBuffers {
    visited: Vec<bool>,
    stack: Vec<Point>,
}

impl TraceBuffers {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            visited: vec![false; width as usize * height as usize],
            stack: Vec::with_capacity(MAX_CONTOUR_POINTS),
        }
    }
}

/// Find contours in a binary edge image
pub fn find_contours(edges: &GrayImage, min_points: usize, max_points: usize) -> Vec<Contour> {
    let mut buffers = TraceBuffers::new(edges.width(), edges.height());
    trace_contours(edges, &mut buffers, min_points, max_points)
}

/// Raster-scan the interior and flood-walk every unvisited edge pixel.
///
/// Each walk is an explicit depth-first search over the 8-neighbourhood.
/// Pixels are marked and appended when first reached, so the contour lists
/// pixels in discovery order. A walk stops once it holds `max_points` pixels;
/// anything it did not reach stays unvisited and may seed a later contour.
/// `buffers` is cleared on entry, so it can be reused across calls.
pub fn trace_contours(
    edges: &GrayImage,
    buffers: &mut TraceBuffers,
    min_points: usize,
    max_points: usize,
) -> Vec<Contour> {
    let mut contours = Vec::new();
    // Point stores i32 coordinates
    let (Ok(w), Ok(h)) = (i32::try_from(edges.width()), i32::try_from(edges.height())) else {
        return contours;
    };
    if w < 3 || h < 3 || max_points == 0 {
        return contours;
    }

    let stride = edges.width() as usize;
    debug_assert_eq!(buffers.visited.len(), stride * edges.height() as usize);
    buffers.visited.fill(false);

    let mask: &[u8] = edges;
    let is_edge = |idx: usize| mask[idx] > 0;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let seed = flat_index(x, y, stride);
            if buffers.visited[seed] || !is_edge(seed) {
                continue;
            }

            buffers.visited[seed] = true;
            buffers.stack.clear();
            buffers.stack.push(Point::new(x, y));
            let mut points = vec![Point::new(x, y)];

            'walk: while let Some(p) = buffers.stack.pop() {
                for (dx, dy) in NEIGHBORS {
                    if points.len() >= max_points {
                        break 'walk;
                    }
                    let (nx, ny) = (p.x + dx, p.y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let idx = flat_index(nx, ny, stride);
                    if buffers.visited[idx] || !is_edge(idx) {
                        continue;
                    }
                    buffers.visited[idx] = true;
                    points.push(Point::new(nx, ny));
                    buffers.stack.push(Point::new(nx, ny));
                }
            }

            if points.len() >= min_points {
                contours.push(Contour::new(points));
            } else {
                trace!(x, y, len = points.len(), "dropping short contour");
            }
        }
    }

    contours
}

/// Row-major offset of a non-negative pixel coordinate.
fn flat_index(x: i32, y: i32, stride: usize) -> usize {
    y as usize * stride + x as usize
}
