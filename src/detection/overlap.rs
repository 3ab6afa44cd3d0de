use crate::geometry::overlap_ratio;
use crate::models::RectangleCandidate;

pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.3;

/// Greedy suppression of overlapping candidates.
///
/// Candidates are visited by descending confidence (stable for ties) and kept
/// unless they overlap an already kept one by more than `threshold`, where
/// overlap is the intersection over the *smaller* box. The result is in
/// acceptance order.
pub fn resolve_overlaps(
    mut candidates: Vec<RectangleCandidate>,
    threshold: f64,
) -> Vec<RectangleCandidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut accepted: Vec<RectangleCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if accepted
            .iter()
            .all(|kept| overlap_ratio(kept, &candidate) <= threshold)
        {
            accepted.push(candidate);
        }
    }
    accepted
}
