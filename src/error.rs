use std::fmt;

use thiserror::Error;

/// A single detection parameter that fell outside its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterViolation {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for ParameterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Errors surfaced by the detection pipeline.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("invalid detection parameters: {}", join_violations(.0))]
    InvalidParameters(Vec<ParameterViolation>),

    #[error("processing failed: {0}")]
    ProcessingFailure(String),
}

impl DetectionError {
    /// Whether the caller should treat this error as "zero detections"
    /// instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DetectionError::ProcessingFailure(_))
    }

    pub fn violations(&self) -> &[ParameterViolation] {
        match self {
            DetectionError::InvalidParameters(v) => v,
            DetectionError::ProcessingFailure(_) => &[],
        }
    }
}

fn join_violations(violations: &[ParameterViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameters_lists_every_field() {
        let err = DetectionError::InvalidParameters(vec![
            ParameterViolation {
                field: "edge_sensitivity",
                reason: "must be between 10 and 300, got 5".to_string(),
            },
            ParameterViolation {
                field: "min_area",
                reason: "must be between 100 and 50000, got 1".to_string(),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.contains("edge_sensitivity: must be between 10 and 300, got 5"));
        assert!(msg.contains("min_area: must be between 100 and 50000, got 1"));
        assert!(!err.is_recoverable());
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn processing_failure_is_recoverable() {
        let err = DetectionError::ProcessingFailure("bad buffer".to_string());
        assert!(err.is_recoverable());
        assert!(err.violations().is_empty());
    }
}
