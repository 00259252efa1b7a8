//! Injected face-detection capability.
//!
//! Face detection is an external concern (a cascade classifier, a neural
//! detector, or a test double). The tracker only needs candidate boxes,
//! so the dependency is a trait the caller provides.

use crate::capture::{Frame, Rect};

/// Trait for face-detection implementations.
///
/// Implementations may return zero or more candidate boxes per frame.
/// No ordering is assumed; the tracker picks the largest by area.
pub trait FaceDetector {
    /// Detects face bounding boxes in the frame.
    fn detect(&mut self, frame: &Frame) -> Vec<Rect>;
}

/// Detector double that returns a fixed set of boxes on every frame.
///
/// Used by tests and the demo binary, where the synthetic subject
/// does not move.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    boxes: Vec<Rect>,
}

impl StaticDetector {
    /// Creates a detector that always reports the given boxes.
    pub fn new(boxes: Vec<Rect>) -> Self {
        Self { boxes }
    }

    /// Creates a detector that never finds a face.
    pub fn none() -> Self {
        Self { boxes: Vec::new() }
    }
}

impl FaceDetector for StaticDetector {
    fn detect(&mut self, _frame: &Frame) -> Vec<Rect> {
        self.boxes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_detector_repeats_boxes() {
        let frame = Frame::filled(32, 32, [0; 3], 0.0, 1);
        let mut detector = StaticDetector::new(vec![Rect::new(1, 2, 3, 4)]);

        assert_eq!(detector.detect(&frame), vec![Rect::new(1, 2, 3, 4)]);
        assert_eq!(detector.detect(&frame), vec![Rect::new(1, 2, 3, 4)]);
    }

    #[test]
    fn test_none_detector_is_empty() {
        let frame = Frame::filled(32, 32, [0; 3], 0.0, 1);
        assert!(StaticDetector::none().detect(&frame).is_empty());
    }
}
