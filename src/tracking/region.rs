//! Face-region tracking with a search/lock policy.
//!
//! While searching, the tracker re-detects the face each frame and
//! exponentially smooths the box to suppress detector jitter. Once a
//! stable ROI has been established the caller can lock the box in place,
//! removing tracking noise from the signal entirely.

use super::FaceDetector;
use crate::capture::{Frame, Rect};

/// Whether the tracker is actively re-detecting or holding its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Re-detect the face on every frame.
    Searching,
    /// Hold the last face box unconditionally.
    Locked,
}

/// Maintains the current face bounding box across frames.
#[derive(Debug)]
pub struct RegionTracker {
    state: TrackerState,
    face: Rect,
    /// Inertia weight in `[0, 1]`; higher tracks slower.
    smoothness: f64,
}

impl RegionTracker {
    /// Creates a tracker in the searching state with no face yet.
    pub fn new(smoothness: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&smoothness));
        Self {
            state: TrackerState::Searching,
            face: Rect::default(),
            smoothness,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Returns the current face box (empty until the first detection).
    pub fn face(&self) -> Rect {
        self.face
    }

    /// Returns true once a face has been found at least once.
    pub fn has_face(&self) -> bool {
        !self.face.is_empty()
    }

    /// Flips between searching and locked, returning the new state.
    pub fn toggle(&mut self) -> TrackerState {
        self.state = match self.state {
            TrackerState::Searching => TrackerState::Locked,
            TrackerState::Locked => TrackerState::Searching,
        };
        tracing::info!(state = ?self.state, "tracker toggled");
        self.state
    }

    /// Forces the tracker back into the searching state.
    pub fn search(&mut self) {
        self.state = TrackerState::Searching;
    }

    /// Updates and returns the face box for this frame.
    ///
    /// Locked: returns the held box without invoking the detector.
    /// Searching: picks the largest detected box and smooths toward it;
    /// a detection miss keeps the previous box unchanged.
    pub fn locate(&mut self, frame: &Frame, detector: &mut dyn FaceDetector) -> Rect {
        if self.state == TrackerState::Locked {
            return self.face;
        }

        let Some(best) = detector
            .detect(frame)
            .into_iter()
            .max_by_key(|b| b.area())
            .filter(|b| !b.is_empty())
        else {
            tracing::trace!("no face detected, keeping previous box");
            return self.face;
        };

        self.face = if self.has_face() {
            Self::blend(self.face, best, self.smoothness)
        } else {
            tracing::debug!(face = ?best, "initial face acquired");
            best
        };
        self.face
    }

    /// Exponentially smooths `prev` toward `next` with inertia `alpha`.
    fn blend(prev: Rect, next: Rect, alpha: f64) -> Rect {
        let mix = |p: i32, n: i32| (alpha * p as f64 + (1.0 - alpha) * n as f64).round() as i32;
        Rect::new(
            mix(prev.x, next.x),
            mix(prev.y, next.y),
            mix(prev.w, next.w),
            mix(prev.h, next.h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::StaticDetector;

    fn frame() -> Frame {
        Frame::filled(100, 100, [128; 3], 0.0, 1)
    }

    #[test]
    fn test_toggle_is_involution() {
        let mut tracker = RegionTracker::new(0.5);
        let initial = tracker.state();

        let after_one = tracker.toggle();
        assert_ne!(after_one, initial);
        assert_eq!(after_one, tracker.state());

        let after_two = tracker.toggle();
        assert_eq!(after_two, initial);
        assert_eq!(after_two, tracker.state());
    }

    #[test]
    fn test_first_detection_taken_directly() {
        let mut tracker = RegionTracker::new(0.9);
        let mut detector = StaticDetector::new(vec![Rect::new(10, 10, 50, 50)]);

        let face = tracker.locate(&frame(), &mut detector);
        assert_eq!(face, Rect::new(10, 10, 50, 50));
    }

    #[test]
    fn test_largest_box_selected() {
        let mut tracker = RegionTracker::new(0.0);
        let mut detector = StaticDetector::new(vec![
            Rect::new(0, 0, 10, 10),
            Rect::new(20, 20, 40, 40),
            Rect::new(5, 5, 8, 8),
        ]);

        let face = tracker.locate(&frame(), &mut detector);
        assert_eq!(face, Rect::new(20, 20, 40, 40));
    }

    #[test]
    fn test_detection_miss_keeps_previous_box() {
        let mut tracker = RegionTracker::new(0.5);
        let mut found = StaticDetector::new(vec![Rect::new(10, 10, 50, 50)]);
        let mut missed = StaticDetector::none();

        tracker.locate(&frame(), &mut found);
        let face = tracker.locate(&frame(), &mut missed);
        assert_eq!(face, Rect::new(10, 10, 50, 50));
    }

    #[test]
    fn test_smoothing_damps_jitter() {
        let mut tracker = RegionTracker::new(0.8);
        let mut first = StaticDetector::new(vec![Rect::new(100, 100, 50, 50)]);
        let mut jumped = StaticDetector::new(vec![Rect::new(110, 100, 50, 50)]);

        tracker.locate(&frame(), &mut first);
        let face = tracker.locate(&frame(), &mut jumped);

        // 0.8 * 100 + 0.2 * 110 = 102: moved, but only part of the way
        assert_eq!(face.x, 102);
        assert_eq!(face.w, 50);
    }

    #[test]
    fn test_locked_skips_detection() {
        let mut tracker = RegionTracker::new(0.5);
        let mut detector = StaticDetector::new(vec![Rect::new(10, 10, 50, 50)]);

        tracker.locate(&frame(), &mut detector);
        tracker.toggle();
        assert_eq!(tracker.state(), TrackerState::Locked);

        let mut elsewhere = StaticDetector::new(vec![Rect::new(70, 70, 20, 20)]);
        let face = tracker.locate(&frame(), &mut elsewhere);
        assert_eq!(face, Rect::new(10, 10, 50, 50));
    }
}
