//! Face tracking and detection abstraction.
//!
//! Detection itself is an injected capability; this module owns the
//! policy around it: which candidate box to keep, how to smooth it, and
//! when to stop re-detecting altogether.

mod detector;
mod region;

pub use detector::{FaceDetector, StaticDetector};
pub use region::{RegionTracker, TrackerState};
