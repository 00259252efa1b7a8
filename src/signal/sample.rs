//! Time-series sample type.

/// One intensity measurement taken from a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the stream started.
    pub timestamp: f64,
    /// Mean ROI intensity for the frame.
    pub intensity: f64,
}

impl Sample {
    /// Creates a new sample.
    pub fn new(timestamp: f64, intensity: f64) -> Self {
        Self {
            timestamp,
            intensity,
        }
    }
}
