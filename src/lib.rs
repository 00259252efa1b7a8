//! Webcam Pulse Estimation Library
//!
//! Estimates a person's heart rate from webcam video by detecting the
//! subtle periodic brightness changes in facial skin caused by
//! blood-volume pulses (remote photoplethysmography, rPPG).
//!
//! # Architecture
//!
//! The system follows an explicit per-frame data flow:
//!
//! ```text
//! capture → tracking → roi → signal (buffer, conditioning) → spectral
//!                                                                ↓
//!                                           processor (bpm, spectrum)
//! ```
//!
//! # Design Principles
//!
//! - **Injected detection**: face detection is a trait the caller
//!   provides, so the pipeline is testable with synthetic detectors
//! - **Bounded state**: the sample buffer is capacity-bounded with FIFO
//!   eviction; everything downstream is recomputed each pass
//! - **Statistical correctness**: there is no clean ground truth, so
//!   outputs are judged by stability within the configured BPM band
//! - **No clinical claims**: this is a signal-processing demonstration,
//!   not a medical device
//!
//! # Example
//!
//! ```no_run
//! use pulse_cam::{
//!     capture::{Camera, CaptureConfig, MockCamera, PulseConfig},
//!     processor::PulseProcessor,
//!     tracking::StaticDetector,
//!     Rect,
//! };
//!
//! let mut camera = MockCamera::new();
//! camera.open(&CaptureConfig::default()).unwrap();
//!
//! let detector = StaticDetector::new(vec![Rect::new(200, 120, 240, 240)]);
//! let mut processor = PulseProcessor::new(PulseConfig::default(), Box::new(detector)).unwrap();
//!
//! for _ in 0..300 {
//!     let frame = camera.capture().unwrap();
//!     processor.run(&frame, 0).unwrap();
//! }
//!
//! if let Some(bpm) = processor.bpm() {
//!     println!("estimated pulse: {bpm:.1} bpm");
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod output;
pub mod processor;
pub mod roi;
pub mod signal;
pub mod spectral;
pub mod tracking;

// Re-export commonly used types at crate root
#[cfg(feature = "camera")]
pub use capture::NokhwaCamera;
pub use capture::{
    Camera, CameraError, CaptureConfig, ConfigError, FileConfig, Frame, MockCamera, PulseConfig,
    Rect,
};
pub use output::{CsvExporter, OutputError, UdpSink};
pub use processor::{Phase, PulseProcessor};
pub use roi::RoiError;
pub use signal::{
    AppendOutcome, BufferError, ConditionedSeries, Sample, SignalBuffer, SignalConditioner,
};
pub use spectral::{PulseEstimate, SpectralEstimator, Spectrum};
pub use tracking::{FaceDetector, RegionTracker, StaticDetector, TrackerState};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
