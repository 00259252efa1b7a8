//! Per-frame pipeline orchestration.
//!
//! `PulseProcessor` owns every pipeline stage and drives one pass per
//! incoming frame: tracker → forehead ROI → sample buffer → conditioner
//! → spectral estimator. Rendering, export, and network collaborators
//! read its output fields; they never mutate it.

use crate::capture::{ConfigError, Frame, PulseConfig, Rect};
use crate::roi;
use crate::signal::{BufferError, SignalBuffer, SignalConditioner};
use crate::spectral::{PulseEstimate, SpectralEstimator, Spectrum};
use crate::tracking::{FaceDetector, RegionTracker, TrackerState};

/// Face box annotation color (green).
const FACE_COLOR: [u8; 3] = [0, 255, 0];
/// Forehead box annotation color (blue).
const FOREHEAD_COLOR: [u8; 3] = [0, 0, 255];

/// Pipeline warm-up phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No face has produced a sample yet.
    Init,
    /// Samples are accumulating but the buffer is below the minimum.
    Warmup,
    /// Continuous per-frame BPM updates.
    Stable,
}

/// Drives the full pulse-estimation pipeline, one pass per frame.
pub struct PulseProcessor {
    config: PulseConfig,
    tracker: RegionTracker,
    detector: Box<dyn FaceDetector>,
    conditioner: SignalConditioner,
    estimator: SpectralEstimator,
    /// One accumulation buffer per camera/stream index.
    buffers: Vec<SignalBuffer>,
    active_cam: usize,
    phase: Phase,
    forehead: Rect,
    face_slice: Option<Frame>,
}

impl PulseProcessor {
    /// Creates a processor with the given configuration and an injected
    /// face-detection capability. Fails fast on malformed configuration.
    pub fn new(config: PulseConfig, detector: Box<dyn FaceDetector>) -> Result<Self, ConfigError> {
        config.validate()?;
        let [bpm_low, bpm_high] = config.bpm_limits;
        Ok(Self {
            tracker: RegionTracker::new(config.face_detector_smoothness),
            detector,
            conditioner: SignalConditioner::new(config.min_samples),
            estimator: SpectralEstimator::new(bpm_low, bpm_high, config.bpm_smoothing),
            buffers: Vec::new(),
            active_cam: 0,
            phase: Phase::Init,
            forehead: Rect::default(),
            face_slice: None,
            config,
        })
    }

    /// Executes one full pipeline pass and returns the annotated frame.
    ///
    /// `camera_index` selects which per-stream buffer accumulates this
    /// frame's sample. Non-fatal conditions (detection miss, degenerate
    /// ROI, spikes, warm-up) are absorbed here; the only error is the
    /// timestamp-monotonicity contract violation.
    pub fn run(&mut self, frame: &Frame, camera_index: usize) -> Result<Frame, BufferError> {
        self.select_camera(camera_index);

        let mut annotated = frame.clone();
        if !frame.is_valid() {
            tracing::warn!(?frame, "malformed frame skipped");
            return Ok(annotated);
        }

        let face = self.tracker.locate(frame, self.detector.as_mut());
        if !self.tracker.has_face() {
            return Ok(annotated);
        }

        self.forehead = roi::default_forehead_box(face);
        annotated.draw_rect(face, FACE_COLOR);
        annotated.draw_rect(self.forehead, FOREHEAD_COLOR);
        self.face_slice = frame.crop(face);

        let intensity = match roi::mean_intensity(frame, self.forehead) {
            Ok(value) => value,
            Err(e) => {
                // Degenerate ROI: skip this frame's sample, buffer untouched
                tracing::debug!(error = %e, "roi extraction skipped");
                return Ok(annotated);
            }
        };

        let buffer = &mut self.buffers[self.active_cam];
        buffer.append(frame.timestamp(), intensity)?;

        match self.conditioner.condition(buffer) {
            Some(series) => {
                self.estimator.estimate(&series);
                if self.phase != Phase::Stable {
                    tracing::info!(len = buffer.len(), "pipeline stable, reporting bpm");
                }
                self.phase = Phase::Stable;
            }
            None => {
                if self.phase == Phase::Init {
                    tracing::debug!("first sample accumulated, warming up");
                }
                self.phase = Phase::Warmup;
            }
        }

        Ok(annotated)
    }

    /// Toggles the tracker between searching and locked, returning the
    /// new state.
    pub fn toggle_tracking(&mut self) -> TrackerState {
        self.tracker.toggle()
    }

    /// Current pipeline phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Smoothed BPM, withheld until the pipeline is stable.
    pub fn bpm(&self) -> Option<f64> {
        if self.phase != Phase::Stable {
            return None;
        }
        self.estimator.last_estimate().map(|e| e.bpm)
    }

    /// Last full estimate including the confidence proxy.
    pub fn estimate(&self) -> Option<PulseEstimate> {
        self.estimator.last_estimate()
    }

    /// Current tracker state.
    pub fn tracker_state(&self) -> TrackerState {
        self.tracker.state()
    }

    /// Current face box, if a face has been found.
    pub fn face(&self) -> Option<Rect> {
        self.tracker.has_face().then(|| self.tracker.face())
    }

    /// Current forehead box, if one has been derived.
    pub fn forehead(&self) -> Option<Rect> {
        (!self.forehead.is_empty()).then_some(self.forehead)
    }

    /// Cropped face image from the last processed frame, for rendering.
    pub fn face_slice(&self) -> Option<&Frame> {
        self.face_slice.as_ref()
    }

    /// Sample timestamps of the active stream, for plotting/export.
    pub fn times(&self) -> Vec<f64> {
        self.buffers
            .get(self.active_cam)
            .map(|b| b.times())
            .unwrap_or_default()
    }

    /// Sample intensities of the active stream, for plotting/export.
    pub fn intensities(&self) -> Vec<f64> {
        self.buffers
            .get(self.active_cam)
            .map(|b| b.intensities())
            .unwrap_or_default()
    }

    /// Latest frequency/amplitude arrays, for plotting.
    pub fn spectrum(&self) -> &Spectrum {
        self.estimator.spectrum()
    }

    /// Switches the active stream, growing the buffer set on demand.
    ///
    /// A switch drops back to searching: the new stream's face is in an
    /// unknown position.
    fn select_camera(&mut self, camera_index: usize) {
        while self.buffers.len() <= camera_index {
            self.buffers.push(SignalBuffer::new(
                self.config.buffer_capacity,
                self.config.data_spike_limit,
            ));
        }
        if camera_index != self.active_cam {
            tracing::info!(from = self.active_cam, to = camera_index, "camera switched");
            self.active_cam = camera_index;
            self.tracker.search();
            self.phase = if self.buffers[camera_index].is_empty() {
                Phase::Init
            } else {
                Phase::Warmup
            };
        }
    }
}

impl std::fmt::Debug for PulseProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulseProcessor")
            .field("phase", &self.phase)
            .field("active_cam", &self.active_cam)
            .field("tracker_state", &self.tracker.state())
            .field("forehead", &self.forehead)
            .finish()
    }
}
