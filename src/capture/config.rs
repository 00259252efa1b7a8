//! Capture and pipeline configuration.
//!
//! All pipeline parameters are fixed at construction time. Changing the
//! BPM band or smoothing factors mid-stream would invalidate the
//! accumulated spectral state.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for camera capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Camera device index or identifier.
    pub device_id: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Target frames per second.
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

impl CaptureConfig {
    /// Creates a new configuration with the specified dimensions.
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.fps == 0 || self.fps > 120 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration for the pulse-estimation pipeline.
///
/// Immutable after the processor is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Physiological BPM band as `[low, high]`.
    pub bpm_limits: [f64; 2],
    /// Intensity deviation from the rolling mean beyond which a sample
    /// is treated as a motion/lighting artifact and clamped.
    pub data_spike_limit: f64,
    /// Face box inertia in `[0, 1]`; higher values track slower and
    /// suppress more detector jitter.
    pub face_detector_smoothness: f64,
    /// Maximum number of samples kept in the signal buffer.
    pub buffer_capacity: usize,
    /// Minimum samples before conditioning produces output.
    pub min_samples: usize,
    /// Exponential smoothing weight on the previous BPM in `[0, 1)`.
    pub bpm_smoothing: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            bpm_limits: [50.0, 160.0],
            data_spike_limit: 25.0,
            face_detector_smoothness: 0.7,
            buffer_capacity: 250, // ~8.3s at 30 fps, several cycles at 50 BPM
            min_samples: 32,
            bpm_smoothing: 0.6,
        }
    }
}

impl PulseConfig {
    /// Validates the configuration parameters.
    ///
    /// A malformed configuration is a contract violation and fails fast
    /// here rather than producing silently wrong estimates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [low, high] = self.bpm_limits;
        if !(low > 0.0 && low < high) {
            return Err(ConfigError::InvalidBpmBand);
        }
        if !(0.0..=1.0).contains(&self.face_detector_smoothness) {
            return Err(ConfigError::InvalidSmoothness);
        }
        if self.data_spike_limit <= 0.0 {
            return Err(ConfigError::InvalidSpikeLimit);
        }
        if !(0.0..1.0).contains(&self.bpm_smoothing) {
            return Err(ConfigError::InvalidBpmSmoothing);
        }
        if self.min_samples < 4 || self.buffer_capacity < self.min_samples {
            return Err(ConfigError::InvalidBufferSizes);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid frame dimensions")]
    InvalidDimensions,
    #[error("invalid frame rate (must be 1-120 fps)")]
    InvalidFrameRate,
    #[error("bpm_limits must satisfy 0 < low < high")]
    InvalidBpmBand,
    #[error("face_detector_smoothness must be in [0, 1]")]
    InvalidSmoothness,
    #[error("data_spike_limit must be positive")]
    InvalidSpikeLimit,
    #[error("bpm_smoothing must be in [0, 1)")]
    InvalidBpmSmoothing,
    #[error("buffer_capacity must be >= min_samples, min_samples >= 4")]
    InvalidBufferSizes,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub pulse: PulseConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Run continuously (true) or process a fixed number of frames (false).
    pub continuous: bool,
    /// Number of frames to process if not continuous.
    pub frame_count: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            frame_count: 300,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.capture.validate()?;
        config.pulse.validate()?;
        Ok(config)
    }
}
