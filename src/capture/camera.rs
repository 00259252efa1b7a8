//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, Frame};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Mock camera that generates synthetic frames with a pulsing intensity.
///
/// Every pixel follows `base + amplitude * sin(2π * pulse_hz * t)`, so a
/// forehead ROI extracted anywhere in the frame carries a clean
/// photoplethysmographic signal. Used by tests and the demo binary.
#[derive(Debug)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
    base: f64,
    amplitude: f64,
    pulse_hz: f64,
}

impl MockCamera {
    /// Creates a mock camera pulsing at 1.2 Hz (72 BPM) around gray 128.
    pub fn new() -> Self {
        Self::with_pulse(128.0, 5.0, 1.2)
    }

    /// Creates a mock camera with a custom synthetic pulse.
    pub fn with_pulse(base: f64, amplitude: f64, pulse_hz: f64) -> Self {
        Self {
            config: None,
            sequence: 0,
            base,
            amplitude,
            pulse_hz,
        }
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        let t = self.sequence as f64 / config.fps as f64;
        let value = self.base
            + self.amplitude * (2.0 * std::f64::consts::PI * self.pulse_hz * t).sin();
        let value = value.round().clamp(0.0, 255.0) as u8;

        self.sequence += 1;
        Ok(Frame::filled(
            config.width,
            config.height,
            [value; 3],
            t,
            self.sequence,
        ))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}

/// Real webcam backed by the `nokhwa` crate.
#[cfg(feature = "camera")]
pub struct NokhwaCamera {
    inner: Option<nokhwa::Camera>,
    opened_at: Option<std::time::Instant>,
    sequence: u64,
}

#[cfg(feature = "camera")]
impl NokhwaCamera {
    pub fn new() -> Self {
        Self {
            inner: None,
            opened_at: None,
            sequence: 0,
        }
    }
}

#[cfg(feature = "camera")]
impl Default for NokhwaCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "camera")]
impl Camera for NokhwaCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        use nokhwa::pixel_format::RgbFormat;
        use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

        let index = CameraIndex::Index(config.device_id);
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = nokhwa::Camera::new(index, requested)
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

        tracing::info!(device = config.device_id, "webcam opened");
        self.inner = Some(camera);
        self.opened_at = Some(std::time::Instant::now());
        self.sequence = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        use nokhwa::pixel_format::RgbFormat;

        let camera = self.inner.as_mut().ok_or(CameraError::NotInitialized)?;
        let opened_at = self.opened_at.ok_or(CameraError::NotInitialized)?;

        let raw = camera
            .frame()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let decoded = raw
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        let (width, height) = decoded.dimensions();

        self.sequence += 1;
        Ok(Frame::new(
            decoded.into_raw(),
            width,
            height,
            opened_at.elapsed().as_secs_f64(),
            self.sequence,
        ))
    }

    fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.inner.take() {
            let _ = camera.stop_stream();
        }
        self.opened_at = None;
        tracing::info!("webcam closed");
    }
}
