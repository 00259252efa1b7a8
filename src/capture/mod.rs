//! Camera input and frame handling.
//!
//! This module provides abstractions for capturing frames from a camera
//! and managing capture and pipeline configuration. The camera is treated
//! as a source of raw image data; all physiological analysis happens
//! downstream of it.

mod camera;
mod config;
mod frame;

#[cfg(feature = "camera")]
pub use camera::NokhwaCamera;
pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError, FileConfig, OutputConfig, PulseConfig};
pub use frame::{Frame, Rect};
