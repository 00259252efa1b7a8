//! Intensity time-series accumulation and conditioning.
//!
//! This module owns the streaming buffer of per-frame samples and the
//! conditioning pass that prepares it for spectral analysis. The buffer
//! is the only stateful piece; conditioning is recomputed from scratch
//! on every frame.

mod buffer;
mod conditioner;
mod sample;

pub use buffer::{AppendOutcome, BufferError, SignalBuffer};
pub use conditioner::{ConditionedSeries, SignalConditioner};
pub use sample::Sample;
