//! Bounded intensity time-series buffer with outlier rejection.
//!
//! Collects per-frame (timestamp, intensity) samples for spectral
//! analysis. The buffer is count-bounded with FIFO eviction, sized to
//! hold several full pulse cycles at the lowest configured BPM, and
//! clamps samples that deviate too far from the rolling mean — motion
//! and lighting artifacts, not physiological events.

use super::Sample;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors from buffer operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BufferError {
    /// Timestamps must be strictly increasing; feeding a stale one is a
    /// caller bug, not a recoverable condition.
    #[error("non-monotonic timestamp: {new} after {last}")]
    NonMonotonicTimestamp { last: f64, new: f64 },
}

/// What happened to an appended sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Stored as given.
    Stored,
    /// Intensity replaced by the rolling mean (spike rejected).
    Clamped,
}

/// Append-only, time-ordered, capacity-bounded sample store.
#[derive(Debug)]
pub struct SignalBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
    spike_limit: f64,
    total_appended: u64,
    total_clamped: u64,
}

impl SignalBuffer {
    /// Creates a buffer holding up to `capacity` samples, clamping
    /// intensities that deviate from the rolling mean by more than
    /// `spike_limit`.
    pub fn new(capacity: usize, spike_limit: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            spike_limit,
            total_appended: 0,
            total_clamped: 0,
        }
    }

    /// Appends a sample, enforcing timestamp monotonicity and the spike
    /// policy. The oldest sample is evicted once capacity is reached.
    pub fn append(&mut self, timestamp: f64, intensity: f64) -> Result<AppendOutcome, BufferError> {
        if let Some(last) = self.samples.back() {
            if timestamp <= last.timestamp {
                return Err(BufferError::NonMonotonicTimestamp {
                    last: last.timestamp,
                    new: timestamp,
                });
            }
        }

        let mut outcome = AppendOutcome::Stored;
        let mut value = intensity;
        if let Some(mean) = self.rolling_mean() {
            if (intensity - mean).abs() > self.spike_limit {
                tracing::debug!(
                    intensity,
                    mean,
                    limit = self.spike_limit,
                    "spike clamped to rolling mean"
                );
                value = mean;
                outcome = AppendOutcome::Clamped;
                self.total_clamped += 1;
            }
        }

        self.samples.push_back(Sample::new(timestamp, value));
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.total_appended += 1;

        tracing::trace!(
            timestamp,
            value,
            len = self.samples.len(),
            "sample appended"
        );
        Ok(outcome)
    }

    /// Mean intensity of the currently buffered samples.
    pub fn rolling_mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.intensity).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if no samples are buffered.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Time spanned by the buffered samples, in seconds.
    pub fn span(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }

    /// Iterates over the buffered samples in time order.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    /// Buffered timestamps in time order.
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    /// Buffered intensities in time order.
    pub fn intensities(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.intensity).collect()
    }

    /// Total samples ever appended.
    pub fn total_appended(&self) -> u64 {
        self.total_appended
    }

    /// Total samples clamped by the spike policy.
    pub fn total_clamped(&self) -> u64 {
        self.total_clamped
    }

    /// Discards all buffered samples.
    pub fn clear(&mut self) {
        self.samples.clear();
        tracing::debug!("signal buffer cleared");
    }
}
