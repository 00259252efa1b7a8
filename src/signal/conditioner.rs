//! Signal conditioning ahead of spectral analysis.
//!
//! Camera frame intervals are never perfectly uniform, and the raw
//! intensity series carries slow illumination drift unrelated to the
//! pulsatile color change. Conditioning resamples the series onto a
//! uniform grid, removes the linear trend, and applies a Hamming window
//! to limit spectral leakage.

use super::SignalBuffer;

/// Uniformly spaced, detrended, windowed series ready for the FFT.
#[derive(Debug, Clone)]
pub struct ConditionedSeries {
    /// Conditioned sample values.
    pub values: Vec<f64>,
    /// Effective uniform sample rate in Hz.
    pub sample_rate: f64,
}

impl ConditionedSeries {
    /// Number of samples in the series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Turns a raw sample buffer into a [`ConditionedSeries`].
#[derive(Debug)]
pub struct SignalConditioner {
    min_samples: usize,
}

impl SignalConditioner {
    /// Creates a conditioner requiring at least `min_samples` buffered
    /// samples before producing output.
    pub fn new(min_samples: usize) -> Self {
        Self { min_samples }
    }

    /// Conditions the buffered series.
    ///
    /// Returns `None` during pipeline warm-up (fewer than `min_samples`
    /// samples, or a zero time span). Not an error.
    pub fn condition(&self, buffer: &SignalBuffer) -> Option<ConditionedSeries> {
        let n = buffer.len();
        if n < self.min_samples {
            tracing::trace!(len = n, min = self.min_samples, "warming up");
            return None;
        }

        let times = buffer.times();
        let values = buffer.intensities();
        let span = times[n - 1] - times[0];
        if span <= f64::EPSILON {
            return None;
        }

        let sample_rate = (n as f64 - 1.0) / span;
        let mut series = resample_uniform(&times, &values, sample_rate);
        detrend_linear(&mut series);
        apply_hamming(&mut series);

        Some(ConditionedSeries {
            values: series,
            sample_rate,
        })
    }
}

/// Linearly interpolates irregular samples onto a uniform grid covering
/// the same time span with the same number of points.
fn resample_uniform(times: &[f64], values: &[f64], sample_rate: f64) -> Vec<f64> {
    let n = times.len();
    let t0 = times[0];
    let dt = 1.0 / sample_rate;

    let mut out = Vec::with_capacity(n);
    let mut j = 0usize;
    for i in 0..n {
        let t = t0 + i as f64 * dt;
        while j < n - 2 && times[j + 1] < t {
            j += 1;
        }
        let seg = times[j + 1] - times[j];
        let frac = ((t - times[j]) / seg).clamp(0.0, 1.0);
        out.push(values[j] + frac * (values[j + 1] - values[j]));
    }
    out
}

/// Subtracts the least-squares line from the series in place.
fn detrend_linear(series: &mut [f64]) {
    let n = series.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = series.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (i, &y) in series.iter().enumerate() {
        let dx = i as f64 - x_mean;
        cov += dx * (y - y_mean);
        var += dx * dx;
    }
    let slope = if var > 0.0 { cov / var } else { 0.0 };

    for (i, y) in series.iter_mut().enumerate() {
        *y -= y_mean + slope * (i as f64 - x_mean);
    }
}

/// Applies a Hamming window in place.
fn apply_hamming(series: &mut [f64]) {
    let n = series.len();
    if n < 2 {
        return;
    }
    for (i, y) in series.iter_mut().enumerate() {
        let w = 0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64).cos();
        *y *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sinusoid_buffer(n: usize, fps: f64, hz: f64) -> SignalBuffer {
        let mut buffer = SignalBuffer::new(n, 1000.0);
        for i in 0..n {
            let t = i as f64 / fps;
            let v = 128.0 + 5.0 * (2.0 * std::f64::consts::PI * hz * t).sin();
            buffer.append(t, v).unwrap();
        }
        buffer
    }

    #[test]
    fn test_warmup_returns_none() {
        let conditioner = SignalConditioner::new(32);
        let buffer = sinusoid_buffer(10, 30.0, 1.2);
        assert!(conditioner.condition(&buffer).is_none());
    }

    #[test]
    fn test_conditioned_length_and_rate() {
        let conditioner = SignalConditioner::new(32);
        let buffer = sinusoid_buffer(120, 30.0, 1.2);
        let series = conditioner.condition(&buffer).unwrap();

        assert_eq!(series.len(), 120);
        assert!((series.sample_rate - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_signal_conditions_to_zero() {
        let conditioner = SignalConditioner::new(8);
        let mut buffer = SignalBuffer::new(64, 1000.0);
        for i in 0..64 {
            buffer.append(i as f64 / 30.0, 128.0).unwrap();
        }

        let series = conditioner.condition(&buffer).unwrap();
        assert!(series.values.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_linear_drift_removed() {
        let conditioner = SignalConditioner::new(8);
        let mut buffer = SignalBuffer::new(64, 1000.0);
        for i in 0..64 {
            // Pure linear ramp: everything should detrend away
            buffer.append(i as f64 / 30.0, 100.0 + 0.5 * i as f64).unwrap();
        }

        let series = conditioner.condition(&buffer).unwrap();
        assert!(series.values.iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_irregular_timestamps_resampled() {
        let conditioner = SignalConditioner::new(8);
        let mut buffer = SignalBuffer::new(64, 1000.0);
        // Jittered frame intervals around 30 fps
        let mut t = 0.0;
        for i in 0..64 {
            let v = 128.0 + 5.0 * (2.0 * std::f64::consts::PI * 1.2 * t).sin();
            buffer.append(t, v).unwrap();
            t += if i % 2 == 0 { 0.030 } else { 0.037 };
        }

        let series = conditioner.condition(&buffer).unwrap();
        assert_eq!(series.len(), 64);
        assert!(series.sample_rate > 25.0 && series.sample_rate < 35.0);
    }

    #[test]
    fn test_window_tapers_edges() {
        let conditioner = SignalConditioner::new(8);
        let buffer = sinusoid_buffer(64, 30.0, 1.2);
        let series = conditioner.condition(&buffer).unwrap();

        let edge = series.values[0].abs().max(series.values[63].abs());
        let mid: f64 = series.values[28..36].iter().map(|v| v.abs()).sum();
        assert!(edge < mid, "edges not tapered: edge={edge}, mid={mid}");
    }
}
