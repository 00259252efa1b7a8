//! Frequency-domain pulse estimation.
//!
//! Computes the spectrum of the conditioned intensity series, restricts
//! it to the configured physiological BPM band, and tracks a smoothed
//! beats-per-minute estimate across frames. Correctness here means
//! statistical stability: the estimate must hold steady on a stationary
//! subject and never flicker outside the band.

use crate::signal::ConditionedSeries;
use num_complex::Complex;
use rustfft::FftPlanner;

/// Parallel frequency/amplitude arrays over the positive bins.
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// Bin frequencies in Hz (multiply by 60 for BPM).
    pub freqs_hz: Vec<f64>,
    /// Bin amplitudes (complex norms).
    pub amplitudes: Vec<f64>,
}

impl Spectrum {
    /// Returns true if no bins have been computed yet.
    pub fn is_empty(&self) -> bool {
        self.freqs_hz.is_empty()
    }
}

/// Smoothed BPM estimate with the peak amplitude as a confidence proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseEstimate {
    /// Beats per minute, always within the configured band.
    pub bpm: f64,
    /// Amplitude of the spectral peak that produced the estimate.
    pub peak_amplitude: f64,
}

/// Estimates BPM from conditioned series via the FFT.
///
/// The exponential smoothing accumulator lives here and persists across
/// passes; everything else is recomputed per call.
pub struct SpectralEstimator {
    planner: FftPlanner<f64>,
    bpm_low: f64,
    bpm_high: f64,
    /// Weight on the previous estimate in `[0, 1)`.
    smoothing: f64,
    spectrum: Spectrum,
    last: Option<PulseEstimate>,
}

impl std::fmt::Debug for SpectralEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralEstimator")
            .field("bpm_low", &self.bpm_low)
            .field("bpm_high", &self.bpm_high)
            .field("smoothing", &self.smoothing)
            .field("last", &self.last)
            .finish()
    }
}

impl SpectralEstimator {
    /// Creates an estimator restricted to `[bpm_low, bpm_high]`.
    ///
    /// The band must already be validated (`0 < low < high`).
    pub fn new(bpm_low: f64, bpm_high: f64, smoothing: f64) -> Self {
        debug_assert!(bpm_low > 0.0 && bpm_low < bpm_high);
        debug_assert!((0.0..1.0).contains(&smoothing));
        Self {
            planner: FftPlanner::new(),
            bpm_low,
            bpm_high,
            smoothing,
            spectrum: Spectrum::default(),
            last: None,
        }
    }

    /// Runs one estimation pass.
    ///
    /// Returns the smoothed estimate, or the previous one unchanged when
    /// the series is too short or the band holds no meaningful peak.
    /// `None` only before the first successful estimate.
    pub fn estimate(&mut self, series: &ConditionedSeries) -> Option<PulseEstimate> {
        let n = series.len();
        if n < 4 || series.sample_rate <= 0.0 {
            return self.last;
        }

        let fft = self.planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex<f64>> = series
            .values
            .iter()
            .map(|&v| Complex::new(v, 0.0))
            .collect();
        fft.process(&mut buffer);

        // Positive-frequency bins; DC is skipped, it carries no pulse
        let bin_hz = series.sample_rate / n as f64;
        let half = n / 2;
        let mut freqs_hz = Vec::with_capacity(half);
        let mut amplitudes = Vec::with_capacity(half);
        for (k, value) in buffer.iter().enumerate().take(half).skip(1) {
            freqs_hz.push(k as f64 * bin_hz);
            amplitudes.push(value.norm());
        }

        if let Some((bpm, amplitude)) = self.band_peak(&freqs_hz, &amplitudes, bin_hz) {
            let smoothed = match self.last {
                Some(prev) => self.smoothing * prev.bpm + (1.0 - self.smoothing) * bpm,
                None => bpm,
            };
            self.last = Some(PulseEstimate {
                bpm: smoothed.clamp(self.bpm_low, self.bpm_high),
                peak_amplitude: amplitude,
            });
            tracing::trace!(bpm = smoothed, raw = bpm, amplitude, "pulse estimate");
        } else {
            tracing::trace!("no usable band peak, holding previous estimate");
        }

        self.spectrum = Spectrum {
            freqs_hz,
            amplitudes,
        };
        self.last
    }

    /// Finds the dominant in-band peak, refined to sub-bin accuracy.
    ///
    /// Ties are broken toward the lowest frequency by the ascending scan.
    fn band_peak(&self, freqs_hz: &[f64], amplitudes: &[f64], bin_hz: f64) -> Option<(f64, f64)> {
        let lo_hz = self.bpm_low / 60.0;
        let hi_hz = self.bpm_high / 60.0;

        let mut peak: Option<usize> = None;
        for (k, &f) in freqs_hz.iter().enumerate() {
            if f < lo_hz || f > hi_hz {
                continue;
            }
            if peak.map_or(true, |p| amplitudes[k] > amplitudes[p]) {
                peak = Some(k);
            }
        }

        let k = peak?;
        let amplitude = amplitudes[k];
        if amplitude <= 1e-12 {
            return None; // flat spectrum
        }

        // Parabolic interpolation across the neighboring bins recovers
        // frequencies that fall between bins at short window lengths.
        let mut freq = freqs_hz[k];
        if k > 0 && k + 1 < amplitudes.len() {
            let (left, center, right) = (amplitudes[k - 1], amplitude, amplitudes[k + 1]);
            let denom = left - 2.0 * center + right;
            if denom.abs() > 1e-12 {
                let offset = (0.5 * (left - right) / denom).clamp(-0.5, 0.5);
                freq += offset * bin_hz;
            }
        }

        let bpm = (freq * 60.0).clamp(self.bpm_low, self.bpm_high);
        Some((bpm, amplitude))
    }

    /// Last computed spectrum (empty before the first pass).
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Last estimate, if any pass has succeeded.
    pub fn last_estimate(&self) -> Option<PulseEstimate> {
        self.last
    }
}
