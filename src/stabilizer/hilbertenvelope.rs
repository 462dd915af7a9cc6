//! Amplitude envelope through the analytic signal x + i·H[x].

use num_complex::Complex;
use rustfft::FftPlanner;

use crate::kernelexperienceerror::KernelExperienceError;

/// Analytic signal of a real sequence, computed with an FFT of length n.
///
/// Negative frequencies are zeroed and positive ones doubled; the DC bin
/// and, for even n, the Nyquist bin keep weight 1.
pub fn analytic_signal(signal: &[f64]) -> Result<Vec<Complex<f64>>, KernelExperienceError> {
    if signal.is_empty() {
        return Err(KernelExperienceError::invalid_argument(
            "analytic_signal requires a non-empty input",
        ));
    }
    let n = signal.len();

    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft_forward = planner.plan_fft_forward(n);
    let fft_inverse = planner.plan_fft_inverse(n);

    fft_forward.process(&mut buffer);

    for (k, bin) in buffer.iter_mut().enumerate() {
        *bin *= spectral_weight(k, n);
    }

    fft_inverse.process(&mut buffer);

    // rustfft 不做正規化
    let norm = 1.0 / n as f64;
    for c in buffer.iter_mut() {
        *c *= norm;
    }
    Ok(buffer)
}

#[inline]
fn spectral_weight(k: usize, n: usize) -> f64 {
    let half = n / 2;
    if k == 0 || (n % 2 == 0 && k == half) {
        1.0
    } else if k < n.div_ceil(2) {
        2.0
    } else {
        0.0
    }
}

/// |analytic signal|, the instantaneous amplitude of `signal`.
pub fn hilbert_envelope(signal: &[f64]) -> Result<Vec<f64>, KernelExperienceError> {
    Ok(analytic_signal(signal)?.iter().map(|c| c.norm()).collect())
}
