use crate::kernelexperienceerror::KernelExperienceError;

// ─────────────────────────────────────────────────────────────────────────────
// CurveStabilizer
// ─────────────────────────────────────────────────────────────────────────────
//
// 兩個獨立的單趟 O(n) 掃描，不看未來樣本：
//   - running_maximum（envelope）：非遞減上界
//   - running_minimum（monotonic floor）：非遞增下界
// 皆為 idempotent：對輸出再套一次結果不變。

fn require_non_empty(signal: &[f64], scan: &str) -> Result<(), KernelExperienceError> {
    if signal.is_empty() {
        return Err(KernelExperienceError::invalid_argument(format!(
            "{} requires a non-empty input",
            scan
        )));
    }
    Ok(())
}

/// Envelope: out_0 = in_0, out_i = max(out_{i-1}, in_i).
///
/// Seeded with the first sample, so no sign assumption is made on the
/// signal; a negative leading sample is kept as is.
pub fn running_maximum(signal: &[f64]) -> Result<Vec<f64>, KernelExperienceError> {
    require_non_empty(signal, "running_maximum")?;
    let mut current = signal[0];
    Ok(signal
        .iter()
        .map(|&v| {
            if v > current {
                current = v;
            }
            current
        })
        .collect())
}

/// Monotonic floor: out_0 = in_0, out_i = min(out_{i-1}, in_i).
pub fn running_minimum(signal: &[f64]) -> Result<Vec<f64>, KernelExperienceError> {
    require_non_empty(signal, "running_minimum")?;
    let mut current = signal[0];
    Ok(signal
        .iter()
        .map(|&v| {
            if v < current {
                current = v;
            }
            current
        })
        .collect())
}
