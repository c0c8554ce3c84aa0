/// Velocity
/// Sample-rate estimation and finite-difference velocity per segment.
use crate::config::AnalysisConfig;
use crate::signal_conditioning::moving_average;

/// Median of a slice, zero when empty.
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Reciprocal of the median strictly-positive time step, rounded to whole Hz.
/// Returns `None` when fewer than two valid timestamps exist.
pub fn estimate_sample_rate(times: &[f64]) -> Option<f64> {
    let steps: Vec<f64> = times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| dt.is_finite() && *dt > 0.0)
        .collect();
    if steps.is_empty() {
        return None;
    }

    let rate = (1.0 / median(&steps)).round();
    if rate.is_finite() && rate > 0.0 {
        Some(rate)
    } else {
        None
    }
}

/// First difference scaled by the sample rate (first sample is zero),
/// smoothed with the velocity window.
pub fn velocity(signal: &[f64], sample_rate_hz: f64, config: &AnalysisConfig) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }

    let mut raw = Vec::with_capacity(signal.len());
    raw.push(0.0);
    for w in signal.windows(2) {
        raw.push((w[1] - w[0]) * sample_rate_hz);
    }

    moving_average(&raw, config.velocity_smoothing_window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_sample_rate_from_uniform_times() {
        let times: Vec<f64> = (0..300).map(|i| i as f64 / 300.0).collect();
        assert_eq!(estimate_sample_rate(&times), Some(300.0));
    }

    #[test]
    fn test_sample_rate_ignores_repeats_and_gaps() {
        // duplicated stamp and one dropped frame
        let times = vec![0.0, 0.004, 0.004, 0.008, 0.012, 0.020, 0.024];
        assert_eq!(estimate_sample_rate(&times), Some(250.0));
    }

    #[test]
    fn test_sample_rate_fallback() {
        assert_eq!(estimate_sample_rate(&[]), None);
        assert_eq!(estimate_sample_rate(&[0.5]), None);
        assert_eq!(estimate_sample_rate(&[0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_velocity_of_ramp() {
        let config = AnalysisConfig::default();
        let signal: Vec<f64> = (0..50).map(|i| i as f64 * 0.5).collect();
        let v = velocity(&signal, 100.0, &config);

        assert_eq!(v.len(), signal.len());
        // interior away from the zero first sample is the constant slope
        assert!((v[25] - 50.0).abs() < 1e-9);
        assert!(v[0] < 50.0);
        assert!(velocity(&[], 100.0, &config).is_empty());
    }
}
