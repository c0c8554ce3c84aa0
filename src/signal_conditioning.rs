/// Signal Conditioning
/// Turns per-sample segment momentum into one scalar signal per segment and
/// smooths it with a centered moving average clamped at the sequence ends.
use crate::config::AnalysisConfig;
use crate::types::{MomentumSample, SegmentMomentum};

/// Centered moving average. The window shrinks at both ends of the sequence
/// instead of padding.
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 || window <= 1 {
        return data.to_vec();
    }

    let half = window / 2;
    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half).min(n - 1);
            let sum: f64 = data[start..=end].iter().sum();
            sum / (end - start + 1) as f64
        })
        .collect()
}

/// Generic smoothing helper for intermediate derived signals.
pub fn smooth(data: &[f64], config: &AnalysisConfig) -> Vec<f64> {
    moving_average(data, config.helper_smoothing_window)
}

pub fn segment_magnitude(momentum: &SegmentMomentum) -> f64 {
    match momentum {
        SegmentMomentum::Projected(value) => value.abs(),
        SegmentMomentum::Components([x, y, z]) => (x * x + y * y + z * z).sqrt(),
    }
}

/// Smoothed scalar signal for each of the three segments.
pub fn segment_signals(samples: &[MomentumSample], config: &AnalysisConfig) -> [Vec<f64>; 3] {
    [0, 1, 2].map(|segment| {
        let raw: Vec<f64> = samples
            .iter()
            .map(|s| segment_magnitude(&s.segments[segment]))
            .collect();
        moving_average(&raw, config.segment_smoothing_window)
    })
}

/// Smoothed total kinetic energy used for contact detection.
pub fn energy_signal(samples: &[MomentumSample], config: &AnalysisConfig) -> Vec<f64> {
    let raw: Vec<f64> = samples.iter().map(|s| s.total_kinetic_energy).collect();
    moving_average(&raw, config.energy_smoothing_window)
}
