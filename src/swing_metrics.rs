/// Swing Metrics
/// Timing gap, whip timing, transfer ratio, deceleration and sequencing derived
/// from the detected peaks. No division here can produce NaN or infinity.
use crate::config::AnalysisConfig;
use crate::event_detection::AnalysisWindow;
use crate::types::{Segment, TransferRating};

#[derive(Debug, Clone, PartialEq)]
pub struct SwingMetrics {
    pub peak_indices: [usize; 3],
    pub peak_velocities: [f64; 3],
    pub timing_gap_ms: f64,
    pub timing_gap_pct: f64,
    pub whip_timing_pct: f64,
    pub transfer_ratio: f64,
    pub transfer_rating: TransferRating,
    pub decelerates: [bool; 3],
    pub full_deceleration: bool,
    pub sequence_order: String,
    pub sequence_correct: bool,
    pub weak_mid_signal: bool,
    pub missing_proximal_signal: bool,
}

pub fn derive_metrics(
    velocities: &[Vec<f64>; 3],
    peak_indices: [usize; 3],
    window: AnalysisWindow,
    sample_rate_hz: f64,
    config: &AnalysisConfig,
) -> SwingMetrics {
    let contact = window.end;
    let peak_velocities = [0, 1, 2].map(|i| value_at(&velocities[i], peak_indices[i]));

    let [pelvis, torso, _] = peak_indices;
    let gap_samples = torso as f64 - pelvis as f64;
    let window_len = window.len() as f64;

    let timing_gap_ms = safe_div(gap_samples * 1000.0, sample_rate_hz, config.epsilon);
    let timing_gap_pct = safe_div(gap_samples * 100.0, window_len, config.epsilon);
    let whip_timing_pct = safe_div(
        torso.saturating_sub(window.start) as f64 * 100.0,
        window_len,
        config.epsilon,
    );

    let transfer_ratio = transfer_ratio(peak_velocities[0], peak_velocities[1], config.epsilon);

    let decelerates = [0, 1, 2].map(|i| {
        decelerates_before_contact(value_at(&velocities[i], contact), peak_velocities[i], config)
    });
    let full_deceleration = decelerates[0] && decelerates[1];

    let (sequence_order, sequence_correct) = sequencing(peak_indices, sample_rate_hz, config);

    let proximal_magnitude = peak_magnitude(window.slice(&velocities[0]));
    let mid_magnitude = peak_magnitude(window.slice(&velocities[1]));
    let missing_proximal_signal = proximal_magnitude < config.epsilon;
    let weak_mid_signal = mid_magnitude < config.weak_signal_fraction * proximal_magnitude;

    SwingMetrics {
        peak_indices,
        peak_velocities,
        timing_gap_ms,
        timing_gap_pct,
        whip_timing_pct,
        transfer_ratio,
        transfer_rating: rate_transfer(transfer_ratio),
        decelerates,
        full_deceleration,
        sequence_order,
        sequence_correct,
        weak_mid_signal,
        missing_proximal_signal,
    }
}

/// |mid peak| / |proximal peak|, zero when the denominator is below epsilon.
pub fn transfer_ratio(proximal_peak: f64, mid_peak: f64, epsilon: f64) -> f64 {
    let ratio = safe_div(mid_peak.abs(), proximal_peak.abs(), epsilon);
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Half-open bands: elite [1.5, 1.8), good [1.3, 1.5), developing [1.0, 1.3).
pub fn rate_transfer(ratio: f64) -> TransferRating {
    if (1.5..1.8).contains(&ratio) {
        TransferRating::Elite
    } else if (1.3..1.5).contains(&ratio) {
        TransferRating::Good
    } else if (1.0..1.3).contains(&ratio) {
        TransferRating::Developing
    } else {
        TransferRating::Priority
    }
}

pub fn decelerates_before_contact(velocity_at_contact: f64, peak_velocity: f64, config: &AnalysisConfig) -> bool {
    velocity_at_contact < config.deceleration_fraction * peak_velocity
}

/// Firing order label and the tolerant proximal <= mid <= distal check.
pub fn sequencing(peak_indices: [usize; 3], sample_rate_hz: f64, config: &AnalysisConfig) -> (String, bool) {
    let mut ordered = Segment::ALL;
    ordered.sort_by_key(|segment| peak_indices[segment.index()]);
    let label = ordered.iter().map(|s| s.label()).collect::<Vec<_>>().join("→");

    let tolerance = config.sequence_tolerance(sample_rate_hz);
    let [proximal, mid, distal] = peak_indices.map(|i| i as f64);
    let correct = proximal <= mid + tolerance && mid <= distal + tolerance;

    (label, correct)
}

fn peak_magnitude(values: &[f64]) -> f64 {
    values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
}

fn value_at(signal: &[f64], index: usize) -> f64 {
    signal.get(index).copied().unwrap_or(0.0)
}

fn safe_div(numerator: f64, denominator: f64, epsilon: f64) -> f64 {
    if denominator.abs() < epsilon {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_ratio_zero_denominator() {
        assert_eq!(transfer_ratio(0.0, 5.0, 1e-6), 0.0);
        assert_eq!(transfer_ratio(1e-9, 5.0, 1e-6), 0.0);
        assert_eq!(transfer_ratio(-2.0, 3.0, 1e-6), 1.5);
    }

    #[test]
    fn test_transfer_rating_boundaries() {
        assert_eq!(rate_transfer(1.5), TransferRating::Elite);
        assert_eq!(rate_transfer(1.79), TransferRating::Elite);
        assert_eq!(rate_transfer(1.8), TransferRating::Priority);
        assert_eq!(rate_transfer(1.3), TransferRating::Good);
        assert_eq!(rate_transfer(1.4999), TransferRating::Good);
        assert_eq!(rate_transfer(1.0), TransferRating::Developing);
        assert_eq!(rate_transfer(1.2999), TransferRating::Developing);
        assert_eq!(rate_transfer(0.99), TransferRating::Priority);
        assert_eq!(rate_transfer(0.0), TransferRating::Priority);
    }

    #[test]
    fn test_deceleration_threshold() {
        let config = AnalysisConfig::default();
        assert!(decelerates_before_contact(4.9, 10.0, &config));
        assert!(!decelerates_before_contact(5.0, 10.0, &config));
        assert!(decelerates_before_contact(-3.0, 10.0, &config));
    }

    #[test]
    fn test_sequencing_label_and_tolerance() {
        let config = AnalysisConfig::default();
        let (label, correct) = sequencing([100, 107, 113], 300.0, &config);
        assert_eq!(label, "pelvis→torso→arm");
        assert!(correct);

        // torso 4 samples early is inside the 4.5 sample jitter allowance
        let (label, correct) = sequencing([100, 96, 110], 300.0, &config);
        assert_eq!(label, "torso→pelvis→arm");
        assert!(correct);

        let (label, correct) = sequencing([120, 127, 100], 300.0, &config);
        assert_eq!(label, "arm→pelvis→torso");
        assert!(!correct);
    }

    #[test]
    fn test_sequencing_swap_proximal_and_distal() {
        let config = AnalysisConfig::default();
        let (forward, forward_ok) = sequencing([100, 110, 120], 300.0, &config);
        let (swapped, swapped_ok) = sequencing([120, 110, 100], 300.0, &config);
        assert_eq!(forward, "pelvis→torso→arm");
        assert_eq!(swapped, "arm→torso→pelvis");
        assert!(forward_ok);
        assert!(!swapped_ok);
        assert_eq!(sequencing([120, 110, 100], 300.0, &config), (swapped, swapped_ok));
    }

    #[test]
    fn test_derive_metrics() {
        let config = AnalysisConfig::default();
        let n = 200;
        let bump = |center: usize, height: f64| -> Vec<f64> {
            (0..n)
                .map(|i| {
                    let d = i as f64 - center as f64;
                    height * (-(d * d) / 50.0).exp()
                })
                .collect()
        };
        let velocities = [bump(120, 10.0), bump(127, 15.0), bump(133, 20.0)];
        let window = AnalysisWindow { start: 50, end: 199 };

        let m = derive_metrics(&velocities, [120, 127, 133], window, 300.0, &config);

        assert!((m.timing_gap_ms - 7.0 / 300.0 * 1000.0).abs() < 1e-9);
        assert!((m.timing_gap_pct - 7.0 / 150.0 * 100.0).abs() < 1e-9);
        assert!((m.whip_timing_pct - 77.0 / 150.0 * 100.0).abs() < 1e-9);
        assert!((m.transfer_ratio - 1.5).abs() < 1e-9);
        assert_eq!(m.transfer_rating, TransferRating::Elite);
        assert_eq!(m.decelerates, [true, true, true]);
        assert!(m.full_deceleration);
        assert!(m.sequence_correct);
        assert!(!m.weak_mid_signal);
        assert!(!m.missing_proximal_signal);
    }

    #[test]
    fn test_weak_and_missing_signal() {
        let config = AnalysisConfig::default();
        let window = AnalysisWindow { start: 0, end: 4 };
        let weak = [
            vec![0.0, 5.0, 10.0, 5.0, 0.0],
            vec![0.0, 0.2, 0.5, 0.2, 0.0],
            vec![0.0, 1.0, 2.0, 1.0, 0.0],
        ];
        let m = derive_metrics(&weak, [2, 2, 2], window, 300.0, &config);
        assert!(m.weak_mid_signal);

        let silent = [vec![0.0; 5], vec![0.0; 5], vec![0.0; 5]];
        let m = derive_metrics(&silent, [0, 0, 0], window, 300.0, &config);
        assert!(m.missing_proximal_signal);
        assert_eq!(m.transfer_ratio, 0.0);
        assert!(m.transfer_ratio.is_finite());
    }
}
