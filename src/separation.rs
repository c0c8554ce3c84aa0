/// Pelvis/torso separation from the optional rotation export.
/// Rotation rows are matched to the momentum recording by time, so the two
/// exports may be sampled at different rates.
use crate::config::AnalysisConfig;
use crate::signal_conditioning::smooth;
use crate::types::RotationSample;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationMetrics {
    pub max_separation_deg: f64,
    pub min_separation_deg: f64,
    pub separation_at_contact_deg: f64,
}

/// Separation extrema between `window_start_time` and `contact_time`.
/// Returns `None` when no rotation sample falls inside that span.
pub fn separation_metrics(
    rotations: &[RotationSample],
    window_start_time: f64,
    contact_time: f64,
    config: &AnalysisConfig,
) -> Option<SeparationMetrics> {
    if rotations.is_empty() {
        return None;
    }

    let raw: Vec<f64> = rotations
        .iter()
        .map(|r| r.pelvis_rotation - r.torso_rotation)
        .collect();
    let separation = smooth(&raw, config);

    let in_window: Vec<(f64, f64)> = rotations
        .iter()
        .zip(separation.iter())
        .filter(|(r, _)| r.time >= window_start_time && r.time <= contact_time)
        .map(|(r, &s)| (r.time, s))
        .collect();
    if in_window.is_empty() {
        return None;
    }

    let max_separation_deg = in_window.iter().map(|&(_, s)| s).fold(f64::NEG_INFINITY, f64::max);
    let min_separation_deg = in_window.iter().map(|&(_, s)| s).fold(f64::INFINITY, f64::min);

    // nearest rotation sample to contact, earliest on ties
    let mut at_contact = in_window[0];
    for &(time, value) in &in_window[1..] {
        if (contact_time - time).abs() < (contact_time - at_contact.0).abs() {
            at_contact = (time, value);
        }
    }

    Some(SeparationMetrics {
        max_separation_deg,
        min_separation_deg,
        separation_at_contact_deg: at_contact.1,
    })
}
