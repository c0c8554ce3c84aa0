/// Swing Analyzer
///
/// Per-movement pipeline (conditioning -> velocity -> events -> metrics ->
/// classification) and the batch entry point used by collaborators.
///
/// The batch never fails as a whole: movements below the sample minimum are
/// skipped, and a movement whose analysis errors or panics is logged and
/// left out while the rest of the batch completes.
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info, warn};
use rayon::prelude::*;

use crate::classifier::classify;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::event_detection::{analysis_window, detect_contact, find_segment_peak};
use crate::separation::separation_metrics;
use crate::signal_conditioning::{energy_signal, segment_signals};
use crate::swing_metrics::derive_metrics;
use crate::tolerant_csv_reader::{group_by_movement, read_momentum_samples, read_rotation_samples};
use crate::types::{
    DataQualityFlag, MomentumSample, RotationSample, SegmentMomentum, SwingAnalysisResult,
};
use crate::velocity::{estimate_sample_rate, velocity};

/// Analyse every movement in the momentum export (and the optional rotation
/// export). Results follow the order in which movement ids first appear.
pub fn analyze_recordings(
    momentum_csv: &str,
    rotation_csv: Option<&str>,
    config: &AnalysisConfig,
) -> Vec<SwingAnalysisResult> {
    let movements = group_by_movement(
        read_momentum_samples(momentum_csv, &config.momentum_columns),
        |s: &MomentumSample| s.movement_id.as_str(),
    );

    let rotations: HashMap<String, Vec<RotationSample>> = rotation_csv
        .map(|text| {
            group_by_movement(
                read_rotation_samples(text, &config.rotation_columns),
                |r: &RotationSample| r.movement_id.as_str(),
            )
            .into_iter()
            .collect()
        })
        .unwrap_or_default();

    let total = movements.len();
    let results: Vec<SwingAnalysisResult> = movements
        .par_iter()
        .filter_map(|(movement_id, samples)| {
            if samples.len() < config.min_samples {
                debug!(
                    "Skipping movement {}: {} samples (minimum {})",
                    movement_id,
                    samples.len(),
                    config.min_samples
                );
                return None;
            }
            let movement_rotations = rotations.get(movement_id).map(|r| r.as_slice());
            run_isolated(movement_id, || {
                analyze_movement(movement_id, samples, movement_rotations, config)
            })
        })
        .collect();

    info!("Analysed {} of {} movements", results.len(), total);
    results
}

/// Run one movement's analysis, turning errors and panics into `None`.
pub fn run_isolated<F>(movement_id: &str, analysis: F) -> Option<SwingAnalysisResult>
where
    F: FnOnce() -> Result<SwingAnalysisResult, AnalysisError>,
{
    match panic::catch_unwind(AssertUnwindSafe(analysis)) {
        Ok(Ok(result)) => Some(result),
        Ok(Err(e)) => {
            warn!("Omitting movement {}: {}", movement_id, e);
            None
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("Analysis of movement {} panicked: {}", movement_id, message);
            None
        }
    }
}

pub fn analyze_movement(
    movement_id: &str,
    samples: &[MomentumSample],
    rotations: Option<&[RotationSample]>,
    config: &AnalysisConfig,
) -> Result<SwingAnalysisResult, AnalysisError> {
    if samples.len() < config.min_samples {
        return Err(AnalysisError::InsufficientSamples {
            movement_id: movement_id.to_string(),
            found: samples.len(),
            required: config.min_samples,
        });
    }
    check_finite(movement_id, samples)?;

    let mut flags = Vec::new();

    let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
    let sample_rate_hz = match estimate_sample_rate(&times) {
        Some(rate) => rate,
        None => {
            flags.push(DataQualityFlag::DefaultSampleRate);
            config.default_sample_rate_hz
        }
    };

    let signals = segment_signals(samples, config);
    let velocities = [0, 1, 2].map(|i| velocity(&signals[i], sample_rate_hz, config));

    let energy = energy_signal(samples, config);
    let contact = detect_contact(&energy).ok_or_else(|| AnalysisError::EmptyWindow(movement_id.to_string()))?;
    let window = analysis_window(contact, sample_rate_hz, config);

    let mut peak_indices = [0usize; 3];
    for (segment, peak) in peak_indices.iter_mut().enumerate() {
        *peak = find_segment_peak(&velocities[segment], window, config)
            .ok_or_else(|| AnalysisError::EmptyWindow(movement_id.to_string()))?;
    }

    let metrics = derive_metrics(&velocities, peak_indices, window, sample_rate_hz, config);
    if metrics.missing_proximal_signal {
        flags.push(DataQualityFlag::MissingSegmentSignal);
    }
    if metrics.weak_mid_signal {
        flags.push(DataQualityFlag::WeakMidSegmentSignal);
    }

    let separation = rotations
        .and_then(|r| separation_metrics(r, times[window.start], times[contact], config));
    if separation.is_none() {
        flags.push(DataQualityFlag::NoRotationData);
    }

    let classification = classify(&metrics, &flags, config);

    debug!(
        "Movement {}: {} samples @ {} Hz, contact {}, peaks {:?}, gap {:.1} ms -> {} ({:.2})",
        movement_id,
        samples.len(),
        sample_rate_hz,
        contact,
        peak_indices,
        metrics.timing_gap_ms,
        classification.category,
        classification.confidence
    );

    let duration_s = (times[times.len() - 1] - times[0]).max(0.0);

    Ok(SwingAnalysisResult {
        movement_id: movement_id.to_string(),
        sample_count: samples.len(),
        sample_rate_hz,
        duration_s,

        contact_index: contact,
        window_start_index: window.start,
        pelvis_peak_index: peak_indices[0],
        torso_peak_index: peak_indices[1],
        arm_peak_index: peak_indices[2],
        pelvis_peak_velocity: metrics.peak_velocities[0],
        torso_peak_velocity: metrics.peak_velocities[1],
        arm_peak_velocity: metrics.peak_velocities[2],

        transfer_ratio: metrics.transfer_ratio,
        transfer_rating: metrics.transfer_rating,
        timing_gap_ms: metrics.timing_gap_ms,
        timing_gap_pct: metrics.timing_gap_pct,
        whip_timing_pct: metrics.whip_timing_pct,

        pelvis_decelerates: metrics.decelerates[0],
        torso_decelerates: metrics.decelerates[1],
        arm_decelerates: metrics.decelerates[2],
        full_deceleration: metrics.full_deceleration,

        sequence_order: metrics.sequence_order,
        sequence_correct: metrics.sequence_correct,

        category: classification.category,
        confidence: classification.confidence,
        early_release_score: classification.scores.early_release,
        connected_score: classification.scores.connected,
        stretched_score: classification.scores.stretched,
        unsorted_score: classification.scores.unsorted,

        max_separation_deg: separation.map(|s| s.max_separation_deg),
        min_separation_deg: separation.map(|s| s.min_separation_deg),
        separation_at_contact_deg: separation.map(|s| s.separation_at_contact_deg),

        data_quality_flags: flags,
    })
}

fn check_finite(movement_id: &str, samples: &[MomentumSample]) -> Result<(), AnalysisError> {
    let non_finite = |field: &'static str, index: usize| AnalysisError::NonFiniteInput {
        movement_id: movement_id.to_string(),
        field,
        index,
    };

    for (index, sample) in samples.iter().enumerate() {
        if !sample.time.is_finite() {
            return Err(non_finite("time", index));
        }
        if !sample.total_kinetic_energy.is_finite() {
            return Err(non_finite("total_kinetic_energy", index));
        }
        let segments_finite = sample.segments.iter().all(|m| match m {
            SegmentMomentum::Projected(v) => v.is_finite(),
            SegmentMomentum::Components(c) => c.iter().all(|v| v.is_finite()),
        });
        if !segments_finite {
            return Err(non_finite("segment momentum", index));
        }
    }
    Ok(())
}
