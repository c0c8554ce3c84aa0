/// Session Summary
/// Aggregates per-movement results of one session. An empty session yields a
/// zeroed summary with no dominant category.
use std::collections::HashMap;

use crate::types::{MovementCategory, SessionSummary, SwingAnalysisResult};

pub fn summarize_session(results: &[SwingAnalysisResult]) -> SessionSummary {
    if results.is_empty() {
        return SessionSummary {
            movement_count: 0,
            dominant_category: None,
            consistency: 0.0,
            mean_timing_gap_ms: 0.0,
            sequencing_rate: 0.0,
            deceleration_rate: 0.0,
        };
    }

    let count = results.len() as f64;
    let (dominant, dominant_count) = dominant_category(results);

    SessionSummary {
        movement_count: results.len(),
        dominant_category: Some(dominant),
        consistency: dominant_count as f64 / count,
        mean_timing_gap_ms: results.iter().map(|r| r.timing_gap_ms.abs()).sum::<f64>() / count,
        sequencing_rate: results.iter().filter(|r| r.sequence_correct).count() as f64 / count,
        deceleration_rate: results.iter().filter(|r| r.full_deceleration).count() as f64 / count,
    }
}

/// Most frequent category; ties go to the one encountered first.
fn dominant_category(results: &[SwingAnalysisResult]) -> (MovementCategory, usize) {
    let mut counts: HashMap<MovementCategory, usize> = HashMap::new();
    let mut first_seen: Vec<MovementCategory> = Vec::new();

    for result in results {
        let count = counts.entry(result.category).or_insert(0);
        if *count == 0 {
            first_seen.push(result.category);
        }
        *count += 1;
    }

    let mut best = first_seen[0];
    for &category in &first_seen[1..] {
        if counts[&category] > counts[&best] {
            best = category;
        }
    }

    (best, counts[&best])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferRating;

    fn result(category: MovementCategory, gap_ms: f64, sequence_correct: bool, full_deceleration: bool) -> SwingAnalysisResult {
        SwingAnalysisResult {
            movement_id: "1".to_string(),
            sample_count: 300,
            sample_rate_hz: 300.0,
            duration_s: 1.0,
            contact_index: 195,
            window_start_index: 45,
            pelvis_peak_index: 153,
            torso_peak_index: 160,
            arm_peak_index: 166,
            pelvis_peak_velocity: 10.0,
            torso_peak_velocity: 15.0,
            arm_peak_velocity: 20.0,
            transfer_ratio: 1.5,
            transfer_rating: TransferRating::Elite,
            timing_gap_ms: gap_ms,
            timing_gap_pct: 0.0,
            whip_timing_pct: 75.0,
            pelvis_decelerates: full_deceleration,
            torso_decelerates: full_deceleration,
            arm_decelerates: false,
            full_deceleration,
            sequence_order: "pelvis→torso→arm".to_string(),
            sequence_correct,
            category,
            confidence: 0.8,
            early_release_score: 0.0,
            connected_score: 0.0,
            stretched_score: 0.0,
            unsorted_score: 0.0,
            max_separation_deg: None,
            min_separation_deg: None,
            separation_at_contact_deg: None,
            data_quality_flags: Vec::new(),
        }
    }

    #[test]
    fn test_empty_session() {
        let summary = summarize_session(&[]);
        assert_eq!(summary.movement_count, 0);
        assert_eq!(summary.dominant_category, None);
        assert_eq!(summary.consistency, 0.0);
        assert_eq!(summary.mean_timing_gap_ms, 0.0);
    }

    #[test]
    fn test_session_statistics() {
        let results = vec![
            result(MovementCategory::Connected, 40.0, true, true),
            result(MovementCategory::EarlyRelease, -20.0, true, false),
            result(MovementCategory::Connected, 45.0, false, true),
            result(MovementCategory::SequenceIssue, 15.0, false, false),
        ];
        let summary = summarize_session(&results);

        assert_eq!(summary.movement_count, 4);
        assert_eq!(summary.dominant_category, Some(MovementCategory::Connected));
        assert_eq!(summary.consistency, 0.5);
        assert_eq!(summary.mean_timing_gap_ms, 30.0);
        assert_eq!(summary.sequencing_rate, 0.5);
        assert_eq!(summary.deceleration_rate, 0.5);
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let results = vec![
            result(MovementCategory::Stretched, 60.0, true, true),
            result(MovementCategory::EarlyRelease, 20.0, true, true),
            result(MovementCategory::EarlyRelease, 20.0, true, true),
            result(MovementCategory::Stretched, 60.0, true, true),
        ];
        let summary = summarize_session(&results);
        assert_eq!(summary.dominant_category, Some(MovementCategory::Stretched));
        assert_eq!(summary.consistency, 0.5);
    }
}
