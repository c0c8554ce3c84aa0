/// Movement Classifier
///
/// Ordered decision table: override rules are checked top to bottom and the
/// first match decides the category. When no override fires, the movement is
/// scored against the archetype gap bands.
///
/// Priority: data quality issue > sequence issue > archetype scoring.
use log::debug;

use crate::config::{AnalysisConfig, ArchetypeBands};
use crate::swing_metrics::SwingMetrics;
use crate::types::{ArchetypeScores, DataQualityFlag, MovementCategory};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: MovementCategory,
    pub confidence: f64,
    pub scores: ArchetypeScores,
}

pub struct OverrideRule {
    pub name: &'static str,
    pub applies: fn(&SwingMetrics, &[DataQualityFlag]) -> bool,
    pub category: MovementCategory,
    pub confidence: fn(&AnalysisConfig) -> f64,
}

pub const OVERRIDE_RULES: [OverrideRule; 2] = [
    OverrideRule {
        name: "data_quality",
        applies: has_blocking_flag,
        category: MovementCategory::DataQualityIssue,
        confidence: data_quality_confidence,
    },
    OverrideRule {
        name: "out_of_sequence",
        applies: out_of_sequence,
        category: MovementCategory::SequenceIssue,
        confidence: sequence_issue_confidence,
    },
];

fn has_blocking_flag(_: &SwingMetrics, flags: &[DataQualityFlag]) -> bool {
    flags.iter().any(|flag| flag.is_blocking())
}

fn out_of_sequence(metrics: &SwingMetrics, _: &[DataQualityFlag]) -> bool {
    !metrics.sequence_correct
}

fn data_quality_confidence(config: &AnalysisConfig) -> f64 {
    config.data_quality_confidence
}

fn sequence_issue_confidence(config: &AnalysisConfig) -> f64 {
    config.sequence_issue_confidence
}

pub fn classify(metrics: &SwingMetrics, flags: &[DataQualityFlag], config: &AnalysisConfig) -> Classification {
    for rule in OVERRIDE_RULES.iter() {
        if (rule.applies)(metrics, flags) {
            debug!("Override rule '{}' -> {}", rule.name, rule.category);
            return Classification {
                category: rule.category,
                confidence: (rule.confidence)(config),
                scores: ArchetypeScores::default(),
            };
        }
    }

    let scores = score_archetypes(metrics, &config.bands);
    let (category, confidence) = select_archetype(&scores, metrics.full_deceleration, config);

    Classification {
        category,
        confidence: confidence.clamp(0.0, 1.0),
        scores,
    }
}

/// Raw archetype scores from the absolute proximal-to-mid gap. Supporting-flag
/// bonuses only count for an archetype whose gap band matched.
pub fn score_archetypes(metrics: &SwingMetrics, bands: &ArchetypeBands) -> ArchetypeScores {
    let gap = metrics.timing_gap_ms.abs();
    let transfer = metrics.transfer_ratio;
    let whip = metrics.whip_timing_pct;

    let mut early_release = if gap <= bands.early_release_full_max_ms {
        bands.full_band_score
    } else if gap <= bands.early_release_edge_max_ms {
        bands.edge_early_release_score
    } else {
        0.0
    };
    if early_release > 0.0 {
        if metrics.full_deceleration {
            early_release += bands.bonus;
        }
        if whip < bands.early_whip_max_pct {
            early_release += bands.bonus;
        }
    }

    let mut connected = band_score(
        gap,
        (bands.connected_full_min_ms, bands.connected_full_max_ms),
        (bands.connected_edge_min_ms, bands.connected_edge_max_ms),
        bands,
    );
    let (transfer_low, transfer_high) = bands.connected_transfer_range;
    if connected > 0.0 && transfer >= transfer_low && transfer < transfer_high {
        connected += bands.bonus;
    }

    let mut stretched = band_score(
        gap,
        (bands.stretched_full_min_ms, bands.stretched_full_max_ms),
        (bands.stretched_edge_min_ms, bands.stretched_full_max_ms),
        bands,
    );
    if stretched > 0.0 {
        if whip >= bands.late_whip_min_pct {
            stretched += bands.bonus;
        }
        if transfer >= bands.stretched_transfer_min {
            stretched += bands.bonus;
        }
    }

    // TODO: no scoring rule exists for the unsorted archetype yet; it only wins
    // when every other archetype scores zero.
    ArchetypeScores {
        early_release,
        connected,
        stretched,
        unsorted: 0.0,
    }
}

fn band_score(gap: f64, full: (f64, f64), edge: (f64, f64), bands: &ArchetypeBands) -> f64 {
    if gap >= full.0 && gap <= full.1 {
        bands.full_band_score
    } else if gap >= edge.0 && gap <= edge.1 {
        bands.edge_band_score
    } else {
        0.0
    }
}

/// Highest score wins, earlier archetype on ties.
pub fn select_archetype(scores: &ArchetypeScores, full_deceleration: bool, config: &AnalysisConfig) -> (MovementCategory, f64) {
    let total = scores.total();
    if total <= 0.0 {
        return (MovementCategory::Unsorted, config.tied_confidence);
    }

    let mut winner = MovementCategory::ARCHETYPES[0];
    for &candidate in &MovementCategory::ARCHETYPES[1..] {
        if scores.get(candidate) > scores.get(winner) {
            winner = candidate;
        }
    }

    let mut confidence = scores.get(winner) / total;
    if full_deceleration {
        confidence = (confidence + config.deceleration_confidence_boost).min(config.boosted_confidence_cap);
    }

    (winner, confidence)
}
