/// Core data model for swing analysis: input samples, per-movement results
/// and session summaries. Result records serialize to one flat CSV row each.
use serde::{Serialize, Serializer};
use std::fmt;

/// Modeled body segments, ordered proximal to distal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Proximal / lead segment
    Pelvis,
    Torso,
    /// Distal segment
    Arm,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Pelvis, Segment::Torso, Segment::Arm];

    pub fn index(self) -> usize {
        match self {
            Segment::Pelvis => 0,
            Segment::Torso => 1,
            Segment::Arm => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Segment::Pelvis => "pelvis",
            Segment::Torso => "torso",
            Segment::Arm => "arm",
        }
    }
}

/// Per-segment momentum as exported upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentMomentum {
    Projected(f64),
    Components([f64; 3]),
}

/// One time-stamped row of the momentum/energy export.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumSample {
    pub time: f64,
    pub movement_id: String,
    pub segments: [SegmentMomentum; 3],
    pub total_kinetic_energy: f64,
    pub center_of_mass: [f64; 3],
}

/// One time-stamped row of the optional rotation export (degrees).
#[derive(Debug, Clone, PartialEq)]
pub struct RotationSample {
    pub time: f64,
    pub movement_id: String,
    pub pelvis_rotation: f64,
    pub torso_rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementCategory {
    /// Tight proximal-to-mid gap (<= ~30 ms), early release
    EarlyRelease,
    /// Moderate gap (~25-55 ms)
    Connected,
    /// Long gap (~45-80 ms), late whip
    Stretched,
    /// Fallback archetype; only selected when every archetype scores zero
    Unsorted,
    DataQualityIssue,
    SequenceIssue,
}

impl MovementCategory {
    pub const ARCHETYPES: [MovementCategory; 4] = [
        MovementCategory::EarlyRelease,
        MovementCategory::Connected,
        MovementCategory::Stretched,
        MovementCategory::Unsorted,
    ];

    pub fn is_archetype(self) -> bool {
        !matches!(self, MovementCategory::DataQualityIssue | MovementCategory::SequenceIssue)
    }

    pub fn label(self) -> &'static str {
        match self {
            MovementCategory::EarlyRelease => "early_release",
            MovementCategory::Connected => "connected",
            MovementCategory::Stretched => "stretched",
            MovementCategory::Unsorted => "unsorted",
            MovementCategory::DataQualityIssue => "data_quality_issue",
            MovementCategory::SequenceIssue => "sequence_issue",
        }
    }
}

impl fmt::Display for MovementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferRating {
    Elite,
    Good,
    Developing,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityFlag {
    /// Mid-segment peak below the weak-signal fraction of the proximal peak
    WeakMidSegmentSignal,
    /// Proximal segment carries no usable signal
    MissingSegmentSignal,
    /// Fewer than two valid timestamps; the configured default rate was used
    DefaultSampleRate,
    NoRotationData,
}

impl DataQualityFlag {
    /// Blocking flags override archetype classification.
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            DataQualityFlag::WeakMidSegmentSignal | DataQualityFlag::MissingSegmentSignal
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            DataQualityFlag::WeakMidSegmentSignal => "weak_mid_segment_signal",
            DataQualityFlag::MissingSegmentSignal => "missing_segment_signal",
            DataQualityFlag::DefaultSampleRate => "default_sample_rate",
            DataQualityFlag::NoRotationData => "no_rotation_data",
        }
    }
}

/// Raw score per archetype, all zero for override categories.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArchetypeScores {
    pub early_release: f64,
    pub connected: f64,
    pub stretched: f64,
    pub unsorted: f64,
}

impl ArchetypeScores {
    pub fn get(&self, category: MovementCategory) -> f64 {
        match category {
            MovementCategory::EarlyRelease => self.early_release,
            MovementCategory::Connected => self.connected,
            MovementCategory::Stretched => self.stretched,
            MovementCategory::Unsorted => self.unsorted,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.early_release + self.connected + self.stretched + self.unsorted
    }
}

/// One analysed movement. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwingAnalysisResult {
    pub movement_id: String,
    pub sample_count: usize,
    pub sample_rate_hz: f64,
    pub duration_s: f64,

    pub contact_index: usize,
    pub window_start_index: usize,
    pub pelvis_peak_index: usize,
    pub torso_peak_index: usize,
    pub arm_peak_index: usize,
    pub pelvis_peak_velocity: f64,
    pub torso_peak_velocity: f64,
    pub arm_peak_velocity: f64,

    pub transfer_ratio: f64,
    pub transfer_rating: TransferRating,
    pub timing_gap_ms: f64,
    pub timing_gap_pct: f64,
    pub whip_timing_pct: f64,

    pub pelvis_decelerates: bool,
    pub torso_decelerates: bool,
    pub arm_decelerates: bool,
    pub full_deceleration: bool,

    pub sequence_order: String,
    pub sequence_correct: bool,

    pub category: MovementCategory,
    pub confidence: f64,
    pub early_release_score: f64,
    pub connected_score: f64,
    pub stretched_score: f64,
    pub unsorted_score: f64,

    pub max_separation_deg: Option<f64>,
    pub min_separation_deg: Option<f64>,
    pub separation_at_contact_deg: Option<f64>,

    #[serde(serialize_with = "serialize_flags")]
    pub data_quality_flags: Vec<DataQualityFlag>,
}

impl SwingAnalysisResult {
    pub fn has_flag(&self, flag: DataQualityFlag) -> bool {
        self.data_quality_flags.contains(&flag)
    }
}

fn serialize_flags<S: Serializer>(flags: &[DataQualityFlag], serializer: S) -> Result<S::Ok, S::Error> {
    let joined = flags.iter().map(|f| f.label()).collect::<Vec<_>>().join(";");
    serializer.serialize_str(&joined)
}

/// Aggregate over all analysed movements of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub movement_count: usize,
    pub dominant_category: Option<MovementCategory>,
    pub consistency: f64,
    pub mean_timing_gap_ms: f64,
    pub sequencing_rate: f64,
    pub deceleration_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_order() {
        let indices: Vec<usize> = Segment::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(Segment::Arm.label(), "arm");
    }

    #[test]
    fn test_blocking_flags() {
        assert!(DataQualityFlag::WeakMidSegmentSignal.is_blocking());
        assert!(DataQualityFlag::MissingSegmentSignal.is_blocking());
        assert!(!DataQualityFlag::NoRotationData.is_blocking());
        assert!(!DataQualityFlag::DefaultSampleRate.is_blocking());
    }

    #[test]
    fn test_archetype_scores_lookup() {
        let scores = ArchetypeScores { early_release: 4.0, connected: 1.0, stretched: 0.0, unsorted: 0.0 };
        assert_eq!(scores.get(MovementCategory::EarlyRelease), 4.0);
        assert_eq!(scores.get(MovementCategory::SequenceIssue), 0.0);
        assert_eq!(scores.total(), 5.0);
        assert!(!MovementCategory::SequenceIssue.is_archetype());
    }
}
