/// Analysis Configuration
/// All thresholds, smoothing windows and column names used by the swing pipeline.
/// Build one `AnalysisConfig` and pass it by reference into every stage.

#[derive(Debug, Clone)]
pub struct MomentumColumns {
    pub time: String,
    pub movement_id: String,
    /// Segment name prefixes in proximal, mid, distal order
    pub segment_prefixes: [String; 3],
    /// Suffix of the pre-projected scalar column, e.g. `pelvis_angular_momentum`
    pub projected_suffix: String,
    /// Suffixes of the three orthogonal component columns
    pub component_suffixes: [String; 3],
    pub total_kinetic_energy: String,
    pub center_of_mass: [String; 3],
}

impl MomentumColumns {
    pub fn projected(&self, segment_index: usize) -> String {
        format!("{}{}", self.segment_prefixes[segment_index], self.projected_suffix)
    }

    pub fn components(&self, segment_index: usize) -> [String; 3] {
        let prefix = &self.segment_prefixes[segment_index];
        [
            format!("{}{}{}", prefix, self.projected_suffix, self.component_suffixes[0]),
            format!("{}{}{}", prefix, self.projected_suffix, self.component_suffixes[1]),
            format!("{}{}{}", prefix, self.projected_suffix, self.component_suffixes[2]),
        ]
    }
}

impl Default for MomentumColumns {
    fn default() -> Self {
        MomentumColumns {
            time: "time".to_string(),
            movement_id: "movement_id".to_string(),
            segment_prefixes: ["pelvis".to_string(), "torso".to_string(), "arm".to_string()],
            projected_suffix: "_angular_momentum".to_string(),
            component_suffixes: ["_x".to_string(), "_y".to_string(), "_z".to_string()],
            total_kinetic_energy: "total_kinetic_energy".to_string(),
            center_of_mass: ["com_x".to_string(), "com_y".to_string(), "com_z".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RotationColumns {
    pub time: String,
    pub movement_id: String,
    pub pelvis_rotation: String,
    pub torso_rotation: String,
}

impl Default for RotationColumns {
    fn default() -> Self {
        RotationColumns {
            time: "time".to_string(),
            movement_id: "movement_id".to_string(),
            pelvis_rotation: "pelvis_rotation".to_string(),
            torso_rotation: "torso_rotation".to_string(),
        }
    }
}

/// Gap bands (ms) and supporting-flag ranges for archetype scoring.
///
/// A band is `[full_min, full_max]` for the full base score, widened by the
/// `edge_*` bounds where the neighbouring archetypes overlap.
#[derive(Debug, Clone)]
pub struct ArchetypeBands {
    pub early_release_full_max_ms: f64,
    pub early_release_edge_max_ms: f64,
    pub connected_edge_min_ms: f64,
    pub connected_full_min_ms: f64,
    pub connected_full_max_ms: f64,
    pub connected_edge_max_ms: f64,
    pub stretched_edge_min_ms: f64,
    pub stretched_full_min_ms: f64,
    pub stretched_full_max_ms: f64,

    pub full_band_score: f64,
    pub edge_early_release_score: f64,
    pub edge_band_score: f64,
    pub bonus: f64,

    /// Early release favors an early mid-segment peak in the window
    pub early_whip_max_pct: f64,
    /// Stretched favors a late mid-segment peak in the window
    pub late_whip_min_pct: f64,
    pub connected_transfer_range: (f64, f64),
    pub stretched_transfer_min: f64,
}

impl Default for ArchetypeBands {
    fn default() -> Self {
        ArchetypeBands {
            early_release_full_max_ms: 25.0,
            early_release_edge_max_ms: 30.0,
            connected_edge_min_ms: 25.0,
            connected_full_min_ms: 30.0,
            connected_full_max_ms: 50.0,
            connected_edge_max_ms: 55.0,
            stretched_edge_min_ms: 45.0,
            stretched_full_min_ms: 55.0,
            stretched_full_max_ms: 80.0,

            full_band_score: 3.0,
            edge_early_release_score: 2.0,
            edge_band_score: 1.0,
            bonus: 1.0,

            early_whip_max_pct: 80.0,
            late_whip_min_pct: 85.0,
            connected_transfer_range: (1.3, 1.8),
            stretched_transfer_min: 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub momentum_columns: MomentumColumns,
    pub rotation_columns: RotationColumns,

    // Smoothing windows (samples)
    pub segment_smoothing_window: usize,
    pub helper_smoothing_window: usize,
    pub energy_smoothing_window: usize,
    pub velocity_smoothing_window: usize,

    // Timing
    pub analysis_window_ms: f64,
    pub default_sample_rate_hz: f64,
    pub min_samples: usize,

    // Event and metric thresholds
    pub peak_threshold_fraction: f64,
    pub deceleration_fraction: f64,
    pub sequence_tolerance_fraction: f64,
    pub weak_signal_fraction: f64,
    pub epsilon: f64,

    // Classifier outcomes
    pub data_quality_confidence: f64,
    pub sequence_issue_confidence: f64,
    pub tied_confidence: f64,
    pub deceleration_confidence_boost: f64,
    pub boosted_confidence_cap: f64,
    pub bands: ArchetypeBands,
}

impl AnalysisConfig {
    /// Number of samples covered by the pre-contact analysis window.
    pub fn window_samples(&self, sample_rate_hz: f64) -> usize {
        (self.analysis_window_ms / 1000.0 * sample_rate_hz).round().max(0.0) as usize
    }

    /// Sequencing tolerance in samples.
    pub fn sequence_tolerance(&self, sample_rate_hz: f64) -> f64 {
        self.sequence_tolerance_fraction * sample_rate_hz
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            momentum_columns: MomentumColumns::default(),
            rotation_columns: RotationColumns::default(),

            segment_smoothing_window: 11,
            helper_smoothing_window: 5,
            energy_smoothing_window: 9,
            velocity_smoothing_window: 7,

            analysis_window_ms: 500.0,
            default_sample_rate_hz: 240.0,
            min_samples: 50,

            peak_threshold_fraction: 0.30,
            deceleration_fraction: 0.50,
            sequence_tolerance_fraction: 0.015,
            weak_signal_fraction: 0.10,
            epsilon: 1e-6,

            data_quality_confidence: 0.9,
            sequence_issue_confidence: 0.8,
            tied_confidence: 0.5,
            deceleration_confidence_boost: 0.1,
            boosted_confidence_cap: 0.95,
            bands: ArchetypeBands::default(),
        }
    }
}
