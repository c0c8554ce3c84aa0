/// Event Detection
///
/// Contact is taken as the global maximum of the smoothed total kinetic
/// energy. This assumes ball contact coincides with peak system energy; a
/// recording with a larger energy spike after contact (follow-through) will
/// place contact on that spike instead.
///
/// Segment peaks are searched in a fixed window ending at contact.
use crate::config::AnalysisConfig;

/// Inclusive sample range `[start, end]` ending at the contact sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: usize,
    pub end: usize,
}

impl AnalysisWindow {
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice<'a>(&self, signal: &'a [f64]) -> &'a [f64] {
        let end = self.end.min(signal.len().saturating_sub(1));
        if signal.is_empty() || self.start > end {
            return &[];
        }
        &signal[self.start..=end]
    }
}

/// Index of the first maximum, `None` for an empty slice.
pub fn argmax(data: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in data.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Contact sample: global maximum of the already-smoothed energy signal.
pub fn detect_contact(energy: &[f64]) -> Option<usize> {
    argmax(energy)
}

pub fn analysis_window(contact: usize, sample_rate_hz: f64, config: &AnalysisConfig) -> AnalysisWindow {
    AnalysisWindow {
        start: contact.saturating_sub(config.window_samples(sample_rate_hz)),
        end: contact,
    }
}

/// Peak sample of a velocity signal inside the window.
///
/// Takes the largest strict local maximum above `peak_threshold_fraction` of
/// the window maximum; falls back to the window maximum when none qualifies.
pub fn find_segment_peak(velocity: &[f64], window: AnalysisWindow, config: &AnalysisConfig) -> Option<usize> {
    let values = window.slice(velocity);
    let window_max_index = argmax(values)?;
    let threshold = config.peak_threshold_fraction * values[window_max_index];

    let mut best: Option<usize> = None;
    for i in 1..values.len().saturating_sub(1) {
        let v = values[i];
        if v > values[i - 1] && v > values[i + 1] && v > threshold {
            match best {
                Some(b) if values[b] >= v => {}
                _ => best = Some(i),
            }
        }
    }

    Some(window.start + best.unwrap_or(window_max_index))
}
