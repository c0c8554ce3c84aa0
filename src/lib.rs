//! Swing kinematic analysis.
//!
//! Takes a momentum/energy export (and optionally a rotation export) of
//! recorded swings, finds contact and segment peak timings for each movement,
//! derives sequencing metrics and classifies the movement into an archetype.
//! Per-movement results can then be rolled up into a session summary.
//!
//! ```no_run
//! use swing_kinematics::{analyze_recordings, summarize_session, AnalysisConfig};
//!
//! let momentum = std::fs::read_to_string("session_momentum.csv").unwrap();
//! let config = AnalysisConfig::default();
//! let results = analyze_recordings(&momentum, None, &config);
//! let summary = summarize_session(&results);
//! println!("{:?}", summary.dominant_category);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod event_detection;
pub mod separation;
pub mod session_summary;
pub mod signal_conditioning;
pub mod swing_analyzer;
pub mod swing_metrics;
pub mod tolerant_csv_reader;
pub mod types;
pub mod velocity;

#[cfg(test)]
mod test_support;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use session_summary::summarize_session;
pub use swing_analyzer::{analyze_movement, analyze_recordings};
pub use types::{
    DataQualityFlag, MomentumSample, MovementCategory, RotationSample, Segment, SessionSummary,
    SwingAnalysisResult, TransferRating,
};
