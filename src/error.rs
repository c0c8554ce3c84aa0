use thiserror::Error;

/// Reasons a single movement cannot be analysed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("movement {movement_id} has {found} samples, at least {required} required")]
    InsufficientSamples {
        movement_id: String,
        found: usize,
        required: usize,
    },
    #[error("movement {movement_id} contains a non-finite {field} value at sample {index}")]
    NonFiniteInput {
        movement_id: String,
        field: &'static str,
        index: usize,
    },
    #[error("movement {0} produced an empty analysis window")]
    EmptyWindow(String),
}
