use thiserror::Error;

/// Why a file was turned away at intake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("{name} is not a supported format.")]
    UnsupportedFormat { name: String },
}

impl IntakeError {
    pub fn file_name(&self) -> &str {
        match self {
            IntakeError::UnsupportedFormat { name } => name,
        }
    }
}

/// Failure scoped to a single unit. Never affects sibling units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("processing failed: {0}")]
    ProcessingFailure(String),
}

/// A simulation setting that would keep units from ever finishing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("{field} must be greater than zero")]
    ZeroTick { field: &'static str },
    #[error("{field} needs 0 < min < max, got [{min}, {max})")]
    InvalidIncrement {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

impl SimulationError {
    pub fn field(&self) -> &'static str {
        match self {
            SimulationError::ZeroTick { field } | SimulationError::InvalidIncrement { field, .. } => {
                field
            }
        }
    }
}
